//! Block placement with printpdf's builtin fonts

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use clemens_config::PdfConfig;

use super::layout::Block;
use crate::error::{ExportError, ExportResult};

const PT_TO_MM: f32 = 0.352_778;
const INCH_TO_MM: f32 = 25.4;
const LINE_SPACING: f32 = 1.4;
/// Average glyph width of the builtin sans fonts, in ems
const AVG_CHAR_EM: f32 = 0.5;
const QUOTE_INDENT_MM: f32 = 10.0;
const META_SCALE: f32 = 0.85;

fn pdf_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

fn builtin_font(name: &str) -> BuiltinFont {
    match name.to_ascii_lowercase().as_str() {
        "helvetica-bold" => BuiltinFont::HelveticaBold,
        "helvetica-oblique" => BuiltinFont::HelveticaOblique,
        "helvetica-boldoblique" => BuiltinFont::HelveticaBoldOblique,
        "times-roman" | "times" => BuiltinFont::TimesRoman,
        "times-bold" => BuiltinFont::TimesBold,
        "times-italic" => BuiltinFont::TimesItalic,
        "courier" => BuiltinFont::Courier,
        "courier-bold" => BuiltinFont::CourierBold,
        _ => BuiltinFont::Helvetica,
    }
}

/// Builtin fonts cover ASCII only
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '•' => '-',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

struct PageWriter<'a> {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    config: &'a PdfConfig,
    title: String,
    width: f32,
    height: f32,
    /// Baseline of the next line, from the bottom edge
    y: f32,
    page: usize,
}

impl<'a> PageWriter<'a> {
    fn left(&self) -> f32 {
        self.config.margin_left * INCH_TO_MM
    }

    fn usable_width(&self) -> f32 {
        self.width - (self.config.margin_left + self.config.margin_right) * INCH_TO_MM
    }

    fn top(&self) -> f32 {
        self.height - self.config.margin_top * INCH_TO_MM
    }

    fn bottom(&self) -> f32 {
        self.config.margin_bottom * INCH_TO_MM
    }

    fn decorate_page(&self) {
        let size = self.config.body_size * META_SCALE;
        if self.config.include_header && self.page > 1 {
            let y = self.height - self.config.margin_top * INCH_TO_MM / 2.0;
            self.layer
                .use_text(pdf_safe(&self.title), size, Mm(self.left()), Mm(y), &self.regular);
        }
        if self.config.include_footer {
            let y = self.bottom() / 2.0;
            self.layer.use_text(
                format!("Page {}", self.page),
                size,
                Mm(self.left()),
                Mm(y),
                &self.regular,
            );
        }
    }

    fn new_page(&mut self) {
        self.page += 1;
        let (page, layer) = self.doc.add_page(
            Mm(self.width),
            Mm(self.height),
            format!("Page {}, Layer 1", self.page),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.top();
        self.decorate_page();
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < self.bottom() {
            self.new_page();
        }
    }

    fn line(&mut self, text: &str, size: f32, indent: f32, bold: bool) {
        let height = size * LINE_SPACING * PT_TO_MM;
        self.ensure_room(height);
        self.y -= height;
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(
            pdf_safe(text),
            size,
            Mm(self.left() + indent),
            Mm(self.y),
            font,
        );
    }

    fn paragraph(&mut self, text: &str, size: f32, indent: f32, bold: bool) {
        let char_width = size * AVG_CHAR_EM * PT_TO_MM;
        let columns = ((self.usable_width() - indent) / char_width).max(10.0) as usize;
        for line in textwrap::wrap(text, columns) {
            self.line(&line, size, indent, bold);
        }
    }

    fn table(&mut self, header: Option<&[String]>, rows: &[Vec<String>]) {
        let size = self.config.body_size;
        let columns = header
            .map(<[String]>::len)
            .into_iter()
            .chain(rows.iter().map(Vec::len))
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return;
        }
        let column_width = self.usable_width() / columns as f32;
        let max_chars = (column_width / (size * AVG_CHAR_EM * PT_TO_MM)).max(4.0) as usize - 1;

        let draw_row = |writer: &mut Self, cells: &[String], bold: bool| {
            let height = size * LINE_SPACING * PT_TO_MM;
            writer.ensure_room(height);
            writer.y -= height;
            let font = if bold { &writer.bold } else { &writer.regular };
            for (i, cell) in cells.iter().enumerate() {
                let text: String = cell.chars().take(max_chars).collect();
                writer.layer.use_text(
                    pdf_safe(&text),
                    size,
                    Mm(writer.left() + column_width * i as f32),
                    Mm(writer.y),
                    font,
                );
            }
        };

        if let Some(header) = header {
            draw_row(self, header, true);
        }
        for row in rows {
            draw_row(self, row, false);
        }
    }

    fn block(&mut self, block: &Block) {
        let body = self.config.body_size;
        match block {
            Block::Title(text) => self.paragraph(text, self.config.title_size, 0.0, true),
            Block::Heading(text) => self.paragraph(text, self.config.heading_size, 0.0, true),
            Block::Bold(text) => self.paragraph(text, body, 0.0, true),
            Block::Body(text) => self.paragraph(text, body, 0.0, false),
            Block::Quote(text) => self.paragraph(text, body, QUOTE_INDENT_MM, false),
            Block::Bullet(text) => self.paragraph(&format!("- {}", text), body, 0.0, false),
            Block::Meta(text) => self.paragraph(text, body * META_SCALE, 0.0, false),
            Block::Table { header, rows } => self.table(header.as_deref(), rows),
            Block::Spacer(points) => {
                let gap = points * PT_TO_MM;
                if self.y - gap < self.bottom() {
                    self.new_page();
                } else {
                    self.y -= gap;
                }
            }
            Block::PageBreak => self.new_page(),
        }
    }
}

/// Lay out `blocks` and save the document to `path`
pub(super) fn render(
    blocks: &[Block],
    title: &str,
    path: &Path,
    config: &PdfConfig,
) -> ExportResult<()> {
    let (width, height) = config.page_size.dimensions_mm();
    let (doc, page, layer) = PdfDocument::new(title, Mm(width), Mm(height), "Page 1, Layer 1");
    let regular = doc
        .add_builtin_font(builtin_font(&config.body_font))
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(builtin_font(&config.title_font))
        .map_err(pdf_error)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut writer = PageWriter {
        doc,
        layer,
        regular,
        bold,
        config,
        title: title.to_string(),
        width,
        height,
        y: height - config.margin_top * INCH_TO_MM,
        page: 1,
    };
    writer.decorate_page();

    // a trailing page break would leave an empty last page
    let blocks = match blocks.last() {
        Some(Block::PageBreak) => &blocks[..blocks.len() - 1],
        _ => blocks,
    };
    for block in blocks {
        writer.block(block);
    }

    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    writer
        .doc
        .save(&mut BufWriter::new(file))
        .map_err(pdf_error)
}
