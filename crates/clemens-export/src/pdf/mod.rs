//! PDF export
//!
//! Inputs are lowered to [`Block`]s by the functions in [`layout`], which
//! need no PDF library. Writing the file needs the `pdf` feature; without it
//! every export returns [`ExportError::DependencyMissing`].

pub mod layout;

#[cfg(feature = "pdf")]
mod backend;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub use clemens_config::{PageSize, PdfConfig};
use clemens_parser::{ParsedDocument, ProtocolDocument, Quote};
pub use layout::{
    anthology_blocks, clean_text_for_pdf, document_blocks, markdown_to_blocks, protocols_blocks,
    story_blocks, summary_blocks, AnthologyEntry, Block,
};

use crate::error::{ExportError, ExportResult};
use crate::format::DocumentRef;

pub const DEFAULT_SUMMARY_TITLE: &str = "Protocol Summary Report";
pub const DEFAULT_ANTHOLOGY_TITLE: &str = "Frontier Anthology";

/// Anything with a title, a Markdown body and an optional epigraph
pub trait Renderable {
    fn title(&self) -> &str;

    /// Markdown body
    fn body(&self) -> &str;

    /// Epigraph text and its source
    fn quote(&self) -> Option<(&str, &str)> {
        None
    }

    /// Line printed under the title
    fn byline(&self) -> Option<String> {
        None
    }
}

fn first_quote(quotes: &[Quote]) -> Option<(&str, &str)> {
    quotes
        .first()
        .map(|q| (q.text.as_str(), q.attribution.as_deref().unwrap_or("Unknown")))
}

impl Renderable for ParsedDocument {
    fn title(&self) -> &str {
        self.display_title()
    }

    fn body(&self) -> &str {
        &self.content
    }

    fn quote(&self) -> Option<(&str, &str)> {
        first_quote(&self.quotes)
    }

    fn byline(&self) -> Option<String> {
        self.subtitle.clone()
    }
}

impl Renderable for ProtocolDocument {
    fn title(&self) -> &str {
        self.display_title()
    }

    fn body(&self) -> &str {
        &self.content
    }

    fn quote(&self) -> Option<(&str, &str)> {
        first_quote(&self.quotes)
    }

    fn byline(&self) -> Option<String> {
        match (&self.protocol_id, &self.category) {
            (Some(id), Some(category)) => Some(format!("{} | {}", id, category)),
            (Some(id), None) => Some(id.clone()),
            _ => self.subtitle.clone(),
        }
    }
}

/// A generated narrative
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub title: String,
    /// Name of the template the story was written from
    pub template: Option<String>,
    pub quote: Option<Quote>,
    pub content: String,
}

impl Story {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            template: None,
            quote: None,
            content: content.into(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_quote(mut self, text: impl Into<String>, source: Option<&str>) -> Self {
        self.quote = Some(Quote {
            text: text.into(),
            attribution: source.map(String::from),
            line_number: 0,
        });
        self
    }
}

impl Renderable for Story {
    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.content
    }

    fn quote(&self) -> Option<(&str, &str)> {
        self.quote
            .as_ref()
            .map(|q| (q.text.as_str(), q.attribution.as_deref().unwrap_or("Unknown")))
    }

    fn byline(&self) -> Option<String> {
        self.template.as_ref().map(|t| format!("A {}", t))
    }
}

#[cfg(feature = "pdf")]
fn write_blocks(
    blocks: &[Block],
    title: &str,
    path: &Path,
    config: &PdfConfig,
) -> ExportResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    backend::render(blocks, title, path, config)?;
    tracing::info!("Wrote {} blocks to {}", blocks.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(not(feature = "pdf"))]
fn write_blocks(_: &[Block], _: &str, path: &Path, _: &PdfConfig) -> ExportResult<PathBuf> {
    warn!("Cannot write {}: PDF support not compiled in", path.display());
    Err(ExportError::DependencyMissing {
        dependency: "printpdf",
        feature: "pdf",
    })
}

/// One document with its protocol fields, if any
pub fn export_document_to_pdf<'a>(
    doc: impl Into<DocumentRef<'a>>,
    path: impl AsRef<Path>,
    config: &PdfConfig,
) -> ExportResult<PathBuf> {
    let doc = doc.into();
    let blocks = document_blocks(doc);
    write_blocks(&blocks, doc.parsed().display_title(), path.as_ref(), config)
}

/// A bound collection of protocols with a cover and contents page
pub fn export_protocols_to_pdf(
    protocols: &[ProtocolDocument],
    path: impl AsRef<Path>,
    config: &PdfConfig,
) -> ExportResult<PathBuf> {
    let blocks = protocols_blocks(protocols, config);
    write_blocks(&blocks, "NSPFRP Protocol Documentation", path.as_ref(), config)
}

/// A one-table overview of protocols
pub fn export_summary_pdf(
    protocols: &[ProtocolDocument],
    path: impl AsRef<Path>,
    title: Option<&str>,
    config: &PdfConfig,
) -> ExportResult<PathBuf> {
    let title = title.unwrap_or(DEFAULT_SUMMARY_TITLE);
    write_blocks(&summary_blocks(protocols, title), title, path.as_ref(), config)
}

/// A story, or any other [`Renderable`]
pub fn export_story_to_pdf<R: Renderable + ?Sized>(
    story: &R,
    path: impl AsRef<Path>,
    config: &PdfConfig,
) -> ExportResult<PathBuf> {
    write_blocks(&story_blocks(story), story.title(), path.as_ref(), config)
}

/// Contents line for a file: its first line without `#`, else its stem
fn anthology_heading(path: &Path, content: Option<&str>) -> String {
    let first = content
        .and_then(|c| c.lines().next())
        .map(|line| line.replace('#', "").trim().to_string())
        .filter(|line| !line.is_empty());
    first.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

/// The `*.md` files directly inside `folder`, sorted by name
pub fn collect_anthology(folder: impl AsRef<Path>) -> ExportResult<Vec<AnthologyEntry>> {
    let folder = folder.as_ref();
    let mut paths: Vec<PathBuf> = fs::read_dir(folder)
        .map_err(|e| ExportError::io(folder, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    Ok(paths
        .iter()
        .map(|path| {
            let content = match fs::read_to_string(path) {
                Ok(content) => Some(content),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            };
            AnthologyEntry {
                heading: anthology_heading(path, content.as_deref()),
                content,
            }
        })
        .collect())
}

/// Every Markdown file of a folder bound into one volume
pub fn export_anthology_to_pdf(
    folder: impl AsRef<Path>,
    path: impl AsRef<Path>,
    title: Option<&str>,
    config: &PdfConfig,
) -> ExportResult<PathBuf> {
    let title = title.unwrap_or(DEFAULT_ANTHOLOGY_TITLE);
    let entries = collect_anthology(folder)?;
    write_blocks(&anthology_blocks(&entries, title), title, path.as_ref(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clemens_parser::test_utils::{parse_protocol_text, protocol_markdown, ProtocolFixture};

    #[test]
    fn test_protocol_renderable() {
        let protocol =
            parse_protocol_text(&protocol_markdown(4, "Fog", "draft"), "PROTOCOL_4.md");
        assert_eq!(Renderable::title(&protocol), "PROTOCOL 4: Fog");
        assert_eq!(protocol.quote(), Some(("Twain was here.", "Mark Twain")));
        assert_eq!(protocol.byline().as_deref(), Some("P4 | Navigation"));
    }

    #[test]
    fn test_story_defaults() {
        let story = Story::new("Tale", "body").with_quote("words", None);
        assert_eq!(story.quote(), Some(("words", "Unknown")));
        assert_eq!(story.byline(), None);
    }

    #[test]
    fn test_collect_anthology() {
        let dir = ProtocolFixture::new()
            .file("b.md", "## Second Tale\ntext")
            .file("a.md", "# First Tale\ntext")
            .file("notes.txt", "ignored")
            .malformed("c.md")
            .build()
            .unwrap();
        let entries = collect_anthology(dir.path()).unwrap();
        let headings: Vec<&str> = entries.iter().map(|e| e.heading.as_str()).collect();
        assert_eq!(headings, vec!["First Tale", "Second Tale", "c"]);
        assert!(entries[2].content.is_none());
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_missing_backend_is_soft() {
        let dir = tempfile::TempDir::new().unwrap();
        let story = Story::new("Tale", "body");
        let err = export_story_to_pdf(&story, dir.path().join("tale.pdf"), &PdfConfig::default())
            .unwrap_err();
        assert!(err.is_soft());
        assert!(!dir.path().join("tale.pdf").exists());
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_protocols_pdf_is_written() {
        let dir = tempfile::TempDir::new().unwrap();
        let protocols: Vec<ProtocolDocument> = (1..=3)
            .map(|n| {
                parse_protocol_text(
                    &protocol_markdown(n, "Fog", "✅ OPERATIONAL"),
                    &format!("PROTOCOL_{}.md", n),
                )
            })
            .collect();
        let path = export_protocols_to_pdf(
            &protocols,
            dir.path().join("out/protocols.pdf"),
            &PdfConfig::default(),
        )
        .unwrap();
        let bytes = fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
