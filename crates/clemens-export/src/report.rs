//! Markdown and JSON reports
//!
//! Every `export_*` function has a pure `render_*` counterpart that builds
//! the text without touching the filesystem. The exporters create parent
//! folders and return the path they wrote.

use chrono::Utc;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

use clemens_config::ExportConfig;
use clemens_parser::{Document, EmojiCategory, ProtocolDocument, Section};

use crate::error::ExportResult;
use crate::format::{excerpt, format_thousands, truncate_chars, write_output, DocumentRef};

const QUOTE_JSON_CHARS: usize = 200;
const SUMMARY_TITLE_CHARS: usize = 40;
const INDEX_TITLE_CHARS: usize = 50;
const EMOJI_REPORT_LIMIT: usize = 50;
const COMMON_TITLE_LIMIT: usize = 20;
const CROSS_REFERENCE_PROTOCOLS: usize = 10;
const CROSS_REFERENCE_TARGETS: usize = 5;
const MISSING_SHOWN: usize = 10;

/// Output format of [`export_folder_summary`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryFormat {
    #[default]
    Markdown,
    Json,
}

fn generated_line() -> String {
    format!("**Generated:** {}", Utc::now().to_rfc3339())
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

// ---------------------------------------------------------------------------
// Single document
// ---------------------------------------------------------------------------

/// Markdown summary of one document
pub fn render_markdown<'a>(doc: impl Into<DocumentRef<'a>>, config: &ExportConfig) -> String {
    let doc = doc.into();
    let parsed = doc.parsed();
    let mut lines = vec![format!("# {}", parsed.display_title())];
    if let Some(subtitle) = &parsed.subtitle {
        lines.push(format!("## {}", subtitle));
    }
    lines.push(String::new());

    if let Some(protocol) = doc.protocol() {
        lines.push("## 📋 Protocol Metadata".to_string());
        lines.push(String::new());
        lines.push(format!("- **Protocol ID:** {}", or_na(protocol.protocol_id.as_deref())));
        lines.push(format!("- **Category:** {}", or_na(protocol.category.as_deref())));
        lines.push(format!("- **Status:** {}", or_na(protocol.status.as_deref())));
        lines.push(format!(
            "- **Discovery Date:** {}",
            or_na(protocol.discovery_date.as_deref())
        ));
        lines.push(format!("- **Type:** {}", or_na(protocol.protocol_type.as_deref())));
        lines.push(String::new());
    }

    if config.include_analysis {
        lines.push("## 📊 Document Analysis".to_string());
        lines.push(String::new());
        lines.push(format!("- **File:** `{}`", parsed.filename));
        lines.push(format!("- **Words:** {}", format_thousands(parsed.word_count)));
        lines.push(format!("- **Lines:** {}", format_thousands(parsed.line_count)));
        lines.push(format!("- **Sections:** {}", parsed.sections.len()));
        lines.push(format!("- **Tables:** {}", parsed.tables.len()));
        lines.push(format!("- **Quotes:** {}", parsed.quotes.len()));
        lines.push(format!("- **Emojis:** {}", parsed.emoji_count()));
        lines.push(String::new());

        if !parsed.emojis.is_empty() {
            let mut by_count: Vec<_> = parsed.emojis.iter().collect();
            by_count.sort_by(|a, b| b.count.cmp(&a.count));
            lines.push("### Emoji Usage".to_string());
            lines.push(String::new());
            for info in by_count.into_iter().take(config.max_listed) {
                lines.push(format!("- {} ({}): {}×", info.glyph, info.name, info.count));
            }
            lines.push(String::new());
        }
    }

    if !parsed.sections.is_empty() {
        lines.push("## 📑 Document Structure".to_string());
        lines.push(String::new());
        outline(&mut lines, &parsed.sections, 0);
        lines.push(String::new());
    }

    if let Some(protocol) = doc.protocol() {
        protocol_sections(&mut lines, protocol, config);
    }

    lines.join("\n")
}

fn outline(lines: &mut Vec<String>, sections: &[Section], depth: usize) {
    for section in sections {
        lines.push(format!(
            "{}- {} {}",
            "  ".repeat(depth),
            "#".repeat(section.level as usize),
            section.title
        ));
        outline(lines, &section.subsections, depth + 1);
    }
}

fn protocol_sections(lines: &mut Vec<String>, protocol: &ProtocolDocument, config: &ExportConfig) {
    if let Some(emergent) = &protocol.emergent_observation {
        lines.push("## 🎯 Emergent Observation".to_string());
        lines.push(String::new());
        lines.push(excerpt(&emergent.content, config.excerpt_chars));
        lines.push(String::new());
    }

    if !protocol.checkmarks.is_empty() {
        lines.push("## ✅ Checkmarks".to_string());
        lines.push(String::new());
        for item in protocol.checkmarks.iter().take(config.max_listed) {
            lines.push(format!("- ✅ {}", item));
        }
        if protocol.checkmarks.len() > config.max_listed {
            lines.push(format!(
                "- ... and {} more",
                protocol.checkmarks.len() - config.max_listed
            ));
        }
        lines.push(String::new());
    }

    if !protocol.protocol_references.is_empty() {
        lines.push("## 🔗 Protocol References".to_string());
        lines.push(String::new());
        for reference in &protocol.protocol_references {
            lines.push(format!("- {}", reference));
        }
        lines.push(String::new());
    }

    if !protocol.footer_emojis.is_empty() {
        lines.push(format!("**Footer:** {}", protocol.footer_emojis.concat()));
    }
}

/// Write [`render_markdown`] output with default limits
pub fn export_to_markdown<'a>(
    doc: impl Into<DocumentRef<'a>>,
    path: impl AsRef<Path>,
    include_analysis: bool,
) -> ExportResult<PathBuf> {
    let config = ExportConfig {
        include_analysis,
        ..ExportConfig::default()
    };
    export_markdown_with(doc, path, &config)
}

/// Write [`render_markdown`] output with explicit limits
pub fn export_markdown_with<'a>(
    doc: impl Into<DocumentRef<'a>>,
    path: impl AsRef<Path>,
    config: &ExportConfig,
) -> ExportResult<PathBuf> {
    write_output(path.as_ref(), &render_markdown(doc, config))
}

fn section_json(section: &Section) -> Value {
    json!({
        "title": section.title,
        "level": section.level,
        "emoji": section.emoji,
        "start_line": section.start_line,
        "end_line": section.end_line,
        "subsection_count": section.subsections.len(),
    })
}

/// JSON view of one document
pub fn render_json<'a>(doc: impl Into<DocumentRef<'a>>) -> Value {
    let doc = doc.into();
    let parsed = doc.parsed();
    let mut value = json!({
        "filename": parsed.filename,
        "filepath": parsed.filepath.display().to_string(),
        "title": parsed.title,
        "subtitle": parsed.subtitle,
        "word_count": parsed.word_count,
        "line_count": parsed.line_count,
        "emoji_count": parsed.emoji_count(),
        "parsed_at": parsed.parsed_at.to_rfc3339(),
        "sections": parsed.sections.iter().map(section_json).collect::<Vec<_>>(),
        "tables": parsed.tables.iter().map(|table| json!({
            "headers": table.headers,
            "row_count": table.num_rows(),
            "start_line": table.start_line,
        })).collect::<Vec<_>>(),
        "quotes": parsed.quotes.iter().map(|quote| json!({
            "text": truncate_chars(&quote.text, QUOTE_JSON_CHARS),
            "attribution": quote.attribution,
        })).collect::<Vec<_>>(),
        "emojis": parsed.emojis.iter().map(|info| json!({
            "char": info.glyph,
            "name": info.name,
            "category": info.category,
            "count": info.count,
        })).collect::<Vec<_>>(),
    });

    if let (Some(protocol), Some(object)) = (doc.protocol(), value.as_object_mut()) {
        object.insert(
            "protocol".to_string(),
            json!({
                "number": protocol.protocol_number,
                "id": protocol.protocol_id,
                "category": protocol.category,
                "status": protocol.status,
                "discovery_date": protocol.discovery_date,
                "type": protocol.protocol_type,
                "is_operational": protocol.is_operational(),
                "is_emergent": protocol.is_emergent(),
                "checkmarks": protocol.checkmarks,
                "references": protocol.protocol_references.iter().map(|r| json!({
                    "number": r.number,
                    "description": r.description,
                })).collect::<Vec<_>>(),
                "footer_emojis": protocol.footer_emojis,
            }),
        );
    }
    value
}

/// Write [`render_json`] output, two-space indented when `pretty`
pub fn export_to_json<'a>(
    doc: impl Into<DocumentRef<'a>>,
    path: impl AsRef<Path>,
    pretty: bool,
) -> ExportResult<PathBuf> {
    let value = render_json(doc);
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    write_output(path.as_ref(), &text)
}

// ---------------------------------------------------------------------------
// Folder reports
// ---------------------------------------------------------------------------

/// Totals and a per-document table
pub fn render_folder_summary(documents: &[Document], format: SummaryFormat) -> ExportResult<String> {
    let total_words: usize = documents.iter().map(|d| d.word_count).sum();
    let total_lines: usize = documents.iter().map(|d| d.line_count).sum();
    let total_emojis: usize = documents.iter().map(|d| d.emoji_count()).sum();

    match format {
        SummaryFormat::Json => {
            let value = json!({
                "generated": Utc::now().to_rfc3339(),
                "total_documents": documents.len(),
                "total_words": total_words,
                "total_lines": total_lines,
                "total_emojis": total_emojis,
                "documents": documents.iter().map(|doc| json!({
                    "filename": doc.filename,
                    "title": doc.title,
                    "word_count": doc.word_count,
                    "emoji_count": doc.emoji_count(),
                    "protocol_number": doc.as_protocol().and_then(|p| p.protocol_number),
                })).collect::<Vec<_>>(),
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        SummaryFormat::Markdown => {
            let mut lines = vec![
                "# Document Summary".to_string(),
                String::new(),
                generated_line(),
                format!("**Total Documents:** {}", documents.len()),
                format!("**Total Words:** {}", format_thousands(total_words)),
                format!("**Total Emojis:** {}", format_thousands(total_emojis)),
                String::new(),
                "## Documents".to_string(),
                String::new(),
                "| # | File | Title | Words | Emojis |".to_string(),
                "|---|------|-------|-------|--------|".to_string(),
            ];
            for (i, doc) in documents.iter().enumerate() {
                lines.push(format!(
                    "| {} | {} | {} | {} | {} |",
                    i + 1,
                    doc.filename,
                    truncate_chars(doc.title.as_deref().unwrap_or("-"), SUMMARY_TITLE_CHARS),
                    format_thousands(doc.word_count),
                    doc.emoji_count()
                ));
            }
            Ok(lines.join("\n"))
        }
    }
}

/// Write [`render_folder_summary`] output
pub fn export_folder_summary(
    documents: &[Document],
    path: impl AsRef<Path>,
    format: SummaryFormat,
) -> ExportResult<PathBuf> {
    let written = write_output(path.as_ref(), &render_folder_summary(documents, format)?)?;
    info!("Wrote summary of {} documents to {}", documents.len(), written.display());
    Ok(written)
}

struct EmojiTally<'a> {
    glyph: &'a str,
    name: &'a str,
    category: EmojiCategory,
    count: usize,
    documents: BTreeSet<&'a str>,
}

/// Emoji frequency across documents
pub fn render_emoji_report(documents: &[Document]) -> String {
    let mut tallies: Vec<EmojiTally> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for doc in documents {
        for info in &doc.emojis {
            let slot = *index.entry(info.glyph.as_str()).or_insert_with(|| {
                tallies.push(EmojiTally {
                    glyph: &info.glyph,
                    name: &info.name,
                    category: info.category,
                    count: 0,
                    documents: BTreeSet::new(),
                });
                tallies.len() - 1
            });
            tallies[slot].count += info.count;
            tallies[slot].documents.insert(&doc.filename);
        }
    }

    let total_uses: usize = tallies.iter().map(|t| t.count).sum();
    let mut by_category: Vec<(EmojiCategory, usize)> = Vec::new();
    for tally in &tallies {
        match by_category.iter_mut().find(|(c, _)| *c == tally.category) {
            Some((_, count)) => *count += tally.count,
            None => by_category.push((tally.category, tally.count)),
        }
    }
    by_category.sort_by(|a, b| b.1.cmp(&a.1));
    tallies.sort_by(|a, b| b.count.cmp(&a.count));

    let mut lines = vec![
        "# Emoji Usage Report".to_string(),
        String::new(),
        generated_line(),
        format!("**Documents Analyzed:** {}", documents.len()),
        format!("**Unique Emojis:** {}", tallies.len()),
        format!("**Total Emoji Uses:** {}", format_thousands(total_uses)),
        String::new(),
        "## Emoji Frequency".to_string(),
        String::new(),
        "| Emoji | Name | Category | Count | Documents |".to_string(),
        "|-------|------|----------|-------|-----------|".to_string(),
    ];
    for tally in tallies.iter().take(EMOJI_REPORT_LIMIT) {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            tally.glyph,
            tally.name,
            tally.category,
            tally.count,
            tally.documents.len()
        ));
    }

    lines.push(String::new());
    lines.push("## By Category".to_string());
    lines.push(String::new());
    for (category, count) in by_category {
        lines.push(format!("- **{}:** {}", category, count));
    }
    lines.join("\n")
}

/// Write [`render_emoji_report`] output
pub fn export_emoji_report(documents: &[Document], path: impl AsRef<Path>) -> ExportResult<PathBuf> {
    write_output(path.as_ref(), &render_emoji_report(documents))
}

/// Section-title frequency, protocol coverage and cross-references
pub fn render_structure_analysis(documents: &[Document]) -> String {
    let mut lines = vec![
        "# Document Structure Analysis".to_string(),
        String::new(),
        generated_line(),
        format!("**Documents:** {}", documents.len()),
        String::new(),
    ];

    let mut titles: Vec<(String, usize)> = Vec::new();
    for doc in documents {
        for section in &doc.sections {
            let title = section.plain_title().to_uppercase();
            match titles.iter_mut().find(|(t, _)| *t == title) {
                Some((_, count)) => *count += 1,
                None => titles.push((title, 1)),
            }
        }
    }
    titles.sort_by(|a, b| b.1.cmp(&a.1));

    lines.push("## Common Section Titles".to_string());
    lines.push(String::new());
    for (title, count) in titles.iter().take(COMMON_TITLE_LIMIT) {
        lines.push(format!("- **{}**: {} documents", title, count));
    }
    lines.push(String::new());

    let protocols: Vec<&ProtocolDocument> =
        documents.iter().filter_map(Document::as_protocol).collect();
    if protocols.is_empty() {
        return lines.join("\n");
    }

    lines.push("## Protocol Analysis".to_string());
    lines.push(String::new());
    lines.push(format!("**Total Protocols:** {}", protocols.len()));
    lines.push(format!(
        "**Operational:** {}",
        protocols.iter().filter(|p| p.is_operational()).count()
    ));
    lines.push(format!(
        "**Emergent:** {}",
        protocols.iter().filter(|p| p.is_emergent()).count()
    ));

    let numbers: BTreeSet<u32> = protocols.iter().filter_map(|p| p.protocol_number).collect();
    if let (Some(&first), Some(&last)) = (numbers.first(), numbers.last()) {
        lines.push(format!("**Protocol Range:** P{} - P{}", first, last));
        let span = u64::from(last) - u64::from(first) + 1;
        let missing_count = span - numbers.len() as u64;
        if missing_count > 0 {
            let shown: Vec<String> = (first..=last)
                .filter(|n| !numbers.contains(n))
                .take(MISSING_SHOWN)
                .map(|n| format!("P{}", n))
                .collect();
            lines.push(format!("**Missing Numbers:** {}", shown.join(", ")));
            if missing_count > shown.len() as u64 {
                lines.push(format!("  ... and {} more", missing_count - shown.len() as u64));
            }
        }
    }
    lines.push(String::new());

    lines.push("## Protocol Cross-References".to_string());
    lines.push(String::new());
    for protocol in protocols
        .iter()
        .filter(|p| !p.protocol_references.is_empty())
        .take(CROSS_REFERENCE_PROTOCOLS)
    {
        let targets: Vec<String> = protocol
            .protocol_references
            .iter()
            .take(CROSS_REFERENCE_TARGETS)
            .map(|r| r.id())
            .collect();
        lines.push(format!(
            "- **{}** references: {}",
            protocol.protocol_id.as_deref().unwrap_or(&protocol.filename),
            targets.join(", ")
        ));
    }
    lines.join("\n")
}

/// Write [`render_structure_analysis`] output
pub fn export_structure_analysis(
    documents: &[Document],
    path: impl AsRef<Path>,
) -> ExportResult<PathBuf> {
    write_output(path.as_ref(), &render_structure_analysis(documents))
}

fn status_mark(protocol: &ProtocolDocument) -> &'static str {
    if protocol.is_operational() {
        "✅"
    } else {
        "⚠️"
    }
}

/// Protocols grouped by category plus a flat table, ascending by number
pub fn render_protocol_index(protocols: &[ProtocolDocument]) -> String {
    let mut sorted: Vec<&ProtocolDocument> = protocols.iter().collect();
    sorted.sort_by_key(|p| p.protocol_number.unwrap_or(0));

    let mut lines = vec![
        "# Protocol Index".to_string(),
        String::new(),
        generated_line(),
        format!("**Total Protocols:** {}", sorted.len()),
        String::new(),
        "## By Category".to_string(),
        String::new(),
    ];

    let mut categories: BTreeMap<&str, Vec<&ProtocolDocument>> = BTreeMap::new();
    for &protocol in &sorted {
        categories
            .entry(protocol.category.as_deref().unwrap_or("Uncategorized"))
            .or_default()
            .push(protocol);
    }
    for (category, members) in &categories {
        lines.push(format!("### {}", category));
        lines.push(String::new());
        for protocol in members {
            lines.push(format!(
                "- {} **{}**: {}",
                status_mark(protocol),
                protocol.protocol_id.as_deref().unwrap_or(&protocol.filename),
                protocol.display_title()
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Full Index".to_string());
    lines.push(String::new());
    lines.push("| P# | Title | Category | Status |".to_string());
    lines.push("|----|-------|----------|--------|".to_string());
    for protocol in &sorted {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            protocol
                .protocol_number
                .map_or_else(|| "-".to_string(), |n| n.to_string()),
            truncate_chars(protocol.display_title(), INDEX_TITLE_CHARS),
            protocol.category.as_deref().unwrap_or("-"),
            protocol.status.as_deref().unwrap_or("-")
        ));
    }
    lines.join("\n")
}

/// Write [`render_protocol_index`] output
pub fn export_protocol_index(
    protocols: &[ProtocolDocument],
    path: impl AsRef<Path>,
) -> ExportResult<PathBuf> {
    write_output(path.as_ref(), &render_protocol_index(protocols))
}
