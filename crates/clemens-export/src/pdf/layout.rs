//! Backend-independent PDF layout
//!
//! Exports first lower their input to a flat list of [`Block`]s; the
//! backend only knows how to place blocks on pages.

use chrono::Utc;

use clemens_config::PdfConfig;
use clemens_parser::{replace_emojis_with_text, EmojiTextFormat, ProtocolDocument};

use super::Renderable;
use crate::format::{truncate_chars, DocumentRef};

const GLYPH_REPLACEMENTS: &[(&str, &str)] = &[
    ("✅", "[OK]"),
    ("❌", "[X]"),
    ("⚠️", "[!]"),
    ("⚠", "[!]"),
    ("🚨", "[!]"),
    ("🎯", "*"),
    ("🌟", "*"),
    ("✨", "*"),
    ("💎", "*"),
    ("⭐", "*"),
    ("🔘", "o"),
    ("📊", ""),
    ("🔄", ""),
    ("🔗", ""),
    ("🏗️", ""),
    ("📝", ""),
    ("📖", ""),
    ("📚", ""),
    ("🚀", ""),
    ("🌐", ""),
    ("🎬", ""),
    ("🎩", ""),
    ("💡", ""),
];

const PUNCTUATION_REPLACEMENTS: &[(char, &str)] = &[
    ('—', "-"),
    ('–', "-"),
    ('“', "\""),
    ('”', "\""),
    ('‘', "'"),
    ('’', "'"),
    ('…', "..."),
];

const EMERGENT_EXCERPT_CHARS: usize = 2000;
const KEY_POINT_LIMIT: usize = 8;
const SUMMARY_TITLE_CHARS: usize = 40;
const SUMMARY_CATEGORY_CHARS: usize = 25;

/// A unit of PDF content
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Large bold line
    Title(String),
    /// Section heading
    Heading(String),
    /// Body-size bold line
    Bold(String),
    /// Wrapped paragraph
    Body(String),
    /// Indented paragraph
    Quote(String),
    /// List item, rendered with a leading marker
    Bullet(String),
    /// Small line for dates and attributions
    Meta(String),
    /// Columns with an optional bold header row
    Table {
        header: Option<Vec<String>>,
        rows: Vec<Vec<String>>,
    },
    /// Vertical gap in points
    Spacer(f32),
    PageBreak,
}

/// ASCII-safe text for the builtin PDF fonts
///
/// Known glyphs become short tokens (`✅` → `[OK]`), typographic dashes and
/// quotes become ASCII, and any remaining emoji becomes `[name]`.
pub fn clean_text_for_pdf(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        match PUNCTUATION_REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => cleaned.push_str(to),
            None => cleaned.push(c),
        }
    }
    for (glyph, replacement) in GLYPH_REPLACEMENTS {
        if cleaned.contains(glyph) {
            cleaned = cleaned.replace(glyph, replacement);
        }
    }
    replace_emojis_with_text(&cleaned, EmojiTextFormat::Brackets)
}

/// Lower Markdown to blocks, joining consecutive plain lines into paragraphs
pub fn markdown_to_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    fn flush(buffer: &mut Vec<&str>, blocks: &mut Vec<Block>) {
        if !buffer.is_empty() {
            blocks.push(Block::Body(clean_text_for_pdf(&buffer.join(" "))));
            buffer.clear();
        }
    }

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            flush(&mut buffer, &mut blocks);
            blocks.push(Block::Spacer(6.0));
            continue;
        }

        let block = if let Some(rest) = line.strip_prefix("# ") {
            Block::Title(clean_text_for_pdf(rest))
        } else if let Some(rest) = line.strip_prefix("## ") {
            Block::Heading(clean_text_for_pdf(rest))
        } else if let Some(rest) = line.strip_prefix("### ") {
            Block::Bold(clean_text_for_pdf(rest))
        } else if line.starts_with('>') {
            Block::Quote(clean_text_for_pdf(line.trim_start_matches(['>', ' '])))
        } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            Block::Bullet(clean_text_for_pdf(rest))
        } else {
            buffer.push(line);
            continue;
        };
        flush(&mut buffer, &mut blocks);
        blocks.push(block);
    }
    flush(&mut buffer, &mut blocks);
    blocks
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn or_na(value: Option<&str>) -> String {
    clean_text_for_pdf(value.unwrap_or("N/A"))
}

/// One document: title, subtitle, protocol fields, body and a footer line
pub fn document_blocks(doc: DocumentRef<'_>) -> Vec<Block> {
    let parsed = doc.parsed();
    let mut blocks = vec![Block::Title(clean_text_for_pdf(parsed.display_title()))];
    if let Some(subtitle) = &parsed.subtitle {
        blocks.push(Block::Heading(clean_text_for_pdf(subtitle)));
    }

    if let Some(protocol) = doc.protocol() {
        blocks.push(Block::Spacer(10.0));
        blocks.push(Block::Meta(format!("Protocol: {}", or_na(protocol.protocol_id.as_deref()))));
        blocks.push(Block::Meta(format!("Category: {}", or_na(protocol.category.as_deref()))));
        blocks.push(Block::Meta(format!("Status: {}", or_na(protocol.status.as_deref()))));
        blocks.push(Block::Meta(format!(
            "Date: {}",
            or_na(protocol.discovery_date.as_deref())
        )));
    }

    blocks.push(Block::Spacer(20.0));
    blocks.extend(markdown_to_blocks(&parsed.content));
    blocks.push(Block::Spacer(30.0));
    blocks.push(Block::Meta(format!("Generated by Samuel Clemens | {}", today())));
    blocks
}

fn protocol_heading(protocol: &ProtocolDocument) -> String {
    match protocol.protocol_number {
        Some(n) => format!("Protocol {}: {}", n, protocol.display_title()),
        None => protocol.display_title().to_string(),
    }
}

/// Cover, optional contents page, then one page per protocol
pub fn protocols_blocks(protocols: &[ProtocolDocument], config: &PdfConfig) -> Vec<Block> {
    let mut blocks = vec![
        Block::Spacer(144.0),
        Block::Title("NSPFRP Protocol Documentation".to_string()),
        Block::Spacer(36.0),
        Block::Heading(format!("{} Protocols", protocols.len())),
        Block::Spacer(72.0),
        Block::Meta(format!("Generated: {}", today())),
        Block::PageBreak,
    ];

    if config.include_toc {
        blocks.push(Block::Heading("Table of Contents".to_string()));
        blocks.push(Block::Spacer(20.0));
        for (i, protocol) in protocols.iter().enumerate() {
            blocks.push(Block::Body(format!(
                "{}. {}",
                i + 1,
                clean_text_for_pdf(&protocol_heading(protocol))
            )));
        }
        blocks.push(Block::PageBreak);
    }

    for protocol in protocols {
        blocks.push(Block::Title(clean_text_for_pdf(protocol.display_title())));
        if let Some(subtitle) = &protocol.subtitle {
            blocks.push(Block::Heading(clean_text_for_pdf(subtitle)));
        }
        blocks.push(Block::Spacer(10.0));
        blocks.push(Block::Table {
            header: None,
            rows: vec![
                vec!["Number".to_string(), or_na(protocol.protocol_id.as_deref())],
                vec!["Category".to_string(), or_na(protocol.category.as_deref())],
                vec!["Status".to_string(), or_na(protocol.status.as_deref())],
                vec!["Date".to_string(), or_na(protocol.discovery_date.as_deref())],
            ],
        });
        blocks.push(Block::Spacer(20.0));

        if let Some(emergent) = &protocol.emergent_observation {
            blocks.push(Block::Heading("Emergent Observation".to_string()));
            blocks.extend(markdown_to_blocks(truncate_chars(
                &emergent.content,
                EMERGENT_EXCERPT_CHARS,
            )));
        }

        if !protocol.checkmarks.is_empty() {
            blocks.push(Block::Heading("Key Points".to_string()));
            for item in protocol.checkmarks.iter().take(KEY_POINT_LIMIT) {
                blocks.push(Block::Body(format!("[OK] {}", clean_text_for_pdf(item))));
            }
        }
        blocks.push(Block::PageBreak);
    }
    blocks
}

/// Title, date and a one-row-per-protocol table
pub fn summary_blocks(protocols: &[ProtocolDocument], title: &str) -> Vec<Block> {
    let rows = protocols
        .iter()
        .map(|p| {
            vec![
                p.protocol_id.clone().unwrap_or_else(|| "-".to_string()),
                clean_text_for_pdf(truncate_chars(p.display_title(), SUMMARY_TITLE_CHARS)),
                clean_text_for_pdf(truncate_chars(
                    p.category.as_deref().unwrap_or("-"),
                    SUMMARY_CATEGORY_CHARS,
                )),
                if p.is_operational() { "OK" } else { "?" }.to_string(),
            ]
        })
        .collect();

    vec![
        Block::Title(clean_text_for_pdf(title)),
        Block::Meta(format!("Generated: {}", today())),
        Block::Spacer(20.0),
        Block::Table {
            header: Some(
                ["#", "Protocol", "Category", "Status"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ),
            rows,
        },
    ]
}

/// Title, byline, epigraph and body of anything [`Renderable`]
pub fn story_blocks<R: Renderable + ?Sized>(story: &R) -> Vec<Block> {
    let mut blocks = vec![Block::Title(clean_text_for_pdf(story.title()))];
    if let Some(byline) = story.byline() {
        blocks.push(Block::Meta(clean_text_for_pdf(&byline)));
    }
    blocks.push(Block::Spacer(40.0));

    if let Some((text, source)) = story.quote() {
        blocks.push(Block::Quote(format!("\"{}\"", clean_text_for_pdf(text))));
        blocks.push(Block::Meta(clean_text_for_pdf(&format!("— {}", source))));
        blocks.push(Block::Spacer(30.0));
    }

    blocks.extend(markdown_to_blocks(story.body()));
    blocks.push(Block::Spacer(30.0));
    blocks.push(Block::Meta("MarkTwainVerse Authorized Visitor Log".to_string()));
    blocks
}

/// A file collected for an anthology
#[derive(Debug, Clone, PartialEq)]
pub struct AnthologyEntry {
    /// Contents line: the first line without `#`, or the file stem
    pub heading: String,
    /// Full text, `None` when the file could not be read
    pub content: Option<String>,
}

/// Cover, contents page, then every readable entry on its own pages
pub fn anthology_blocks(entries: &[AnthologyEntry], title: &str) -> Vec<Block> {
    let mut blocks = vec![
        Block::Spacer(144.0),
        Block::Title(clean_text_for_pdf(title)),
        Block::Spacer(36.0),
        Block::Heading(format!("{} Tales from the Frontier", entries.len())),
        Block::Spacer(72.0),
        Block::Meta(format!("Generated: {}", today())),
        Block::PageBreak,
        Block::Heading("Table of Contents".to_string()),
        Block::Spacer(20.0),
    ];
    for (i, entry) in entries.iter().enumerate() {
        blocks.push(Block::Body(format!(
            "{}. {}",
            i + 1,
            clean_text_for_pdf(&entry.heading)
        )));
    }
    blocks.push(Block::PageBreak);

    for content in entries.iter().filter_map(|e| e.content.as_deref()) {
        blocks.extend(markdown_to_blocks(content));
        blocks.push(Block::PageBreak);
    }
    blocks
}
