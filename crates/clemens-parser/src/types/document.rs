//! Parsed documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::{Path, PathBuf};

use super::{EmojiInfo, MetadataBlock, ProtocolReference, Quote, Section, TableData};

/// Structure extracted from one Markdown file
///
/// Built once by the parser and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Path the document was read from
    pub filepath: PathBuf,

    /// Final path component
    pub filename: String,

    /// Full text
    pub content: String,

    /// Text of the first `# ` line
    pub title: Option<String>,

    /// Text of a `## ` line directly after the title
    pub subtitle: Option<String>,

    /// Top-level sections
    pub sections: Vec<Section>,

    /// Pipe tables in document order
    pub tables: Vec<TableData>,

    /// Blockquotes in document order
    pub quotes: Vec<Quote>,

    /// Distinct emoji in first-seen order
    pub emojis: Vec<EmojiInfo>,

    /// Whitespace-delimited tokens
    pub word_count: usize,

    /// Number of lines
    pub line_count: usize,

    /// When the document was parsed
    pub parsed_at: DateTime<Utc>,
}

impl ParsedDocument {
    /// Whether any table was found
    pub fn has_tables(&self) -> bool {
        !self.tables.is_empty()
    }

    /// Whether any blockquote was found
    pub fn has_quotes(&self) -> bool {
        !self.quotes.is_empty()
    }

    /// Total emoji occurrences
    pub fn emoji_count(&self) -> usize {
        self.emojis.iter().map(|e| e.count).sum()
    }

    /// First section, depth-first, whose title contains `needle` (case-insensitive)
    pub fn find_section(&self, needle: &str) -> Option<&Section> {
        let needle = needle.to_lowercase();
        self.all_sections()
            .find(|section| section.title.to_lowercase().contains(&needle))
    }

    /// Every section in the forest, depth-first
    pub fn all_sections(&self) -> impl Iterator<Item = &Section> {
        super::walk_sections(&self.sections)
    }

    /// Title, falling back to the file name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.filename)
    }

    /// Path the document was read from
    pub fn path(&self) -> &Path {
        &self.filepath
    }
}

/// A document following the numbered-protocol conventions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolDocument {
    /// The generic structure
    #[serde(flatten)]
    pub document: ParsedDocument,

    /// Header fields
    pub metadata: MetadataBlock,

    /// Number parsed from the title
    pub protocol_number: Option<u32>,

    /// `P{number}`
    pub protocol_id: Option<String>,

    pub category: Option<String>,
    pub status: Option<String>,
    pub discovery_date: Option<String>,
    pub protocol_type: Option<String>,

    /// First section, depth-first, whose title mentions "emergent"
    pub emergent_observation: Option<Section>,

    /// First section, depth-first, whose title mentions "conclusion"
    pub conclusion: Option<Section>,

    /// Items marked with a checkmark glyph
    pub checkmarks: Vec<String>,

    /// Other protocols mentioned, ascending by number
    pub protocol_references: Vec<ProtocolReference>,

    /// Distinct glyphs of an emoji-dense closing line
    pub footer_emojis: Vec<String>,
}

impl ProtocolDocument {
    /// Wrap a parsed document with no protocol fields set
    pub fn from_document(document: ParsedDocument) -> Self {
        Self {
            document,
            metadata: MetadataBlock::default(),
            protocol_number: None,
            protocol_id: None,
            category: None,
            status: None,
            discovery_date: None,
            protocol_type: None,
            emergent_observation: None,
            conclusion: None,
            checkmarks: Vec::new(),
            protocol_references: Vec::new(),
            footer_emojis: Vec::new(),
        }
    }

    /// Status mentions OPERATIONAL
    pub fn is_operational(&self) -> bool {
        self.status_contains("OPERATIONAL")
    }

    /// Status mentions EMERGENT
    pub fn is_emergent(&self) -> bool {
        self.status_contains("EMERGENT")
    }

    fn status_contains(&self, marker: &str) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.to_uppercase().contains(marker))
    }

    /// Unwrap into the generic document
    pub fn into_document(self) -> ParsedDocument {
        self.document
    }
}

impl Deref for ProtocolDocument {
    type Target = ParsedDocument;

    fn deref(&self) -> &ParsedDocument {
        &self.document
    }
}

/// Output of a folder scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Document {
    Generic(ParsedDocument),
    Protocol(Box<ProtocolDocument>),
}

impl Document {
    /// The generic structure of either variant
    pub fn parsed(&self) -> &ParsedDocument {
        match self {
            Document::Generic(doc) => doc,
            Document::Protocol(protocol) => &protocol.document,
        }
    }

    /// The protocol view, if this is a protocol
    pub fn as_protocol(&self) -> Option<&ProtocolDocument> {
        match self {
            Document::Protocol(protocol) => Some(protocol),
            Document::Generic(_) => None,
        }
    }
}

impl From<ParsedDocument> for Document {
    fn from(doc: ParsedDocument) -> Self {
        Document::Generic(doc)
    }
}

impl From<ProtocolDocument> for Document {
    fn from(protocol: ProtocolDocument) -> Self {
        Document::Protocol(Box::new(protocol))
    }
}

impl Deref for Document {
    type Target = ParsedDocument;

    fn deref(&self) -> &ParsedDocument {
        self.parsed()
    }
}
