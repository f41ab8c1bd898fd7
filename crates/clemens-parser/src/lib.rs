//! Clemens Document Parser
//!
//! Structure extraction for Markdown protocol documents. This crate provides:
//! - Emoji detection with names, categories and positions
//! - Heading outlines with configurable nesting
//! - Pipe tables, blockquotes and `**Field:** value` metadata
//! - Checkmark items and protocol cross-references
//! - Single-file and folder parsing into [`ParsedDocument`] / [`ProtocolDocument`]
//!
//! ```rust,no_run
//! use clemens_parser::{DocumentParser, FolderScan};
//!
//! let parser = DocumentParser::default();
//! let protocols = parser.parse_protocols("protocols/")?;
//! for protocol in &protocols {
//!     println!("{:?} {}", protocol.protocol_id, protocol.display_title());
//! }
//! let all = parser.parse_folder("notes/", &FolderScan::default().recursive(true))?;
//! # Ok::<(), clemens_parser::ParserError>(())
//! ```

pub mod blockquotes;
pub mod emoji;
pub mod error;
pub mod metadata;
pub mod parser;
pub mod references;
pub mod sections;
pub mod tables;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use blockquotes::extract_quotes;
pub use emoji::{
    analyze_emoji_usage, count_emojis, emoji_categories, emoji_density, emoji_to_text,
    extract_emojis, replace_emojis_with_text, strip_emojis, EmojiAnalysis, EmojiTextFormat,
};
pub use error::{ParserError, ParserResult};
pub use metadata::extract_metadata;
pub use parser::{DocumentParser, FolderScan};
pub use references::{extract_checkmarks, extract_protocol_references, Specificity};
pub use sections::{
    all_section_titles, extract_conclusion, extract_sections, find_section_by_emoji,
    find_section_by_title,
};
pub use tables::extract_tables;
pub use types::{
    Document, EmojiCategory, EmojiInfo, MetadataBlock, ParsedDocument, ProtocolDocument,
    ProtocolReference, Quote, Section, TableData,
};

pub use clemens_config::{ExtractionConfig, SectionNesting};
