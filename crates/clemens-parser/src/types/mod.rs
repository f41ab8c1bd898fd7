//! Data types produced by the extractors

mod document;
mod emoji;
mod metadata;
mod section;
mod table;

pub use document::{Document, ParsedDocument, ProtocolDocument};
pub use emoji::{EmojiCategory, EmojiInfo};
pub use metadata::{MetadataBlock, ProtocolReference};
pub use section::{walk_sections, Section, SectionIter};
pub use table::{Quote, TableData};
