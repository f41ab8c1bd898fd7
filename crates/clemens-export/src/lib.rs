//! Clemens Exporters
//!
//! Turns parsed documents into files people read:
//! - Markdown and JSON summaries of single documents
//! - Folder-level summary, emoji, structure and protocol-index reports
//! - An Obsidian vault with `[[wikilinks]]` between protocols and entities
//! - PDF volumes (with the `pdf` feature)
//!
//! ```rust,no_run
//! use clemens_config::ClemensConfig;
//! use clemens_export::{export_obsidian_vault, export_protocol_index};
//! use clemens_parser::{Document, DocumentParser};
//!
//! let config = ClemensConfig::default();
//! let parser = DocumentParser::new(config.extraction.clone());
//! let protocols = parser.parse_protocols("protocols/")?;
//! export_protocol_index(&protocols, "out/index.md")?;
//!
//! let documents: Vec<Document> = protocols.into_iter().map(Document::from).collect();
//! export_obsidian_vault(&documents, "vault/", &config.obsidian)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod format;
pub mod obsidian;
pub mod pdf;
pub mod report;

pub use error::{ExportError, ExportResult};
pub use format::{format_thousands, slugify, DocumentRef};
pub use obsidian::{
    add_wikilinks, create_entity_pages, export_obsidian_vault, extract_entities,
    protocol_to_obsidian_page, ObsidianPage, ObsidianVault, WikiLink,
};
pub use pdf::{
    clean_text_for_pdf, export_anthology_to_pdf, export_document_to_pdf, export_protocols_to_pdf,
    export_story_to_pdf, export_summary_pdf, Renderable, Story,
};
pub use report::{
    export_emoji_report, export_folder_summary, export_markdown_with, export_protocol_index,
    export_structure_analysis, export_to_json, export_to_markdown, SummaryFormat,
};
