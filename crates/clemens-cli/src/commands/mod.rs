pub mod config;
pub mod export;
pub mod parse;
pub mod pdf;
pub mod vault;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use clemens_config::ClemensConfig;
use clemens_parser::{Document, DocumentParser, ProtocolDocument};

pub(crate) fn parser(config: &ClemensConfig) -> DocumentParser {
    DocumentParser::new(config.extraction.clone())
}

/// Protocols found by prefix, in number order
pub(crate) fn load_protocols(config: &ClemensConfig, folder: &Path) -> Result<Vec<ProtocolDocument>> {
    parser(config)
        .parse_protocols(folder)
        .with_context(|| format!("Failed to scan {}", folder.display()))
}

/// Protocols first, then every other Markdown file as a generic document
pub(crate) fn load_documents(
    config: &ClemensConfig,
    folder: &Path,
    protocols_only: bool,
) -> Result<Vec<Document>> {
    let parser = parser(config);
    let protocols = load_protocols(config, folder)?;
    let protocol_files: HashSet<String> = protocols.iter().map(|p| p.filename.clone()).collect();
    let mut documents: Vec<Document> = protocols.into_iter().map(Document::from).collect();

    if !protocols_only {
        let others = parser
            .parse_folder(folder, &parser.default_scan())
            .with_context(|| format!("Failed to scan {}", folder.display()))?;
        documents.extend(
            others
                .into_iter()
                .filter(|doc| !protocol_files.contains(&doc.filename)),
        );
    }

    debug!("Loaded {} documents from {}", documents.len(), folder.display());
    Ok(documents)
}
