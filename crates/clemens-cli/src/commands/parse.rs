use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use clemens_config::ClemensConfig;
use clemens_parser::{Document, FolderScan};

use crate::cli::OutputFormat;
use crate::output;

pub fn execute(
    config: &ClemensConfig,
    path: &Path,
    protocol: bool,
    recursive: bool,
    pattern: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let parser = super::parser(config);

    let documents: Vec<Document> = if path.is_file() {
        let doc = if protocol {
            Document::from(parser.parse_protocol(path)?)
        } else {
            Document::from(parser.parse_file(path)?)
        };
        vec![doc]
    } else if path.is_dir() {
        let scan = FolderScan::new(pattern.unwrap_or_else(|| config.extraction.default_pattern.clone()))
            .recursive(recursive)
            .as_protocols(protocol);
        parser
            .parse_folder(path, &scan)
            .with_context(|| format!("Failed to scan {}", path.display()))?
    } else {
        bail!("Path not found: {}", path.display());
    };

    info!("Parsed {} documents", documents.len());

    match format {
        OutputFormat::Table => output::print_documents(&documents),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&documents)?),
    }
    Ok(())
}
