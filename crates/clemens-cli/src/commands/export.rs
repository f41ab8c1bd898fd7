use anyhow::Result;
use std::path::Path;
use tracing::info;

use clemens_config::ClemensConfig;
use clemens_export::{
    export_emoji_report, export_folder_summary, export_markdown_with, export_protocol_index,
    export_structure_analysis, export_to_json, SummaryFormat,
};
use clemens_parser::{Document, ProtocolDocument};

use crate::output;

/// Per-document summaries under `documents/`, folder reports at the top
pub fn execute(config: &ClemensConfig, folder: &Path, out: &Path, protocols_only: bool) -> Result<()> {
    let documents = super::load_documents(config, folder, protocols_only)?;
    if documents.is_empty() {
        output::warning(&format!("No documents found in {}", folder.display()));
        return Ok(());
    }

    let per_doc = out.join("documents");
    for doc in &documents {
        let stem = doc
            .filepath
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| doc.filename.clone());
        export_markdown_with(doc, per_doc.join(format!("{}.md", stem)), &config.export)?;
        export_to_json(doc, per_doc.join(format!("{}.json", stem)), config.export.pretty_json)?;
    }
    info!("Exported {} documents to {}", documents.len(), per_doc.display());

    let mut written = vec![
        export_folder_summary(&documents, out.join("summary.md"), SummaryFormat::Markdown)?,
        export_folder_summary(&documents, out.join("summary.json"), SummaryFormat::Json)?,
        export_emoji_report(&documents, out.join("emoji_report.md"))?,
        export_structure_analysis(&documents, out.join("structure.md"))?,
    ];

    let protocols: Vec<ProtocolDocument> = documents
        .iter()
        .filter_map(Document::as_protocol)
        .cloned()
        .collect();
    if !protocols.is_empty() {
        written.push(export_protocol_index(&protocols, out.join("protocol_index.md"))?);
    }

    output::success(&format!(
        "Exported {} documents to {}",
        documents.len(),
        out.display()
    ));
    for path in &written {
        output::wrote(path);
    }
    Ok(())
}
