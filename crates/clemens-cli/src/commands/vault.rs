use anyhow::Result;
use std::path::Path;

use clemens_config::ClemensConfig;
use clemens_export::export_obsidian_vault;

use crate::output;

pub fn execute(
    mut config: ClemensConfig,
    folder: &Path,
    out: &Path,
    name: Option<String>,
) -> Result<()> {
    if let Some(name) = name {
        config.obsidian.vault_name = name;
    }

    let documents = super::load_documents(&config, folder, false)?;
    if documents.is_empty() {
        output::warning(&format!("No documents found in {}", folder.display()));
        return Ok(());
    }

    let vault = export_obsidian_vault(&documents, out, &config.obsidian)?;
    output::success(&format!(
        "Vault '{}' written to {} ({} pages)",
        vault.name,
        out.display(),
        vault.len()
    ));
    Ok(())
}
