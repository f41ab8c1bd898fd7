use anyhow::Result;
use std::path::Path;

use clemens_config::ClemensConfig;
use clemens_export::{export_protocols_to_pdf, export_summary_pdf};

use crate::output;

/// A missing PDF backend is reported, not treated as a failure
pub fn execute(
    config: &ClemensConfig,
    folder: &Path,
    out: &Path,
    summary: bool,
    title: Option<&str>,
) -> Result<()> {
    let protocols = super::load_protocols(config, folder)?;
    if protocols.is_empty() {
        output::warning(&format!("No protocols found in {}", folder.display()));
        return Ok(());
    }

    let result = if summary {
        export_summary_pdf(&protocols, out, title, &config.pdf)
    } else {
        export_protocols_to_pdf(&protocols, out, &config.pdf)
    };

    match result {
        Ok(path) => {
            output::success(&format!(
                "Wrote {} protocols to {}",
                protocols.len(),
                path.display()
            ));
            Ok(())
        }
        Err(e) if e.is_soft() => {
            output::warning(&e.to_string());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
