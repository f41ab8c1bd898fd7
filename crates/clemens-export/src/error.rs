//! Export errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while rendering or writing an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// An optional backend was not compiled in
    #[error("{dependency} is not available; rebuild with the `{feature}` feature")]
    DependencyMissing {
        dependency: &'static str,
        feature: &'static str,
    },

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether callers should report this as a warning and carry on
    pub fn is_soft(&self) -> bool {
        matches!(self, ExportError::DependencyMissing { .. })
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_missing_is_soft() {
        let err = ExportError::DependencyMissing {
            dependency: "printpdf",
            feature: "pdf",
        };
        assert!(err.is_soft());
        assert_eq!(
            err.to_string(),
            "printpdf is not available; rebuild with the `pdf` feature"
        );
    }

    #[test]
    fn test_io_is_hard() {
        let err = ExportError::io("out/a.md", io::Error::other("disk full"));
        assert!(!err.is_soft());
        assert!(err.to_string().contains("out/a.md"));
    }
}
