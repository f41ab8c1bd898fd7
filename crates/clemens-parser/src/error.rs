//! Parser error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or scanning documents
#[derive(Debug, Error)]
pub enum ParserError {
    /// File or folder does not exist
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    /// A folder was expected
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Reading failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid UTF-8
    #[error("File is not valid UTF-8: {0}")]
    Encoding(PathBuf),

    /// Glob pattern could not be compiled
    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ParserError {
    /// Build from an IO error, mapping `NotFound` and invalid data to their own variants
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::InvalidData => Self::Encoding(path),
            _ => Self::Io { path, source },
        }
    }

    /// Whether a folder scan may skip the file and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Encoding(_))
    }
}

/// Specialized Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;
