//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, parsing or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// File that could not be accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed or produced
    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(String),

    /// YAML could not be parsed or produced
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not map to a supported (or enabled) format
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A value is present but outside its allowed range
    #[error("Invalid configuration: {field}: {message}")]
    Validation {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Specialized Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
