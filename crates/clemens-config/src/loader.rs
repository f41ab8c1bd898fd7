//! Configuration loading
//!
//! Precedence: defaults < config file < environment.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ClemensConfig;
use crate::error::{ConfigError, ConfigResult};

/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "CLEMENS_LOG_LEVEL";
/// Environment variable overriding `obsidian.vault_name`
pub const ENV_VAULT_NAME: &str = "CLEMENS_VAULT_NAME";
/// Environment variable overriding `extraction.footer_emoji_density`
pub const ENV_FOOTER_DENSITY: &str = "CLEMENS_FOOTER_DENSITY";

/// Serialization format of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    #[cfg(feature = "toml")]
    Toml,
    /// `.yaml` / `.yml`
    #[cfg(feature = "yaml")]
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            #[cfg(feature = "toml")]
            "toml" => Ok(ConfigFormat::Toml),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            other => Err(ConfigError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            })),
        }
    }
}

/// Loads and saves [`ClemensConfig`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parse configuration text in the given format and validate it
    pub fn from_str(content: &str, format: ConfigFormat) -> ConfigResult<ClemensConfig> {
        let config: ClemensConfig = match format {
            #[cfg(feature = "toml")]
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::Toml(e.to_string()))?
            }
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the format from its extension
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<ClemensConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_str(&content, format)
    }

    /// Load with the standard precedence.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when present, otherwise built-in defaults.
    pub fn load(config_file: Option<&Path>) -> ConfigResult<ClemensConfig> {
        let mut config = match config_file {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path)?,
                _ => ClemensConfig::default(),
            },
        };

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply `CLEMENS_*` environment overrides; unparsable values are ignored
    pub fn apply_env_overrides(config: &mut ClemensConfig) {
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }
        if let Ok(name) = std::env::var(ENV_VAULT_NAME) {
            config.obsidian.vault_name = name;
        }
        if let Ok(raw) = std::env::var(ENV_FOOTER_DENSITY) {
            match raw.parse::<f64>() {
                Ok(density) => config.extraction.footer_emoji_density = density,
                Err(_) => warn!("Ignoring {}={:?}: not a number", ENV_FOOTER_DENSITY, raw),
            }
        }
    }

    /// `~/.config/clemens/config.toml`, if a config directory exists
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clemens").join("config.toml"))
    }

    /// Serialize a config to a file, format chosen by extension
    pub fn save_to_file(config: &ClemensConfig, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            #[cfg(feature = "toml")]
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| ConfigError::Toml(e.to_string()))?
            }
            #[cfg(feature = "yaml")]
            ConfigFormat::Yaml => serde_yaml::to_string(config)?,
            ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        };
        Self::write(path, &content)
    }

    /// Write the commented example config, creating parent directories
    pub fn write_example(path: impl AsRef<Path>) -> ConfigResult<()> {
        Self::write(path.as_ref(), ClemensConfig::example_toml())
    }

    fn write(path: &Path, content: &str) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        std::fs::write(path, content).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SectionNesting;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.JSON")).unwrap(),
            ConfigFormat::Json
        );
        #[cfg(feature = "toml")]
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.toml")).unwrap(),
            ConfigFormat::Toml
        );
        #[cfg(feature = "yaml")]
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("config.ini")),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ConfigLoader::from_str(
            r#"{"extraction": {"section_nesting": "level_table"}}"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert_eq!(config.extraction.section_nesting, SectionNesting::LevelTable);
        assert_eq!(config.extraction.footer_emoji_density, 0.5);
        assert_eq!(config.obsidian.vault_name, "MarkTwainVerse");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let result = ConfigLoader::from_str(
            r#"{"extraction": {"footer_emoji_density": 2.0}}"#,
            ConfigFormat::Json,
        );
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_example_toml_parses() {
        let config = ConfigLoader::from_str(ClemensConfig::example_toml(), ConfigFormat::Toml)
            .expect("example config must stay loadable");
        assert_eq!(config, ClemensConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = ConfigLoader::load(Some(Path::new("/definitely/not/here/clemens.json")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
