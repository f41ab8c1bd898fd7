//! Test utilities for configuration testing.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::{ClemensConfig, SectionNesting};

/// Builder for test configurations
pub struct TestConfigBuilder {
    config: ClemensConfig,
}

impl TestConfigBuilder {
    /// Start from defaults
    pub fn new() -> Self {
        Self {
            config: ClemensConfig::default(),
        }
    }

    /// Set the footer emoji density threshold
    pub fn footer_density(mut self, density: f64) -> Self {
        self.config.extraction.footer_emoji_density = density;
        self
    }

    /// Set the heading nesting strategy
    pub fn nesting(mut self, nesting: SectionNesting) -> Self {
        self.config.extraction.section_nesting = nesting;
        self
    }

    /// Set the vault name
    pub fn vault_name(mut self, name: impl Into<String>) -> Self {
        self.config.obsidian.vault_name = name.into();
        self
    }

    /// Replace the known entity list
    pub fn known_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.obsidian.known_entities = entities.into_iter().map(Into::into).collect();
        self
    }

    /// Finish building
    pub fn build(self) -> ClemensConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `content` to a temporary file with the given extension
pub fn temp_config_file(content: &str, extension: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}
