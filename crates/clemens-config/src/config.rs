//! Configuration types
//!
//! Every section is `#[serde(default)]` so a partial file only overrides the
//! fields it names.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Root configuration for document processing and export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClemensConfig {
    /// Structure extraction settings
    pub extraction: ExtractionConfig,
    /// Obsidian vault export settings
    pub obsidian: ObsidianConfig,
    /// Markdown / JSON report settings
    pub export: ExportConfig,
    /// PDF layout settings
    pub pdf: PdfConfig,
    /// Logging settings used by the command-line driver
    pub logging: LoggingConfig,
}

impl ClemensConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        let density = self.extraction.footer_emoji_density;
        if !(density > 0.0 && density <= 1.0) {
            return Err(ConfigError::validation(
                "extraction.footer_emoji_density",
                format!("must be in (0, 1], got {density}"),
            ));
        }
        if self.obsidian.vault_name.trim().is_empty() {
            return Err(ConfigError::validation(
                "obsidian.vault_name",
                "must not be empty",
            ));
        }
        if self.extraction.default_pattern.trim().is_empty() {
            return Err(ConfigError::validation(
                "extraction.default_pattern",
                "must not be empty",
            ));
        }
        if self.pdf.body_size <= 0.0 || self.pdf.title_size <= 0.0 || self.pdf.heading_size <= 0.0 {
            return Err(ConfigError::validation("pdf", "font sizes must be positive"));
        }
        Ok(())
    }

    /// Commented example file written by `clemens config init`
    pub fn example_toml() -> &'static str {
        r#"# Clemens configuration
# Location: ~/.config/clemens/config.toml

[extraction]
# A trailing line counts as an emoji footer when more than this share
# of its characters are emoji. Must be in (0, 1].
footer_emoji_density = 0.5

# Heading nesting: "stack" (outline order) or "level_table"
# (legacy behaviour, a later sibling re-routes deeper headings)
section_nesting = "stack"

# Filename prefixes scanned by protocol batch parsing
protocol_prefixes = ["NSPFRP_", "PROTOCOL_", "P_", "NSP_"]

# Glob used by folder scans
default_pattern = "*.md"

[obsidian]
vault_name = "MarkTwainVerse"
add_links = true
create_entity_pages = true
emergent_excerpt_chars = 1000
document_excerpt_chars = 2000
max_key_points = 10

[export]
pretty_json = true
include_analysis = true
excerpt_chars = 500
max_listed = 10

[pdf]
page_size = "letter"
title_size = 24.0
heading_size = 16.0
body_size = 11.0
include_toc = true

[logging]
# off, error, warn, info, debug, trace
level = "warn"
"#
    }
}

/// Heading nesting strategy used by section extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionNesting {
    /// Outline nesting: a heading attaches to the closest open shallower heading
    #[default]
    Stack,
    /// A flat "most recent section per level" table; a later heading at
    /// level N becomes the parent for every subsequent deeper heading,
    /// even one that belongs to a different branch
    LevelTable,
}

/// Structure extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Emoji share above which the last non-blank line is a footer
    pub footer_emoji_density: f64,
    /// Heading nesting strategy
    pub section_nesting: SectionNesting,
    /// Filename prefixes for protocol batch parsing
    pub protocol_prefixes: Vec<String>,
    /// Glob pattern for folder scans
    pub default_pattern: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            footer_emoji_density: 0.5,
            section_nesting: SectionNesting::Stack,
            protocol_prefixes: default_protocol_prefixes(),
            default_pattern: "*.md".to_string(),
        }
    }
}

/// Prefixes used when none are configured
pub fn default_protocol_prefixes() -> Vec<String> {
    ["NSPFRP_", "PROTOCOL_", "P_", "NSP_"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Obsidian vault export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObsidianConfig {
    /// Vault name shown on the root index page
    pub vault_name: String,
    /// Names linked with `[[wikilinks]]` when found in page content
    pub known_entities: Vec<String>,
    /// Insert wikilinks into protocol pages
    pub add_links: bool,
    /// Write stub pages under `Entities/`
    pub create_entity_pages: bool,
    /// Characters of the emergent observation copied into a protocol page
    pub emergent_excerpt_chars: usize,
    /// Characters of a generic document copied into its page
    pub document_excerpt_chars: usize,
    /// Checkmark items listed per protocol page
    pub max_key_points: usize,
}

impl Default for ObsidianConfig {
    fn default() -> Self {
        Self {
            vault_name: "MarkTwainVerse".to_string(),
            known_entities: default_known_entities(),
            add_links: true,
            create_entity_pages: true,
            emergent_excerpt_chars: 1000,
            document_excerpt_chars: 2000,
            max_key_points: 10,
        }
    }
}

/// Entity names recognized out of the box
pub fn default_known_entities() -> Vec<String> {
    [
        "Mark Twain",
        "Samuel Clemens",
        "Lewis & Clark",
        "Marco Polo",
        "John Muir",
        "Nikola Tesla",
        "Alexander von Humboldt",
        "NSPFRP",
        "HHF-AI MRI",
        "Syntheverse",
        "Hero Host",
        "Gold Nugget",
        "Expedition",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Markdown / JSON report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Indent JSON output with two spaces
    pub pretty_json: bool,
    /// Add the analysis block to per-document Markdown
    pub include_analysis: bool,
    /// Characters of the emergent observation in Markdown summaries
    pub excerpt_chars: usize,
    /// Items listed before a list is elided
    pub max_listed: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            include_analysis: true,
            excerpt_chars: 500,
            max_listed: 10,
        }
    }
}

/// Paper size for PDF output
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// US Letter, 8.5 x 11 in
    #[default]
    Letter,
    /// ISO A4, 210 x 297 mm
    A4,
}

impl PageSize {
    /// Width and height in millimetres
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (215.9, 279.4),
            PageSize::A4 => (210.0, 297.0),
        }
    }
}

/// PDF layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Paper size
    pub page_size: PageSize,
    /// Left margin in inches
    pub margin_left: f32,
    /// Right margin in inches
    pub margin_right: f32,
    /// Top margin in inches
    pub margin_top: f32,
    /// Bottom margin in inches
    pub margin_bottom: f32,
    /// Builtin font for titles and headings
    pub title_font: String,
    /// Builtin font for body text
    pub body_font: String,
    /// Title size in points
    pub title_size: f32,
    /// Heading size in points
    pub heading_size: f32,
    /// Body size in points
    pub body_size: f32,
    /// Emit a contents page for multi-document exports
    pub include_toc: bool,
    /// Print the document title at the top of every page
    pub include_header: bool,
    /// Print page numbers at the bottom of every page
    pub include_footer: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin_left: 1.0,
            margin_right: 1.0,
            margin_top: 1.0,
            margin_bottom: 1.0,
            title_font: "Helvetica-Bold".to_string(),
            body_font: "Helvetica".to_string(),
            title_size: 24.0,
            heading_size: 16.0,
            body_size: 11.0,
            include_toc: true,
            include_header: true,
            include_footer: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level (off, error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
