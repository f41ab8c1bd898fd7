//! Test utilities for parser-related tests.
//!
//! Enable with the `test-utils` feature.
//!
//! # Usage
//!
//! In `Cargo.toml`:
//! ```toml
//! [dev-dependencies]
//! clemens-parser = { path = "../clemens-parser", features = ["test-utils"] }
//! ```
//!
//! In tests:
//! ```rust,ignore
//! use clemens_parser::test_utils::{protocol_markdown, ProtocolFixture};
//!
//! let folder = ProtocolFixture::new().protocol(3, "Crossing", "✅ OPERATIONAL").build()?;
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{DocumentParser, ProtocolDocument};

/// Markdown for a small protocol document
///
/// The text has a title, subtitle, metadata block, emergent observation,
/// checkmark list, a reference to the previous protocol and an emoji footer.
pub fn protocol_markdown(number: u32, title: &str, status: &str) -> String {
    let previous = number.saturating_sub(1).max(1);
    format!(
        "# PROTOCOL {number}: {title}\n\
         ## Field notes on {title}\n\
         \n\
         **Protocol Number:** {number}\n\
         **Category:** Navigation\n\
         **Status:** {status}\n\
         **Discovery Date:** 1867-0{month}-01\n\
         \n\
         ## 🎯 Emergent Observation\n\
         The river taught {title}. Builds on Protocol {previous}: earlier soundings.\n\
         \n\
         ## Key Points\n\
         - ✅ Watch the water\n\
         - ✅ Trust the leadsman\n\
         \n\
         > Twain was here. — Mark Twain\n\
         \n\
         | Mark | Depth |\n\
         |------|-------|\n\
         | one | 6 ft |\n\
         \n\
         🌊🚀✨\n",
        month = number % 9 + 1,
    )
}

/// Parse in-memory protocol text with default settings
pub fn parse_protocol_text(content: &str, path: &str) -> ProtocolDocument {
    DocumentParser::default().parse_protocol_str(content, path)
}

/// Builder for a temporary folder of documents
#[derive(Default)]
pub struct ProtocolFixture {
    files: Vec<(String, Vec<u8>)>,
}

impl ProtocolFixture {
    /// Empty fixture
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `PROTOCOL_{number}.md`
    pub fn protocol(self, number: u32, title: &str, status: &str) -> Self {
        let name = format!("PROTOCOL_{}.md", number);
        self.file(name, protocol_markdown(number, title, status))
    }

    /// Add a file with text content
    pub fn file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((name.into(), content.into().into_bytes()));
        self
    }

    /// Add a file that is not valid UTF-8
    pub fn malformed(mut self, name: impl Into<String>) -> Self {
        self.files.push((name.into(), vec![b'#', b' ', 0xff, 0xfe, 0xfd, b'\n']));
        self
    }

    /// Write every file into a new temporary folder
    pub fn build(self) -> io::Result<TempDir> {
        let dir = TempDir::new()?;
        for (name, bytes) in &self.files {
            write_file(dir.path(), name, bytes)?;
        }
        Ok(dir)
    }
}

/// Write `bytes` to `root/name`, creating parent folders
pub fn write_file(root: &Path, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_markdown_parses() {
        let protocol = parse_protocol_text(&protocol_markdown(5, "Fog", "✅ OPERATIONAL"), "p.md");
        assert_eq!(protocol.protocol_number, Some(5));
        assert!(protocol.is_operational());
        assert_eq!(protocol.checkmarks.len(), 3);
        assert_eq!(protocol.footer_emojis, vec!["🌊", "🚀", "✨"]);
        assert!(protocol.has_tables());
        assert!(protocol.has_quotes());
    }

    #[test]
    fn test_fixture_writes_files() {
        let dir = ProtocolFixture::new()
            .protocol(1, "Start", "draft")
            .file("notes/readme.md", "# Readme")
            .malformed("broken.md")
            .build()
            .unwrap();
        assert!(dir.path().join("PROTOCOL_1.md").is_file());
        assert!(dir.path().join("notes/readme.md").is_file());
        assert!(fs::read_to_string(dir.path().join("broken.md")).is_err());
    }
}
