//! Document assembly and folder scans
//!
//! [`DocumentParser`] runs every extractor over a file and assembles a
//! [`ParsedDocument`], or a [`ProtocolDocument`] when the file follows the
//! numbered-protocol conventions. Folder scans skip files that fail to read
//! and log a warning instead of aborting the batch.

use chrono::Utc;
use clemens_config::ExtractionConfig;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::blockquotes::extract_quotes;
use crate::emoji::{emoji_density, extract_emojis};
use crate::error::{ParserError, ParserResult};
use crate::metadata::extract_metadata;
use crate::references::{
    extract_checkmarks, extract_protocol_references, protocol_number_from_title,
};
use crate::sections::{extract_sections, find_section_by_title, split_lines};
use crate::tables::extract_tables;
use crate::types::{Document, ParsedDocument, ProtocolDocument};

/// Which files a folder scan picks up and how they are parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderScan {
    /// Glob matched against file names, e.g. `*.md`
    pub pattern: String,
    /// Descend into subfolders
    pub recursive: bool,
    /// Parse every file as a protocol
    pub as_protocols: bool,
}

impl FolderScan {
    /// Non-recursive scan of files matching `pattern`
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            recursive: false,
            as_protocols: false,
        }
    }

    /// Set whether subfolders are scanned
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether files are parsed as protocols
    pub fn as_protocols(mut self, as_protocols: bool) -> Self {
        self.as_protocols = as_protocols;
        self
    }
}

impl Default for FolderScan {
    fn default() -> Self {
        Self::new("*.md")
    }
}

/// Parses Markdown files into documents
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    config: ExtractionConfig,
}

impl DocumentParser {
    /// Create a parser with the given extraction settings
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extraction settings in use
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Scan with the configured default pattern
    pub fn default_scan(&self) -> FolderScan {
        FolderScan::new(self.config.default_pattern.clone())
    }

    /// Parse any text or Markdown file
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParserResult<ParsedDocument> {
        let path = path.as_ref();
        let content = read_document(path)?;
        Ok(self.parse_str(&content, path))
    }

    /// Parse a file with protocol-specific extraction
    pub fn parse_protocol(&self, path: impl AsRef<Path>) -> ParserResult<ProtocolDocument> {
        let path = path.as_ref();
        let content = read_document(path)?;
        Ok(self.parse_protocol_str(&content, path))
    }

    /// Parse in-memory content as if it had been read from `path`
    pub fn parse_str(&self, content: &str, path: impl Into<PathBuf>) -> ParsedDocument {
        let filepath = path.into();
        let lines = split_lines(content);
        let (title, subtitle) = title_and_subtitle(&lines);

        let document = ParsedDocument {
            filename: file_name(&filepath),
            filepath,
            content: content.to_string(),
            title,
            subtitle,
            sections: extract_sections(content, self.config.section_nesting),
            tables: extract_tables(content),
            quotes: extract_quotes(content),
            emojis: extract_emojis(content),
            word_count: content.split_whitespace().count(),
            line_count: lines.len(),
            parsed_at: Utc::now(),
        };

        debug!(
            "Parsed {}: {} sections, {} tables, {} quotes",
            document.filepath.display(),
            document.sections.len(),
            document.tables.len(),
            document.quotes.len()
        );
        document
    }

    /// Protocol counterpart of [`DocumentParser::parse_str`]
    pub fn parse_protocol_str(&self, content: &str, path: impl Into<PathBuf>) -> ProtocolDocument {
        let document = self.parse_str(content, path);
        let metadata = extract_metadata(content);
        let protocol_number = document
            .title
            .as_deref()
            .and_then(protocol_number_from_title);

        let emergent_observation = find_section_by_title(&document.sections, "EMERGENT").cloned();
        let conclusion = find_section_by_title(&document.sections, "CONCLUSION").cloned();
        let footer_emojis = self.footer_emojis(content);

        ProtocolDocument {
            protocol_number,
            protocol_id: protocol_number.map(|n| format!("P{}", n)),
            category: metadata.category.clone(),
            status: metadata.status.clone(),
            discovery_date: metadata.discovery_date.clone(),
            protocol_type: metadata.document_type.clone(),
            emergent_observation,
            conclusion,
            checkmarks: extract_checkmarks(content),
            protocol_references: extract_protocol_references(content),
            footer_emojis,
            metadata,
            document,
        }
    }

    /// Glyphs of the last non-blank line, when that line is mostly emoji
    fn footer_emojis(&self, content: &str) -> Vec<String> {
        let Some(last) = split_lines(content)
            .into_iter()
            .map(str::trim)
            .rev()
            .find(|line| !line.is_empty())
        else {
            return Vec::new();
        };

        if emoji_density(last) > self.config.footer_emoji_density {
            extract_emojis(last).into_iter().map(|e| e.glyph).collect()
        } else {
            Vec::new()
        }
    }

    /// Parse every file in `folder` matched by `scan`, sorted by path
    pub fn parse_folder(
        &self,
        folder: impl AsRef<Path>,
        scan: &FolderScan,
    ) -> ParserResult<Vec<Document>> {
        let folder = folder.as_ref();
        let paths = matching_files(folder, &scan.pattern, scan.recursive)?;

        let documents = if scan.as_protocols {
            self.parse_many(&paths, |path| self.parse_protocol(path).map(Document::from))?
        } else {
            self.parse_many(&paths, |path| self.parse_file(path).map(Document::from))?
        };

        debug!(
            "Parsed {} of {} files in {}",
            documents.len(),
            paths.len(),
            folder.display()
        );
        Ok(documents)
    }

    /// Parse protocol files whose names start with any of `prefixes`
    ///
    /// Each file is parsed once even if several prefixes match it. Results
    /// are ordered by protocol number, unnumbered protocols first.
    pub fn parse_protocols_by_prefix<S: AsRef<str>>(
        &self,
        folder: impl AsRef<Path>,
        prefixes: &[S],
    ) -> ParserResult<Vec<ProtocolDocument>> {
        let paths = prefixed_files(folder.as_ref(), prefixes)?;
        let mut protocols = self.parse_many(&paths, |path| self.parse_protocol(path))?;
        protocols.sort_by_key(|protocol| protocol.protocol_number.unwrap_or(0));
        Ok(protocols)
    }

    /// [`DocumentParser::parse_protocols_by_prefix`] with the configured prefixes
    pub fn parse_protocols(&self, folder: impl AsRef<Path>) -> ParserResult<Vec<ProtocolDocument>> {
        self.parse_protocols_by_prefix(folder, self.config.protocol_prefixes.as_slice())
    }

    /// Protocol files in `folder` under the configured prefixes
    pub fn iter_protocol_files(&self, folder: impl AsRef<Path>) -> ParserResult<Vec<PathBuf>> {
        prefixed_files(folder.as_ref(), self.config.protocol_prefixes.as_slice())
    }

    #[cfg(not(feature = "parallel"))]
    fn parse_many<T, F>(&self, paths: &[PathBuf], parse: F) -> ParserResult<Vec<T>>
    where
        F: Fn(&Path) -> ParserResult<T>,
    {
        paths
            .iter()
            .filter_map(|path| keep_parsed(path, parse(path)).transpose())
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn parse_many<T, F>(&self, paths: &[PathBuf], parse: F) -> ParserResult<Vec<T>>
    where
        T: Send,
        F: Fn(&Path) -> ParserResult<T> + Sync,
    {
        use rayon::prelude::*;

        let results: Vec<(&PathBuf, ParserResult<T>)> = paths
            .par_iter()
            .map(|path| (path, parse(path)))
            .collect();
        results
            .into_iter()
            .filter_map(|(path, result)| keep_parsed(path, result).transpose())
            .collect()
    }
}

/// Skip a file that failed in a recoverable way; anything else aborts the scan
fn keep_parsed<T>(path: &Path, result: ParserResult<T>) -> ParserResult<Option<T>> {
    match result {
        Ok(doc) => Ok(Some(doc)),
        Err(e) if e.is_recoverable() => {
            warn!("Skipping {}: {}", path.display(), e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn read_document(path: &Path) -> ParserResult<String> {
    if !path.exists() {
        return Err(ParserError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| ParserError::from_io(path, e))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// First `# ` line and a `## ` line directly after it
fn title_and_subtitle(lines: &[&str]) -> (Option<String>, Option<String>) {
    let Some(index) = lines.iter().position(|line| line.starts_with("# ")) else {
        return (None, None);
    };
    let title = lines[index][2..].trim().to_string();
    let subtitle = lines
        .get(index + 1)
        .and_then(|next| next.strip_prefix("## "))
        .map(|sub| sub.trim().to_string());
    (Some(title), subtitle)
}

fn ensure_folder(folder: &Path) -> ParserResult<()> {
    if !folder.exists() {
        return Err(ParserError::NotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(ParserError::NotADirectory(folder.to_path_buf()));
    }
    Ok(())
}

/// Files under `folder` whose names match `pattern`, sorted
fn matching_files(folder: &Path, pattern: &str, recursive: bool) -> ParserResult<Vec<PathBuf>> {
    ensure_folder(folder)?;

    let base = glob::Pattern::escape(&folder.to_string_lossy());
    let full = if recursive {
        format!("{}/**/{}", base, pattern)
    } else {
        format!("{}/{}", base, pattern)
    };

    let entries = glob::glob(&full).map_err(|e| ParserError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable entry in {}: {}", folder.display(), e),
        }
    }
    paths.sort();
    Ok(paths)
}

/// Files matching `{prefix}*.md` for each prefix, each real file once
fn prefixed_files<S: AsRef<str>>(folder: &Path, prefixes: &[S]) -> ParserResult<Vec<PathBuf>> {
    ensure_folder(folder)?;

    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for prefix in prefixes {
        let pattern = format!("{}*.md", glob::Pattern::escape(prefix.as_ref()));
        for path in matching_files(folder, &pattern, false)? {
            let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            if seen.insert(key) {
                paths.push(path);
            }
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ProtocolFixture;
    use tracing_test::traced_test;

    const PROTOCOL: &str = "\
# PROTOCOL 42: Test
## Subtitle here

**Status:** ✅ OPERATIONAL
**Category:** Testing

## 🎯 Emergent Observation
Something appeared. See Protocol 7: the river.

## Checklist
- ✅ First item
- ✅ Second item

## Conclusion
Done.

🎯✨🚀
";

    #[test]
    fn test_parse_str_basics() {
        let parser = DocumentParser::default();
        let doc = parser.parse_str("# Title\n## Sub\nsome words here\n", "dir/note.md");
        assert_eq!(doc.filename, "note.md");
        assert_eq!(doc.title.as_deref(), Some("Title"));
        assert_eq!(doc.subtitle.as_deref(), Some("Sub"));
        assert_eq!(doc.word_count, 7);
        assert_eq!(doc.line_count, 4);
    }

    #[test]
    fn test_protocol_fields() {
        let parser = DocumentParser::default();
        let protocol = parser.parse_protocol_str(PROTOCOL, "PROTOCOL_42.md");

        assert_eq!(protocol.protocol_number, Some(42));
        assert_eq!(protocol.protocol_id.as_deref(), Some("P42"));
        assert!(protocol.is_operational());
        assert_eq!(protocol.category.as_deref(), Some("Testing"));
        assert_eq!(protocol.subtitle.as_deref(), Some("Subtitle here"));
        assert_eq!(
            protocol.emergent_observation.as_ref().map(|s| s.content.trim()),
            Some("Something appeared. See Protocol 7: the river.")
        );
        assert_eq!(
            protocol.conclusion.as_ref().map(|s| s.content.trim()),
            Some("Done.\n\n🎯✨🚀")
        );
        assert_eq!(protocol.checkmarks, vec!["OPERATIONAL", "First item", "Second item"]);
        assert_eq!(protocol.protocol_references.len(), 2);
        assert_eq!(protocol.footer_emojis, vec!["🎯", "✨", "🚀"]);
    }

    #[test]
    fn test_footer_needs_dense_line() {
        let parser = DocumentParser::default();
        let protocol = parser.parse_protocol_str("# PROTOCOL 1\nclosing words 🎯\n\n", "p.md");
        assert!(protocol.footer_emojis.is_empty());
    }

    #[test]
    fn test_footer_density_must_exceed_threshold() {
        let parser = DocumentParser::default();
        let at_threshold = parser.parse_protocol_str("# PROTOCOL 1\n🎯a\n", "p.md");
        assert!(at_threshold.footer_emojis.is_empty());

        let above = parser.parse_protocol_str("# PROTOCOL 1\n🎯🎯a\n", "p.md");
        assert_eq!(above.footer_emojis, vec!["🎯"]);
    }

    #[test]
    fn test_footer_threshold_is_configurable() {
        let config = ExtractionConfig {
            footer_emoji_density: 0.05,
            ..ExtractionConfig::default()
        };
        let parser = DocumentParser::new(config);
        let protocol = parser.parse_protocol_str("# PROTOCOL 1\nclosing words 🎯\n", "p.md");
        assert_eq!(protocol.footer_emojis, vec!["🎯"]);
    }

    #[test]
    fn test_missing_optional_data() {
        let parser = DocumentParser::default();
        let protocol = parser.parse_protocol_str("no title, no metadata", "x.md");
        assert_eq!(protocol.title, None);
        assert_eq!(protocol.protocol_number, None);
        assert_eq!(protocol.protocol_id, None);
        assert!(protocol.metadata.is_empty());
        assert!(!protocol.is_operational());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let parser = DocumentParser::default();
        let err = parser.parse_file("/definitely/not/here.md").unwrap_err();
        assert!(matches!(err, ParserError::NotFound(_)));
    }

    #[test]
    fn test_keep_parsed_skips_only_recoverable_errors() {
        let path = Path::new("PROTOCOL_3.md");

        let encoding = keep_parsed::<()>(path, Err(ParserError::Encoding(path.to_path_buf())));
        assert!(matches!(encoding, Ok(None)));

        let missing = keep_parsed::<()>(path, Err(ParserError::NotFound(path.to_path_buf())));
        assert!(matches!(missing, Err(ParserError::NotFound(_))));

        assert!(matches!(keep_parsed(path, Ok(7)), Ok(Some(7))));
    }

    #[test]
    #[traced_test]
    fn test_folder_scan_skips_malformed_file() {
        let dir = ProtocolFixture::new()
            .protocol(2, "Two", "✅ OPERATIONAL")
            .protocol(1, "One", "EMERGENT")
            .malformed("PROTOCOL_9.md")
            .build()
            .unwrap();

        let parser = DocumentParser::default();
        let docs = parser
            .parse_folder(dir.path(), &FolderScan::default().as_protocols(true))
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|doc| doc.as_protocol().is_some()));
        assert!(logs_contain("Skipping"));
        assert!(logs_contain("PROTOCOL_9.md"));
    }
}
