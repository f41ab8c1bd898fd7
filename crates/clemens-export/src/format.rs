//! Text helpers shared by the exporters

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use clemens_parser::{Document, ParsedDocument, ProtocolDocument};

use crate::error::{ExportError, ExportResult};

static SLUG_STRIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("slug strip regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

const SLUG_MAX_CHARS: usize = 50;

/// Borrowed view of either document kind
#[derive(Debug, Clone, Copy)]
pub enum DocumentRef<'a> {
    Generic(&'a ParsedDocument),
    Protocol(&'a ProtocolDocument),
}

impl<'a> DocumentRef<'a> {
    pub fn parsed(self) -> &'a ParsedDocument {
        match self {
            DocumentRef::Generic(doc) => doc,
            DocumentRef::Protocol(protocol) => &protocol.document,
        }
    }

    pub fn protocol(self) -> Option<&'a ProtocolDocument> {
        match self {
            DocumentRef::Protocol(protocol) => Some(protocol),
            DocumentRef::Generic(_) => None,
        }
    }
}

impl<'a> From<&'a ParsedDocument> for DocumentRef<'a> {
    fn from(doc: &'a ParsedDocument) -> Self {
        DocumentRef::Generic(doc)
    }
}

impl<'a> From<&'a ProtocolDocument> for DocumentRef<'a> {
    fn from(protocol: &'a ProtocolDocument) -> Self {
        DocumentRef::Protocol(protocol)
    }
}

impl<'a> From<&'a Document> for DocumentRef<'a> {
    fn from(doc: &'a Document) -> Self {
        match doc {
            Document::Generic(doc) => DocumentRef::Generic(doc),
            Document::Protocol(protocol) => DocumentRef::Protocol(protocol),
        }
    }
}

/// `1234567` → `"1,234,567"`
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// The first `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Like [`truncate_chars`], with `...` appended when anything was cut
pub fn excerpt(text: &str, max: usize) -> String {
    let head = truncate_chars(text, max);
    if head.len() < text.len() {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}

/// File-name-safe form of a title
///
/// Punctuation is dropped, whitespace runs become `_`, and the result is
/// capped at 50 characters.
pub fn slugify(text: &str) -> String {
    let stripped = SLUG_STRIP_REGEX.replace_all(text, "");
    let joined = WHITESPACE_REGEX.replace_all(stripped.trim(), "_");
    truncate_chars(&joined, SLUG_MAX_CHARS).to_string()
}

/// Write `content` to `path`, creating parent folders
pub(crate) fn write_output(path: &Path, content: &str) -> ExportResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| ExportError::io(path, e))?;
    Ok(path.to_path_buf())
}
