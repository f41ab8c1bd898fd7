//! Pipe tables and blockquotes

use serde::{Deserialize, Serialize};

/// A pipe-delimited Markdown table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    /// Header cells
    pub headers: Vec<String>,

    /// Body rows; usually as wide as `headers`, not enforced
    pub rows: Vec<Vec<String>>,

    /// 1-indexed header line
    pub start_line: usize,

    /// 1-indexed last row line
    pub end_line: usize,
}

impl TableData {
    /// Number of header cells
    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    /// Number of body rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cell at `row`, `column`, if present
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

/// A blockquote with an optional attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body, attribution removed
    pub text: String,

    /// Name after a trailing `—` or `-`
    pub attribution: Option<String>,

    /// 1-indexed first line of the quote
    pub line_number: usize,
}
