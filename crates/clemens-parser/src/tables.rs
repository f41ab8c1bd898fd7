//! Pipe table extraction

use regex::Regex;
use std::sync::LazyLock;

use crate::sections::split_lines;
use crate::types::TableData;

static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[-:\s|]+\|$").expect("table separator regex"));

fn is_separator(line: &str) -> bool {
    SEPARATOR_REGEX.is_match(line.trim())
}

/// Trimmed cells of a pipe row; only the empty cells produced by outer pipes are dropped
fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Every pipe table in `text`
///
/// A table starts at a line containing `|` directly followed by a
/// `|---|---|` separator and runs until the first line without a pipe.
pub fn extract_tables(text: &str) -> Vec<TableData> {
    let lines = split_lines(text);
    let mut tables = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let is_header =
            lines[i].contains('|') && lines.get(i + 1).is_some_and(|next| is_separator(next));
        if !is_header {
            i += 1;
            continue;
        }

        let start = i;
        let headers = split_cells(lines[i]);
        i += 2;

        let mut rows = Vec::new();
        while i < lines.len() && lines[i].contains('|') {
            let row = split_cells(lines[i]);
            if row.iter().any(|cell| !cell.is_empty()) {
                rows.push(row);
            }
            i += 1;
        }

        tables.push(TableData {
            headers,
            rows,
            start_line: start + 1,
            end_line: i,
        });
    }

    tables
}
