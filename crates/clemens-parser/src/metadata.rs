//! `**Field:** value` header extraction

use regex::Regex;
use std::sync::LazyLock;

use crate::sections::split_lines;
use crate::types::MetadataBlock;

static FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^:*]+):\*\*\s*(.+)").expect("metadata field regex"));

/// Text between the title and the first `## ` heading or blank-line-preceded `---`
///
/// A `## ` subtitle on the line right after the title does not end the block.
fn header_block(text: &str) -> String {
    let lines = split_lines(text);
    let mut block = String::new();
    let mut title_line = None;

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with("# ") {
            title_line = Some(i);
            continue;
        }
        let Some(title) = title_line else {
            continue;
        };
        if line.starts_with("## ") {
            if i == title + 1 {
                continue;
            }
            break;
        }
        if line.trim() == "---" && i > 0 && lines[i - 1].trim().is_empty() {
            break;
        }
        block.push_str(line);
        block.push('\n');
    }
    block
}

/// Classify the fields found in a block of text
pub fn parse_metadata_fields(text: &str) -> MetadataBlock {
    let mut metadata = MetadataBlock::default();

    for caps in FIELD_REGEX.captures_iter(text) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = name.as_str().trim();
        let value = value.as_str().trim().to_string();
        let key = name.to_lowercase();

        metadata.insert_raw(name, value.clone());

        if key.contains("protocol") && key.contains("number") {
            metadata.protocol_number = Some(value);
        } else if key.contains("category") {
            metadata.category = Some(value);
        } else if key.contains("status") {
            metadata.status = Some(value);
        } else if key.contains("date") {
            metadata.discovery_date = Some(value);
        } else if key.contains("type") {
            metadata.document_type = Some(value);
        }
    }

    metadata
}

/// Header metadata of a document
pub fn extract_metadata(text: &str) -> MetadataBlock {
    parse_metadata_fields(&header_block(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
# PROTOCOL 7: River Crossing
## The long way round

**Protocol Number:** 7
**Category:** Navigation
**Status:** ✅ OPERATIONAL
**Discovery Date:** 1867-03-02
**Document Type:** Field note
**Author:** S. Clemens

## Body
**Category:** ignored
";

    #[test]
    fn test_fields_classified() {
        let metadata = extract_metadata(HEADER);
        assert_eq!(metadata.protocol_number.as_deref(), Some("7"));
        assert_eq!(metadata.category.as_deref(), Some("Navigation"));
        assert_eq!(metadata.status.as_deref(), Some("✅ OPERATIONAL"));
        assert_eq!(metadata.discovery_date.as_deref(), Some("1867-03-02"));
        assert_eq!(metadata.document_type.as_deref(), Some("Field note"));
        assert_eq!(metadata.field("author"), Some("S. Clemens"));
        assert_eq!(metadata.raw_fields.len(), 6);
        assert_eq!(metadata.raw_fields[0].0, "Protocol Number");
    }

    #[test]
    fn test_stops_at_rule_after_blank_line() {
        let text = "# T\n**Status:** draft\n\n---\n**Category:** late\n";
        let metadata = extract_metadata(text);
        assert_eq!(metadata.status.as_deref(), Some("draft"));
        assert_eq!(metadata.category, None);
    }

    #[test]
    fn test_nothing_before_title() {
        let metadata = extract_metadata("**Status:** early\n# Title\n");
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_first_bucket_wins() {
        let metadata = parse_metadata_fields("**Status Date:** 1900-01-01\n");
        assert_eq!(metadata.status.as_deref(), Some("1900-01-01"));
        assert_eq!(metadata.discovery_date, None);
    }
}
