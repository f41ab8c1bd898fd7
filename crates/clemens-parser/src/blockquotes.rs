//! Blockquote extraction
//!
//! A quote is a run of `>` lines. A blank line inside the run is tolerated
//! only when the next line continues the quote. Lines are joined with single
//! spaces and a trailing `— Name` becomes the attribution.

use regex::Regex;
use std::sync::LazyLock;

use crate::sections::split_lines;
use crate::types::Quote;

/// First dash run that follows whitespace (or opens the quote) and the name after it
static ATTRIBUTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)[-—–]+\s*(\S.*?)\s*$").expect("attribution regex")
});

fn quote_line_text(line: &str) -> &str {
    line.trim_start_matches(['>', ' ']).trim()
}

/// Split a trailing attribution off the joined quote text
fn split_attribution(text: &str) -> (String, Option<String>) {
    match ATTRIBUTION_REGEX.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(text.len(), |m| m.start());
            let name = caps.get(1).map(|m| m.as_str().trim().to_string());
            (text[..whole].trim().to_string(), name)
        }
        None => (text.to_string(), None),
    }
}

/// Every blockquote in `text`
pub fn extract_quotes(text: &str) -> Vec<Quote> {
    let lines = split_lines(text);
    let mut quotes = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        if !lines[i].starts_with('>') {
            i += 1;
            continue;
        }

        let start = i;
        let mut parts: Vec<&str> = Vec::new();
        while i < lines.len() && (lines[i].starts_with('>') || lines[i].trim().is_empty()) {
            let blank = lines[i].trim().is_empty();
            let part = quote_line_text(lines[i]);
            if !part.is_empty() {
                parts.push(part);
            }
            i += 1;
            if blank && lines.get(i).is_some_and(|next| !next.starts_with('>')) {
                break;
            }
        }

        let (body, attribution) = split_attribution(&parts.join(" "));
        if body.is_empty() && attribution.is_none() {
            continue;
        }
        quotes.push(Quote {
            text: body,
            attribution,
            line_number: start + 1,
        });
    }

    quotes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_with_attribution() {
        let quotes = extract_quotes("intro\n> The secret of getting ahead\n> is getting started.\n> — Mark Twain\n");
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "The secret of getting ahead is getting started.");
        assert_eq!(quotes[0].attribution.as_deref(), Some("Mark Twain"));
        assert_eq!(quotes[0].line_number, 2);
    }

    #[test]
    fn test_hyphenated_words_are_not_attribution() {
        let quotes = extract_quotes("> A well-known fact");
        assert_eq!(quotes[0].text, "A well-known fact");
        assert_eq!(quotes[0].attribution, None);
    }

    #[test]
    fn test_hyphenated_attribution() {
        let quotes = extract_quotes("> Hell is other people. — Jean-Paul Sartre");
        assert_eq!(quotes[0].text, "Hell is other people.");
        assert_eq!(quotes[0].attribution.as_deref(), Some("Jean-Paul Sartre"));

        let quotes = extract_quotes("> Get your facts first. - Twain, 1835-1910");
        assert_eq!(quotes[0].text, "Get your facts first.");
        assert_eq!(quotes[0].attribution.as_deref(), Some("Twain, 1835-1910"));
    }

    #[test]
    fn test_blank_line_continues_only_into_quote() {
        let quotes = extract_quotes("> first\n\n> second\n\nplain\n> third");
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].text, "first second");
        assert_eq!(quotes[1].text, "third");
        assert_eq!(quotes[1].line_number, 6);
    }

    #[test]
    fn test_nested_markers_stripped() {
        let quotes = extract_quotes(">> deep - Someone");
        assert_eq!(quotes[0].text, "deep");
        assert_eq!(quotes[0].attribution.as_deref(), Some("Someone"));
    }

    #[test]
    fn test_empty_marker_line_ignored() {
        assert!(extract_quotes(">\n").is_empty());
    }
}
