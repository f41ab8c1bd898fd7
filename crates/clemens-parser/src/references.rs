//! Checkmark items and protocol cross-references

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::types::ProtocolReference;

static CHECKMARK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[✅✓☑]\s*\*?\*?([^*\n]+)").expect("checkmark regex"));

static PROTOCOL_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)PROTOCOL\s+(\d+)").expect("protocol number regex"));

/// How much a reference pattern says about the protocol it names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Specificity {
    /// `Protocol N: description`
    Described,
    /// `Protocol N`
    Bare,
    /// `PN`
    Short,
}

/// A reference pattern and its priority
pub struct ReferenceRule {
    pub specificity: Specificity,
    pattern: Regex,
}

impl ReferenceRule {
    fn new(specificity: Specificity, pattern: &str) -> Self {
        Self {
            specificity,
            pattern: Regex::new(pattern).expect("reference rule regex"),
        }
    }

    /// `(number, description)` for every match of this rule
    fn matches<'t>(&'t self, text: &'t str) -> impl Iterator<Item = (u32, String)> + 't {
        self.pattern.captures_iter(text).filter_map(|caps| {
            let number = caps.get(1)?.as_str().parse().ok()?;
            let description = caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            Some((number, description))
        })
    }
}

/// Rules ordered by specificity, most specific first
pub static REFERENCE_RULES: LazyLock<Vec<ReferenceRule>> = LazyLock::new(|| {
    let mut rules = vec![
        ReferenceRule::new(Specificity::Short, r"(?i)\bP(\d+)\b"),
        ReferenceRule::new(Specificity::Described, r"(?i)Protocol\s+(\d+):\s*([^\n]+)"),
        ReferenceRule::new(Specificity::Bare, r"(?i)Protocol\s+(\d+)"),
    ];
    rules.sort_by_key(|rule| rule.specificity);
    rules
});

/// Text after each checkmark glyph, in document order
pub fn extract_checkmarks(text: &str) -> Vec<String> {
    CHECKMARK_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Protocols mentioned in `text`, one per number, ascending
///
/// Rules run most specific first; the first match recorded for a number wins.
pub fn extract_protocol_references(text: &str) -> Vec<ProtocolReference> {
    let mut found: BTreeMap<u32, String> = BTreeMap::new();
    for rule in REFERENCE_RULES.iter() {
        for (number, description) in rule.matches(text) {
            found.entry(number).or_insert(description);
        }
    }
    found
        .into_iter()
        .map(|(number, description)| ProtocolReference::new(number, description))
        .collect()
}

/// Number from a title containing `PROTOCOL <digits>`
pub fn protocol_number_from_title(title: &str) -> Option<u32> {
    PROTOCOL_NUMBER_REGEX
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
