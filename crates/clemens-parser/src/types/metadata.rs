//! Header metadata and protocol cross-references

use serde::{Deserialize, Serialize};
use std::fmt;

/// `**Field:** value` pairs found between a document's title and its first section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataBlock {
    /// Field whose name mentions both "protocol" and "number"
    pub protocol_number: Option<String>,
    /// Field whose name mentions "category"
    pub category: Option<String>,
    /// Field whose name mentions "status"
    pub status: Option<String>,
    /// Field whose name mentions "date"
    pub discovery_date: Option<String>,
    /// Field whose name mentions "type"
    pub document_type: Option<String>,
    /// Every matched field in document order, name as written
    pub raw_fields: Vec<(String, String)>,
}

impl MetadataBlock {
    /// Whether no field matched at all
    pub fn is_empty(&self) -> bool {
        self.raw_fields.is_empty()
    }

    /// Record a field; a repeated name keeps its first position and the last value
    pub fn insert_raw(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.raw_fields.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.raw_fields.push((name, value)),
        }
    }

    /// Look up a raw field, ignoring case
    pub fn field(&self, name: &str) -> Option<&str> {
        self.raw_fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A mention of another numbered protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolReference {
    /// Protocol number
    pub number: u32,
    /// Text after `Protocol N:`, empty for bare mentions
    pub description: String,
}

impl ProtocolReference {
    /// Create a reference
    pub fn new(number: u32, description: impl Into<String>) -> Self {
        Self {
            number,
            description: description.into(),
        }
    }

    /// Short id, e.g. `P12`
    pub fn id(&self) -> String {
        format!("P{}", self.number)
    }
}

impl fmt::Display for ProtocolReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "Protocol {}", self.number)
        } else {
            write!(f, "Protocol {}: {}", self.number, self.description)
        }
    }
}
