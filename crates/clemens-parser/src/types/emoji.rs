//! Emoji occurrence types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse grouping of known glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiCategory {
    /// Status and action markers (✅, ❌, ⚠️)
    Status,
    /// Objects and symbols (💎, ⭐, 📜)
    Symbol,
    /// Nature and weather (🌅, 🌊, 🔥)
    Nature,
    /// Structures and buildings (🏛️, 🏆)
    Structure,
    /// Transportation (🚀, 🌐)
    Transport,
    /// Media (🎬)
    Media,
    /// People and characters (🎩, 🎭)
    Character,
    /// Cycles and processes (🔄, ⚡)
    Process,
    /// Detected but not in the glyph table
    Other,
}

impl EmojiCategory {
    /// Lowercase name, as used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            EmojiCategory::Status => "status",
            EmojiCategory::Symbol => "symbol",
            EmojiCategory::Nature => "nature",
            EmojiCategory::Structure => "structure",
            EmojiCategory::Transport => "transport",
            EmojiCategory::Media => "media",
            EmojiCategory::Character => "character",
            EmojiCategory::Process => "process",
            EmojiCategory::Other => "other",
        }
    }
}

impl fmt::Display for EmojiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One distinct glyph found in a text, with every occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiInfo {
    /// The glyph, possibly several code points long
    #[serde(rename = "char")]
    pub glyph: String,

    /// Name from the glyph table, or the lowercased Unicode name
    pub name: String,

    /// Category from the glyph table, `Other` for unknown glyphs
    pub category: EmojiCategory,

    /// Number of occurrences
    pub count: usize,

    /// Character (not byte) offset of each occurrence, ascending
    pub positions: Vec<usize>,
}

impl EmojiInfo {
    /// Create an entry for a first occurrence
    pub fn new(
        glyph: impl Into<String>,
        name: impl Into<String>,
        category: EmojiCategory,
        position: usize,
    ) -> Self {
        Self {
            glyph: glyph.into(),
            name: name.into(),
            category,
            count: 1,
            positions: vec![position],
        }
    }

    /// Record another occurrence
    pub fn record(&mut self, position: usize) {
        self.count += 1;
        self.positions.push(position);
    }

    /// Length of the glyph in characters
    pub fn char_len(&self) -> usize {
        self.glyph.chars().count()
    }

    /// `U+XXXX` of the first code point
    pub fn code_point(&self) -> String {
        self.glyph
            .chars()
            .next()
            .map(|c| format!("U+{:04X}", c as u32))
            .unwrap_or_default()
    }
}

impl fmt::Display for EmojiInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.glyph, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_point_and_display() {
        let info = EmojiInfo::new("✅", "checkmark", EmojiCategory::Status, 0);
        assert_eq!(info.code_point(), "U+2705");
        assert_eq!(info.to_string(), "✅ (checkmark)");
    }

    #[test]
    fn test_record_accumulates() {
        let mut info = EmojiInfo::new("⚠️", "warning", EmojiCategory::Status, 3);
        info.record(10);
        assert_eq!(info.count, 2);
        assert_eq!(info.positions, vec![3, 10]);
        assert_eq!(info.char_len(), 2);
    }

    #[test]
    fn test_serialized_field_names() {
        let info = EmojiInfo::new("🎯", "target", EmojiCategory::Symbol, 0);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["char"], "🎯");
        assert_eq!(json["category"], "symbol");
    }
}
