//! Emoji detection, counting and replacement
//!
//! Glyphs are recognised either from a fixed table of names and categories
//! or, for single code points, from the emoji blocks, the `So` general
//! category, or the Unicode character name. Positions are character offsets.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::types::{EmojiCategory, EmojiInfo};

/// Longest glyph, in characters, matched as one unit
const MAX_GLYPH_CHARS: usize = 4;

/// Number of entries kept in [`EmojiAnalysis::most_common`]
const MOST_COMMON_LIMIT: usize = 10;

const EMOJI_RANGES: [(u32, u32); 5] = [
    (0x1F300, 0x1F9FF),
    (0x2600, 0x26FF),
    (0x2700, 0x27BF),
    (0x1F600, 0x1F64F),
    (0x1F680, 0x1F6FF),
];

const NAME_MARKERS: [&str; 4] = ["EMOJI", "FACE", "HAND", "STAR"];

/// Known glyphs in table order
const GLYPHS: &[(&str, &str, EmojiCategory)] = &[
    ("✅", "checkmark", EmojiCategory::Status),
    ("❌", "cross", EmojiCategory::Status),
    ("⚠️", "warning", EmojiCategory::Status),
    ("🚨", "alert", EmojiCategory::Status),
    ("💡", "idea", EmojiCategory::Status),
    ("🔘", "button", EmojiCategory::Status),
    ("💎", "gem", EmojiCategory::Symbol),
    ("⭐", "star", EmojiCategory::Symbol),
    ("🌟", "glowing_star", EmojiCategory::Symbol),
    ("✨", "sparkles", EmojiCategory::Symbol),
    ("🎯", "target", EmojiCategory::Symbol),
    ("🔗", "link", EmojiCategory::Symbol),
    ("📊", "chart", EmojiCategory::Symbol),
    ("📝", "memo", EmojiCategory::Symbol),
    ("📖", "book", EmojiCategory::Symbol),
    ("📚", "books", EmojiCategory::Symbol),
    ("📜", "scroll", EmojiCategory::Symbol),
    ("🗺️", "map", EmojiCategory::Symbol),
    ("🗂️", "folder", EmojiCategory::Symbol),
    ("🌅", "sunrise", EmojiCategory::Nature),
    ("🌙", "moon", EmojiCategory::Nature),
    ("⛅", "cloudy", EmojiCategory::Nature),
    ("🌊", "wave", EmojiCategory::Nature),
    ("🔥", "fire", EmojiCategory::Nature),
    ("💧", "drop", EmojiCategory::Nature),
    ("🏗️", "construction", EmojiCategory::Structure),
    ("🏛️", "building", EmojiCategory::Structure),
    ("🏆", "trophy", EmojiCategory::Structure),
    ("🔔", "bell", EmojiCategory::Structure),
    ("🚀", "rocket", EmojiCategory::Transport),
    ("🌐", "globe", EmojiCategory::Transport),
    ("🎬", "camera", EmojiCategory::Media),
    ("🎩", "hat", EmojiCategory::Character),
    ("🎭", "masks", EmojiCategory::Character),
    ("👤", "person", EmojiCategory::Character),
    ("💤", "sleep", EmojiCategory::Character),
    ("😊", "smile", EmojiCategory::Character),
    ("😃", "happy", EmojiCategory::Character),
    ("😴", "sleeping", EmojiCategory::Character),
    ("🔄", "cycle", EmojiCategory::Process),
    ("⚡", "lightning", EmojiCategory::Process),
    ("🔒", "lock", EmojiCategory::Process),
    ("🔓", "unlock", EmojiCategory::Process),
];

static GLYPH_TABLE: LazyLock<HashMap<&'static str, (&'static str, EmojiCategory)>> =
    LazyLock::new(|| {
        GLYPHS
            .iter()
            .map(|&(glyph, name, category)| (glyph, (name, category)))
            .collect()
    });

/// Name and category of a glyph from the fixed table
pub fn lookup(glyph: &str) -> Option<(&'static str, EmojiCategory)> {
    GLYPH_TABLE.get(glyph).copied()
}

/// Whether a single character counts as an emoji on its own
pub fn is_emoji_char(c: char) -> bool {
    if c.is_ascii() {
        return false;
    }

    let mut buf = [0u8; 4];
    if GLYPH_TABLE.contains_key(&*c.encode_utf8(&mut buf)) {
        return true;
    }

    if get_general_category(c) == GeneralCategory::OtherSymbol {
        return true;
    }

    if unicode_name(c).is_some_and(|name| NAME_MARKERS.iter().any(|m| name.contains(m))) {
        return true;
    }

    let code = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Whether `candidate` is a table glyph or a single emoji character
pub fn is_emoji(candidate: &str) -> bool {
    if GLYPH_TABLE.contains_key(candidate) {
        return true;
    }
    let mut chars = candidate.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => is_emoji_char(c),
        _ => false,
    }
}

fn unicode_name(c: char) -> Option<String> {
    unicode_names2::name(c).map(|name| name.to_string())
}

/// One occurrence found by the scanner
struct Hit<'a> {
    position: usize,
    glyph: &'a str,
}

/// Left-to-right scan preferring the longest table glyph at each position
fn scan(text: &str) -> Vec<Hit<'_>> {
    // byte offset of every char, plus the end of the text
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = offsets.len() - 1;

    let mut hits = Vec::new();
    let mut i = 0;
    while i < char_count {
        let found = (1..=MAX_GLYPH_CHARS)
            .rev()
            .filter(|len| i + len <= char_count)
            .find_map(|len| {
                let candidate = &text[offsets[i]..offsets[i + len]];
                let matched = GLYPH_TABLE.contains_key(candidate)
                    || (len == 1 && is_emoji(candidate));
                matched.then_some((candidate, len))
            });

        match found {
            Some((glyph, len)) => {
                hits.push(Hit { position: i, glyph });
                i += len;
            }
            None => i += 1,
        }
    }
    hits
}

/// Every distinct emoji in `text`, in first-seen order
pub fn extract_emojis(text: &str) -> Vec<EmojiInfo> {
    let mut found: Vec<EmojiInfo> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for hit in scan(text) {
        match index.get(hit.glyph) {
            Some(&slot) => found[slot].record(hit.position),
            None => {
                let (name, category) = match lookup(hit.glyph) {
                    Some((name, category)) => (name.to_string(), category),
                    None => (fallback_name(hit.glyph), EmojiCategory::Other),
                };
                index.insert(hit.glyph, found.len());
                found.push(EmojiInfo::new(hit.glyph, name, category, hit.position));
            }
        }
    }
    found
}

fn fallback_name(glyph: &str) -> String {
    glyph
        .chars()
        .next()
        .and_then(unicode_name)
        .map(|name| name.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Total emoji occurrences
pub fn count_emojis(text: &str) -> usize {
    scan(text).len()
}

/// Emoji occurrences per character; 0 for empty text
pub fn emoji_density(text: &str) -> f64 {
    let chars = text.chars().count();
    if chars == 0 {
        return 0.0;
    }
    count_emojis(text) as f64 / chars as f64
}

/// Summary of emoji usage in a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiAnalysis {
    pub total_count: usize,
    pub unique_count: usize,
    pub emoji_density: f64,
    pub by_category: BTreeMap<EmojiCategory, usize>,
    /// Up to ten `(glyph, count)` pairs, most frequent first; ties keep first-seen order
    pub most_common: Vec<(String, usize)>,
    pub emojis: Vec<EmojiInfo>,
}

/// Count, density and category breakdown of the emoji in `text`
pub fn analyze_emoji_usage(text: &str) -> EmojiAnalysis {
    let emojis = extract_emojis(text);

    let mut by_category = BTreeMap::new();
    for emoji in &emojis {
        *by_category.entry(emoji.category).or_insert(0) += emoji.count;
    }

    let mut most_common: Vec<(String, usize)> = emojis
        .iter()
        .map(|e| (e.glyph.clone(), e.count))
        .collect();
    most_common.sort_by_key(|(_, count)| Reverse(*count));
    most_common.truncate(MOST_COMMON_LIMIT);

    let total_count: usize = emojis.iter().map(|e| e.count).sum();
    let chars = text.chars().count();
    let emoji_density = if chars == 0 {
        0.0
    } else {
        total_count as f64 / chars as f64
    };

    EmojiAnalysis {
        total_count,
        unique_count: emojis.len(),
        emoji_density,
        by_category,
        most_common,
        emojis,
    }
}

/// Text description of a glyph
pub fn emoji_to_text(glyph: &str) -> String {
    match lookup(glyph) {
        Some((name, _)) => name.to_string(),
        None => fallback_name(glyph).replace('_', " "),
    }
}

/// Table glyphs grouped by category, table order within each group
pub fn emoji_categories() -> BTreeMap<EmojiCategory, Vec<&'static str>> {
    let mut categories: BTreeMap<EmojiCategory, Vec<&'static str>> = BTreeMap::new();
    for &(glyph, _, category) in GLYPHS {
        categories.entry(category).or_default().push(glyph);
    }
    categories
}

/// How [`replace_emojis_with_text`] spells a glyph name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmojiTextFormat {
    /// `[name]`
    #[default]
    Brackets,
    /// `:name:`
    Colons,
}

impl EmojiTextFormat {
    fn render(&self, name: &str) -> String {
        match self {
            EmojiTextFormat::Brackets => format!("[{}]", name),
            EmojiTextFormat::Colons => format!(":{}:", name),
        }
    }
}

fn splice<F>(text: &str, mut replacement: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut hits = scan(text).into_iter().peekable();
    let mut names: HashMap<&str, String> = HashMap::new();
    let mut out = String::with_capacity(text.len());

    let mut skip = 0;
    for (i, c) in text.chars().enumerate() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        match hits.next_if(|hit| hit.position == i) {
            Some(hit) => {
                skip = hit.glyph.chars().count() - 1;
                let rendered = names
                    .entry(hit.glyph)
                    .or_insert_with(|| replacement(hit.glyph).unwrap_or_default());
                out.push_str(rendered.as_str());
            }
            None => out.push(c),
        }
    }
    out
}

/// Replace every emoji with its name in the given format
pub fn replace_emojis_with_text(text: &str, format: EmojiTextFormat) -> String {
    splice(text, |glyph| {
        let name = match lookup(glyph) {
            Some((name, _)) => name.to_string(),
            None => fallback_name(glyph),
        };
        Some(format.render(&name))
    })
}

/// Remove every emoji
pub fn strip_emojis(text: &str) -> String {
    splice(text, |_| None)
}
