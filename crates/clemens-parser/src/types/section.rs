//! Heading sections

use serde::{Deserialize, Serialize};

/// A heading and the body text beneath it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text, leading emoji included
    pub title: String,

    /// Heading depth (1 for `#`, 6 for `######`)
    pub level: u8,

    /// Body lines between the heading and the next heading of any depth
    pub content: String,

    /// 1-indexed line of the heading
    pub start_line: usize,

    /// 1-indexed last line of the section, subsections included
    pub end_line: usize,

    /// Leading glyph of the title, if it is not ASCII
    pub emoji: Option<String>,

    /// Child sections, in document order
    pub subsections: Vec<Section>,
}

impl Section {
    /// Create a section with no children
    pub fn new(title: impl Into<String>, level: u8, start_line: usize) -> Self {
        Self {
            title: title.into(),
            level,
            content: String::new(),
            start_line,
            end_line: start_line,
            emoji: None,
            subsections: Vec::new(),
        }
    }

    /// Title without its emoji prefix
    pub fn plain_title(&self) -> &str {
        match &self.emoji {
            Some(emoji) => self
                .title
                .strip_prefix(emoji.as_str())
                .map(str::trim)
                .unwrap_or(&self.title),
            None => &self.title,
        }
    }

    /// This section followed by all descendants, depth-first
    pub fn iter(&self) -> SectionIter<'_> {
        SectionIter { stack: vec![self] }
    }

    /// Number of lines spanned, heading included
    pub fn line_span(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// Depth-first pre-order iterator over a section tree
pub struct SectionIter<'a> {
    stack: Vec<&'a Section>,
}

impl<'a> Iterator for SectionIter<'a> {
    type Item = &'a Section;

    fn next(&mut self) -> Option<Self::Item> {
        let section = self.stack.pop()?;
        self.stack.extend(section.subsections.iter().rev());
        Some(section)
    }
}

/// Depth-first iteration over a section forest
pub fn walk_sections(sections: &[Section]) -> impl Iterator<Item = &Section> {
    sections.iter().flat_map(Section::iter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_title_strips_emoji() {
        let mut section = Section::new("🎯 Emergent Observation", 2, 1);
        section.emoji = Some("🎯".to_string());
        assert_eq!(section.plain_title(), "Emergent Observation");

        let plain = Section::new("Overview", 2, 1);
        assert_eq!(plain.plain_title(), "Overview");
    }

    #[test]
    fn test_iter_is_preorder() {
        let mut root = Section::new("A", 1, 1);
        let mut b = Section::new("B", 2, 2);
        b.subsections.push(Section::new("C", 3, 3));
        root.subsections.push(b);
        root.subsections.push(Section::new("D", 2, 4));

        let titles: Vec<&str> = root.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_walk_sections_covers_forest() {
        let forest = vec![Section::new("One", 1, 1), Section::new("Two", 1, 5)];
        assert_eq!(walk_sections(&forest).count(), 2);
    }
}
