//! Heading outline extraction
//!
//! Every `#`..`######` line opens a section. A section's `content` is the
//! body text up to the next heading of any depth, while its line span runs
//! to the next heading of equal or shallower depth, so nested text is only
//! reachable through `subsections`.

use clemens_config::SectionNesting;
use regex::Regex;
use std::sync::LazyLock;

use crate::types::{walk_sections, Section};

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading regex"));

static TITLE_EMOJI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\w\s])\s*(.+)$").expect("title emoji regex"));

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// A heading line before nesting
struct Heading {
    line: usize,
    level: u8,
    title: String,
}

/// Split into lines the way the extractors count them
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

fn parse_heading(line: &str, index: usize) -> Option<Heading> {
    let caps = HEADING_REGEX.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let title = caps.get(2)?.as_str().trim().to_string();
    Some(Heading {
        line: index,
        level,
        title,
    })
}

/// Leading non-ASCII symbol of a heading title, with its variation selector
pub fn title_emoji(title: &str) -> Option<String> {
    let caps = TITLE_EMOJI_REGEX.captures(title)?;
    let first = caps.get(1)?.as_str();
    let c = first.chars().next()?;
    if (c as u32) <= 127 {
        return None;
    }

    let mut glyph = first.to_string();
    if title[first.len()..].starts_with(VARIATION_SELECTOR) {
        glyph.push(VARIATION_SELECTOR);
    }
    Some(glyph)
}

/// Build the section forest of `text`
pub fn extract_sections(text: &str, nesting: SectionNesting) -> Vec<Section> {
    let lines = split_lines(text);
    let headings: Vec<Heading> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| parse_heading(line, i))
        .collect();

    if headings.is_empty() {
        return Vec::new();
    }

    let mut nodes: Vec<Option<Section>> = headings
        .iter()
        .enumerate()
        .map(|(k, heading)| Some(build_section(&lines, &headings, k, heading)))
        .collect();

    let parents = match nesting {
        SectionNesting::Stack => stack_parents(&headings),
        SectionNesting::LevelTable => level_table_parents(&headings),
    };

    // parents always precede children, so attaching from the back moves
    // each node only after all of its own children are in place
    let mut roots = Vec::new();
    for k in (0..nodes.len()).rev() {
        let Some(node) = nodes[k].take() else {
            continue;
        };
        match parents[k].and_then(|p| nodes[p].as_mut()) {
            Some(parent) => parent.subsections.insert(0, node),
            None => roots.insert(0, node),
        }
    }
    roots
}

fn build_section(lines: &[&str], headings: &[Heading], k: usize, heading: &Heading) -> Section {
    let body_end = headings.get(k + 1).map_or(lines.len(), |next| next.line);
    let span_end = headings[k + 1..]
        .iter()
        .find(|next| next.level <= heading.level)
        .map_or(lines.len(), |next| next.line);

    let mut section = Section::new(heading.title.clone(), heading.level, heading.line + 1);
    section.content = lines[heading.line + 1..body_end].join("\n");
    section.end_line = span_end;
    section.emoji = title_emoji(&heading.title);
    section
}

/// Parent is the nearest enclosing heading on the current branch
fn stack_parents(headings: &[Heading]) -> Vec<Option<usize>> {
    let mut stack: Vec<usize> = Vec::new();
    let mut parents = Vec::with_capacity(headings.len());

    for (k, heading) in headings.iter().enumerate() {
        while stack
            .last()
            .is_some_and(|&top| headings[top].level >= heading.level)
        {
            stack.pop();
        }
        parents.push(stack.last().copied());
        stack.push(k);
    }
    parents
}

/// Parent is the most recent heading at the nearest shallower level, on any branch
fn level_table_parents(headings: &[Heading]) -> Vec<Option<usize>> {
    let mut latest: [Option<usize>; 7] = [None; 7];
    let mut parents = Vec::with_capacity(headings.len());

    for (k, heading) in headings.iter().enumerate() {
        let level = heading.level as usize;
        let parent = if level == 1 {
            None
        } else {
            (1..level).rev().find_map(|l| latest[l])
        };
        parents.push(parent);
        latest[level] = Some(k);
    }
    parents
}

/// First section, depth-first, whose leading emoji is `emoji`
pub fn find_section_by_emoji<'a>(sections: &'a [Section], emoji: &str) -> Option<&'a Section> {
    walk_sections(sections).find(|section| section.emoji.as_deref() == Some(emoji))
}

/// First section, depth-first, whose title contains `needle` (case-insensitive)
pub fn find_section_by_title<'a>(sections: &'a [Section], needle: &str) -> Option<&'a Section> {
    let needle = needle.to_uppercase();
    walk_sections(sections).find(|section| section.title.to_uppercase().contains(&needle))
}

/// Every title in the forest, depth-first
pub fn all_section_titles(sections: &[Section]) -> Vec<String> {
    walk_sections(sections)
        .map(|section| section.title.clone())
        .collect()
}

/// The first section titled "conclusion ..." at any depth
pub fn extract_conclusion(text: &str, nesting: SectionNesting) -> Option<Section> {
    let sections = extract_sections(text, nesting);
    find_section_by_title(&sections, "CONCLUSION").cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: &str = "# Title\nintro\n## 🎯 First\none\n### Deep\ndeep text\n## Second\ntwo\n";

    #[test]
    fn test_no_headings() {
        assert!(extract_sections("just text\nmore text", SectionNesting::Stack).is_empty());
        assert!(extract_sections("", SectionNesting::Stack).is_empty());
        assert!(extract_sections("#not a heading", SectionNesting::Stack).is_empty());
    }

    #[test]
    fn test_outline_nesting_and_content() {
        let sections = extract_sections(OUTLINE, SectionNesting::Stack);
        assert_eq!(sections.len(), 1);

        let title = &sections[0];
        assert_eq!(title.title, "Title");
        assert_eq!(title.content, "intro");
        assert_eq!((title.start_line, title.end_line), (1, 9));
        assert_eq!(title.subsections.len(), 2);

        let first = &title.subsections[0];
        assert_eq!(first.emoji.as_deref(), Some("🎯"));
        assert_eq!(first.plain_title(), "First");
        assert_eq!(first.content, "one");
        assert_eq!((first.start_line, first.end_line), (3, 6));
        assert_eq!(first.subsections[0].title, "Deep");
        assert_eq!(first.subsections[0].content, "deep text");

        let second = &title.subsections[1];
        assert_eq!(second.content, "two\n");
        assert!(second.subsections.is_empty());
    }

    #[test]
    fn test_orphan_deep_heading_is_top_level() {
        let sections = extract_sections("### Alone\ntext\n# Top", SectionNesting::Stack);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].level, 3);
        assert_eq!(sections[1].level, 1);
    }

    #[test]
    fn test_level_table_reroutes_across_branches() {
        let text = "# A\n## B1\n### C1\n# D\n### C2\n";
        let stack = extract_sections(text, SectionNesting::Stack);
        let table = extract_sections(text, SectionNesting::LevelTable);

        // stack: C2 nests under D
        assert_eq!(stack[1].subsections[0].title, "C2");
        // table: the stale "## B1" entry still claims C2
        assert!(table[1].subsections.is_empty());
        assert_eq!(table[0].subsections[0].subsections.len(), 2);
    }

    #[test]
    fn test_variation_selector_kept() {
        assert_eq!(title_emoji("⚠️ Warning").as_deref(), Some("⚠️"));
        assert_eq!(title_emoji("🎯Target").as_deref(), Some("🎯"));
        assert_eq!(title_emoji("Plain"), None);
        assert_eq!(title_emoji("* Starred"), None);
    }

    #[test]
    fn test_helpers() {
        let sections = extract_sections(
            "# Doc\n## 🎯 Emergent Observation\nseen\n## ✅ Conclusion\nend",
            SectionNesting::Stack,
        );
        assert_eq!(
            find_section_by_emoji(&sections, "✅").map(|s| s.plain_title()),
            Some("Conclusion")
        );
        assert_eq!(
            all_section_titles(&sections),
            vec!["Doc", "🎯 Emergent Observation", "✅ Conclusion"]
        );
        assert_eq!(
            find_section_by_title(&sections, "emergent").map(|s| s.content.as_str()),
            Some("seen")
        );

        let conclusion = extract_conclusion("# Doc\n### Final conclusion\ndone", SectionNesting::Stack);
        assert_eq!(conclusion.map(|s| s.content), Some("done".to_string()));
    }
}
