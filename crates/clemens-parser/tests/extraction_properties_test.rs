//! Properties of the text extractors

use clemens_parser::{
    count_emojis, extract_checkmarks, extract_emojis, extract_protocol_references,
    extract_sections, extract_tables, strip_emojis, ProtocolReference, Section, SectionNesting,
};
use proptest::prelude::*;

/// Lines drawn from headings of every depth, plain text and emoji text
fn markdown_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (1usize..=6, "[A-Za-z ]{1,12}").prop_map(|(level, title)| format!(
            "{} {}",
            "#".repeat(level),
            title.trim().to_string() + "x"
        )),
        "[a-z ]{0,20}",
        "(🎯|✅|⚠️|🚀|x|y| ){0,6}",
    ]
}

fn markdown_doc() -> impl Strategy<Value = String> {
    prop::collection::vec(markdown_line(), 0..30).prop_map(|lines| lines.join("\n"))
}

fn assert_siblings_ordered(sections: &[Section]) -> Result<(), TestCaseError> {
    for pair in sections.windows(2) {
        prop_assert!(pair[0].start_line <= pair[0].end_line);
        prop_assert!(pair[0].end_line < pair[1].start_line);
    }
    for section in sections {
        for child in &section.subsections {
            prop_assert!(child.level > section.level);
        }
        assert_siblings_ordered(&section.subsections)?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn text_without_headings_has_no_sections(text in "[a-z0-9 .,|>*\n-]{0,200}") {
        prop_assert!(extract_sections(&text, SectionNesting::Stack).is_empty());
        prop_assert!(extract_sections(&text, SectionNesting::LevelTable).is_empty());
    }

    #[test]
    fn sibling_spans_do_not_overlap(doc in markdown_doc()) {
        assert_siblings_ordered(&extract_sections(&doc, SectionNesting::Stack))?;
    }

    #[test]
    fn stripping_removes_every_glyph(text in "(🎯|✅|⚠️|🗺️|🦀|😊|a|b| |\n|—){0,40}") {
        let removed: usize = extract_emojis(&text)
            .iter()
            .map(|e| e.count * e.char_len())
            .sum();
        let stripped = strip_emojis(&text);

        prop_assert_eq!(count_emojis(&stripped), 0);
        prop_assert_eq!(stripped.chars().count(), text.chars().count() - removed);
    }

    #[test]
    fn references_are_sorted_and_unique(numbers in prop::collection::vec(1u32..500, 0..10)) {
        let text: String = numbers
            .iter()
            .map(|n| format!("see Protocol {}: item and P{} ", n, n + 1))
            .collect::<Vec<_>>()
            .join("\n");
        let refs = extract_protocol_references(&text);
        for pair in refs.windows(2) {
            prop_assert!(pair[0].number < pair[1].number);
        }
    }
}

#[test]
fn checkmark_example() {
    assert_eq!(
        extract_checkmarks("- ✅ Do the thing\n- ✅ Do another"),
        vec!["Do the thing", "Do another"]
    );
}

#[test]
fn reference_example() {
    assert_eq!(
        extract_protocol_references("See Protocol 12: river crossing and also P7."),
        vec![
            ProtocolReference::new(7, ""),
            ProtocolReference::new(12, "river crossing and also P7."),
        ]
    );
}

#[test]
fn table_example() {
    let tables = extract_tables("| A | B |\n|---|---|\n| 1 | 2 |\n");
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].headers, vec!["A", "B"]);
    assert_eq!(tables[0].rows, vec![vec!["1", "2"]]);
    assert_eq!(tables[0].num_rows(), 1);
    assert_eq!(tables[0].num_columns(), 2);
}
