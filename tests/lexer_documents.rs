//! Token streams of the sample documents under docs/samples
//!
//! Each test lexes a whole document and checks the sequence of kinds, then the details that
//! matter for that document: positions, message levels, section levels.

use rstlex::rst::lexing::{tokenize, Lexer, Severity};
use rstlex::rst::{Item, ItemKind};
use std::fs;

use ItemKind::{
    BlankLine, Blockquote, Eof, LiteralBlock, Paragraph, SectionAdornment, Space, SystemMessage,
    Title,
};

fn read_sample_document(name: &str) -> String {
    fs::read_to_string(format!("docs/samples/{}", name)).expect("Failed to read sample document")
}

fn kinds(items: &[Item]) -> Vec<ItemKind> {
    items.iter().map(|item| item.kind).collect()
}

fn messages(items: &[Item]) -> Vec<(usize, Severity, &str)> {
    items
        .iter()
        .filter_map(|item| {
            item.message
                .as_ref()
                .map(|m| (m.line, m.level, item.text.as_str()))
        })
        .collect()
}

#[test]
fn test_000_sections_flat() {
    let items = tokenize("000", &read_sample_document("000-sections-flat.rst"));
    assert_eq!(
        kinds(&items),
        vec![
            Title,
            SectionAdornment,
            BlankLine,
            Paragraph,
            Paragraph,
            BlankLine,
            Title,
            SectionAdornment,
            BlankLine,
            Paragraph,
            Eof
        ]
    );
    assert!(messages(&items).is_empty());
    assert_eq!(items[4].text, "spans two lines.");
    assert_eq!(items[4].line, 5);
    assert_eq!(items[6].text, "Usage");
    assert_eq!(items[6].line, 7);
}

#[test]
fn test_010_sections_nested() {
    let source = read_sample_document("010-sections-nested.rst");
    let mut lexer = Lexer::new("010", &source);
    let items: Vec<Item> = lexer.by_ref().collect();

    let mut expected = vec![SectionAdornment, Title, SectionAdornment];
    for _ in 0..5 {
        expected.extend([BlankLine, Title, SectionAdornment]);
    }
    expected.extend([BlankLine, Paragraph, Eof]);
    assert_eq!(kinds(&items), expected);
    assert!(messages(&items).is_empty());

    // The inset title keeps its real column
    assert_eq!(items[1].text, "Project");
    assert_eq!((items[1].line, items[1].start_position), (2, 2));

    assert_eq!(lexer.section_levels().seen(), &['#', '=', '-', '~']);
    assert_eq!(lexer.section_levels().stack(), &['#', '=']);
}

#[test]
fn test_020_malformed_sections() {
    let items = tokenize("020", &read_sample_document("020-malformed-sections.rst"));
    assert_eq!(
        kinds(&items),
        vec![
            Title,
            SystemMessage,
            SectionAdornment,
            BlankLine,
            SectionAdornment,
            Title,
            SystemMessage,
            SectionAdornment,
            BlankLine,
            Title,
            SectionAdornment,
            BlankLine,
            Title,
            SectionAdornment,
            BlankLine,
            Title,
            SectionAdornment,
            BlankLine,
            Title,
            SystemMessage,
            SectionAdornment,
            BlankLine,
            Paragraph,
            Eof
        ]
    );
    assert_eq!(
        messages(&items),
        vec![
            (1, Severity::Severe, "Title underline too short."),
            (4, Severity::Severe, "Title overline & underline mismatch."),
            (17, Severity::Severe, "Title level inconsistent."),
        ]
    );

    // Lines skipped while resynchronizing are quoted in the message
    let message = items[19].message.as_ref().unwrap();
    assert_eq!(message.source, "020");
    assert_eq!(message.items[0].kind, LiteralBlock);
    assert_eq!(message.items[0].text, "Skipped\n~~~~~~~\nmore text");
    assert_eq!(items[21].line, 20);
    assert_eq!(items[22].text, "After");
}

#[test]
fn test_030_blocks() {
    let items = tokenize("030", &read_sample_document("030-blocks.rst"));
    assert_eq!(
        kinds(&items),
        vec![
            Paragraph,
            BlankLine,
            Space,
            LiteralBlock,
            Space,
            LiteralBlock,
            Space,
            LiteralBlock,
            BlankLine,
            Paragraph,
            BlankLine,
            Space,
            Blockquote,
            Space,
            Blockquote,
            BlankLine,
            SectionAdornment,
            BlankLine,
            Paragraph,
            Eof
        ]
    );
    assert!(messages(&items).is_empty());

    assert_eq!(items[5].text, "println!(\"hi\");");
    assert_eq!((items[5].line, items[5].start_position), (4, 9));
    assert_eq!(items[7].text, "}");
    assert_eq!(items[12].text, "A quoted passage");
    assert_eq!(items[16].text, "-----------");
    assert_eq!(items[18].text, "\u{dc}n\u{ef}c\u{f6}d\u{e9} paragraph.");
    assert_eq!(items[18].line, 14);
}

#[test]
fn test_sample_streams_are_well_formed() {
    for name in [
        "000-sections-flat.rst",
        "010-sections-nested.rst",
        "020-malformed-sections.rst",
        "030-blocks.rst",
    ] {
        let items = tokenize(name, &read_sample_document(name));
        let ids: Vec<usize> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, (1..=items.len()).collect::<Vec<_>>(), "{}", name);
        assert_eq!(items.iter().filter(|item| item.is_terminal()).count(), 1);
        assert!(items.last().unwrap().is_terminal(), "{}", name);
    }
}
