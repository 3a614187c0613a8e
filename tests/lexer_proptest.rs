//! Property-based tests for the rst lexer
//!
//! These tests ensure that the lexer handles arbitrary documents, well-formed or not, without
//! panicking and always produces a well-formed token stream.

use proptest::prelude::*;
use rstlex::rst::lexing::{tokenize, Cursor, Severity};
use rstlex::rst::{Item, ItemKind};

/// Helper: strip everything but the kinds
fn strip(items: &[Item]) -> Vec<ItemKind> {
    items.iter().map(|item| item.kind).collect()
}

#[cfg(test)]
mod stream_tests {
    use super::*;

    fn text_line_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z][a-zA-Z ]{0,30}",
            "[a-zA-Zàéöü ]{1,20}",
            "[a-z ]{1,10}::",
        ]
    }

    fn adornment_strategy() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!['=', '-', '~', '^', '#', '*', '+']),
            1usize..12,
        )
            .prop_map(|(ch, n)| std::iter::repeat(ch).take(n).collect())
    }

    fn indented_strategy() -> impl Strategy<Value = String> {
        (prop_oneof![Just("    "), Just("  "), Just("\t")], text_line_strategy())
            .prop_map(|(indent, text)| format!("{}{}", indent, text))
    }

    fn document_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                3 => text_line_strategy(),
                3 => adornment_strategy(),
                2 => Just(String::new()),
                1 => indented_strategy(),
            ],
            0..30,
        )
        .prop_map(|lines| lines.join("\n"))
    }

    fn check_stream(items: &[Item]) {
        assert!(!items.is_empty());
        let terminals = items.iter().filter(|item| item.is_terminal()).count();
        assert_eq!(terminals, 1);
        assert!(items[items.len() - 1].is_terminal());

        let ids: Vec<usize> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, (1..=items.len()).collect::<Vec<_>>());

        for item in items {
            assert!(item.line >= 1);
            assert!(item.start_position >= 1);
            assert_eq!(item.kind == ItemKind::SystemMessage, item.message.is_some());
        }
    }

    proptest! {
        #[test]
        fn test_lexing_never_panics(input in "\\PC*") {
            let items = tokenize("prop", &input);
            check_stream(&items);
        }

        #[test]
        fn test_document_streams_are_well_formed(input in document_strategy()) {
            let items = tokenize("prop", &input);
            check_stream(&items);
            prop_assert_eq!(items.last().map(|item| item.kind), Some(ItemKind::Eof));
        }

        #[test]
        fn test_well_formed_titles_have_no_errors(
            title in "[A-Za-z]([A-Za-z ]{0,20}[A-Za-z])?",
            ch in prop::sample::select(vec!['=', '-', '~', '^']),
            extra in 0usize..5,
        ) {
            let length = title.chars().count() + extra;
            let underline: String = std::iter::repeat(ch).take(length).collect();
            let items = tokenize("prop", &format!("{}\n{}\n", title, underline));
            prop_assert_eq!(
                strip(&items),
                vec![ItemKind::Title, ItemKind::SectionAdornment, ItemKind::Eof]
            );
            prop_assert_eq!(&items[0].text, &title);
        }

        #[test]
        fn test_short_underline_is_severe(
            title in "[A-Za-z]{4,20}",
            ch in prop::sample::select(vec!['=', '-', '~', '^']),
            short in 1usize..4,
        ) {
            let length = title.chars().count() - short;
            let underline: String = std::iter::repeat(ch).take(length).collect();
            let items = tokenize("prop", &format!("{}\n{}\n", title, underline));
            let levels: Vec<Severity> = items
                .iter()
                .filter_map(|item| item.message.as_ref().map(|m| m.level))
                .collect();
            prop_assert_eq!(levels, vec![Severity::Severe]);
            prop_assert_eq!(items[1].kind, ItemKind::SystemMessage);
        }

        #[test]
        fn test_paragraph_lines_are_kept_verbatim(
            lines in prop::collection::vec("[a-z][a-z ]{0,20}[a-z]", 1..6)
        ) {
            let items = tokenize("prop", &lines.join("\n"));
            let paragraphs: Vec<&str> = items
                .iter()
                .filter(|item| item.kind == ItemKind::Paragraph)
                .map(|item| item.text.as_str())
                .collect();
            let expected: Vec<&str> = lines.iter().map(String::as_str).collect();
            prop_assert_eq!(paragraphs, expected);
        }
    }
}

#[cfg(test)]
mod cursor_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_backup_then_next_restores_position(
            text in "[a-zà-ü€😀 \n]{0,40}",
            steps in 0usize..60,
        ) {
            let mut cursor = Cursor::new(&text);
            for _ in 0..steps {
                cursor.next();
            }
            let position = (cursor.line_number(), cursor.index(), cursor.mark(), cursor.width());

            // Walk back as far as the document allows, then forward again
            let mut walker = cursor.clone();
            let mut distance = 0;
            while distance < steps {
                let before = (walker.line_number(), walker.index());
                walker.backup(1);
                if (walker.line_number(), walker.index()) == before {
                    break;
                }
                distance += 1;
            }
            cursor.backup(distance);
            for _ in 0..distance {
                cursor.next();
            }
            prop_assert_eq!(
                (cursor.line_number(), cursor.index(), cursor.mark(), cursor.width()),
                position
            );
        }

        #[test]
        fn test_peek_is_pure_and_matches_next(text in "[a-zà-ü€😀 \n]{0,40}", steps in 0usize..40) {
            let mut cursor = Cursor::new(&text);
            for _ in 0..steps {
                let peeked = cursor.peek();
                prop_assert_eq!(cursor.peek(), peeked);
                prop_assert_eq!(cursor.next(), peeked);
            }
        }

        #[test]
        fn test_index_stays_on_rune_boundary(text in "[a-zà-ü€😀 \n]{0,40}", steps in 0usize..40) {
            let mut cursor = Cursor::new(&text);
            for _ in 0..steps {
                cursor.next();
                let line = cursor.current_line();
                prop_assert!(line.is_char_boundary(cursor.index()));
                prop_assert_eq!(cursor.width(), cursor.mark().map_or(0, char::len_utf8));
            }
        }
    }
}
