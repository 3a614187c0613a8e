//! Token types produced by the rst lexer.
//!
//!     The lexer hands out [`Item`]s, one per recognized construct, in document order. An item
//!     is identified by a run-scoped id (1, 2, 3, ...), carries the 1-based line and rune column
//!     where its text begins, and the NFC-normalized text itself.
//!
//!     System messages are items too: their `message` field holds the diagnosis. Items nested
//!     inside a system message (the offending source as a literal block) are not part of the
//!     stream and carry id 0.

use std::fmt;

use serde::Serialize;

use crate::rst::lexing::diagnostics::SystemMessage;

/// The classification of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemKind {
    /// End of input. Terminal.
    Eof,

    /// The lexer could not make progress. Terminal.
    Error,

    /// Section title text
    Title,

    /// Overline or underline of a section title, or a standalone adornment line
    SectionAdornment,

    /// One physical line of paragraph text
    Paragraph,

    /// One physical line of indented text outside a literal block
    Blockquote,

    /// One physical line of indented text following a `::` paragraph
    LiteralBlock,

    /// A diagnostic describing a malformed construct
    SystemMessage,

    /// Leading indentation of a blockquote or literal line
    Space,

    /// Empty or whitespace-only line
    BlankLine,
}

impl ItemKind {
    /// True for the kinds that end a token stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemKind::Eof | ItemKind::Error)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Eof => "EOF",
            ItemKind::Error => "ERROR",
            ItemKind::Title => "TITLE",
            ItemKind::SectionAdornment => "SECTION_ADORNMENT",
            ItemKind::Paragraph => "PARAGRAPH",
            ItemKind::Blockquote => "BLOCKQUOTE",
            ItemKind::LiteralBlock => "LITERAL_BLOCK",
            ItemKind::SystemMessage => "SYSTEM_MESSAGE",
            ItemKind::Space => "SPACE",
            ItemKind::BlankLine => "BLANK_LINE",
        };
        write!(f, "{}", name)
    }
}

/// A single token of the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Position in the stream, starting at 1. Zero for items nested in a system message.
    pub id: usize,

    pub kind: ItemKind,

    /// 1-based line where the text begins
    pub line: usize,

    /// 1-based rune column where the text begins
    pub start_position: usize,

    /// NFC-normalized text
    pub text: String,

    /// The diagnosis, present only on [`ItemKind::SystemMessage`] items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<SystemMessage>,
}

impl Item {
    pub fn new(
        id: usize,
        kind: ItemKind,
        line: usize,
        start_position: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            line,
            start_position,
            text: text.into(),
            message: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} {}:{} {} {:?}",
            self.id, self.line, self.start_position, self.kind, self.text
        )?;
        if let Some(message) = &self.message {
            write!(f, " [{}]", message.level)?;
        }
        Ok(())
    }
}
