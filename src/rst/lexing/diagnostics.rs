//! Diagnostics
//!
//!     Structural defects found while matching sections are reported in-band, as system message
//!     items, and never stop the lexer. Each defect maps to a fixed severity; severity is only
//!     informational and does not change control flow.
//!
//!     After a defect the lexer resynchronizes at the next blank line or at the end of the
//!     document. The lines it skips on the way are folded into the message as a literal block,
//!     together with the offending construct itself.

use std::fmt;

use serde::Serialize;

use crate::rst::lexing::cursor::Cursor;
use crate::rst::token::{Item, ItemKind};

/// Severity of a system message, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Severe => "SEVERE",
        };
        write!(f, "{}", name)
    }
}

/// A diagnosis attached to a system message item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemMessage {
    pub level: Severity,
    /// 1-based line of the construct the message is about
    pub line: usize,
    /// Name of the document
    pub source: String,
    /// The offending source, as a literal block
    pub items: Vec<Item>,
}

/// Structural defects the section matcher can detect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    UnderlineTooShort,
    OverlineTooShort,
    OverlineUnderlineMismatch,
    MissingUnderline,
    AdornmentTooShort,
    InconsistentLevel,
    IndentedSection,
    MissingTitle,
}

impl Defect {
    pub fn severity(self) -> Severity {
        match self {
            Defect::UnderlineTooShort
            | Defect::OverlineTooShort
            | Defect::OverlineUnderlineMismatch
            | Defect::MissingUnderline
            | Defect::AdornmentTooShort
            | Defect::InconsistentLevel
            | Defect::IndentedSection => Severity::Severe,
            _ => Severity::Error,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Defect::UnderlineTooShort => "Title underline too short.",
            Defect::OverlineTooShort => "Title overline too short.",
            Defect::OverlineUnderlineMismatch => "Title overline & underline mismatch.",
            Defect::MissingUnderline => "Missing matching underline for section title overline.",
            Defect::AdornmentTooShort => "Section adornment too short.",
            Defect::InconsistentLevel => "Title level inconsistent.",
            Defect::IndentedSection => "Unexpected section title.",
            Defect::MissingTitle => "Missing section title.",
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// First line at or after `from` where lexing may resume: the next blank line, or one past the
/// last line when the document ends first.
pub fn resynchronization_point(cursor: &Cursor, from: usize) -> usize {
    (from..=cursor.line_count())
        .find(|&n| cursor.line(n).is_some_and(|text| text.trim().is_empty()))
        .unwrap_or(cursor.line_count() + 1)
}

/// Build the system message for `defect`, quoting lines `first..end` (1-based, end exclusive).
pub fn system_message(
    source: &str,
    defect: Defect,
    cursor: &Cursor,
    first: usize,
    end: usize,
) -> SystemMessage {
    let literal = (first..end)
        .filter_map(|n| cursor.line(n))
        .collect::<Vec<_>>()
        .join("\n");
    SystemMessage {
        level: defect.severity(),
        line: first,
        source: source.to_string(),
        items: vec![Item::new(0, ItemKind::LiteralBlock, first, 1, literal)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Severe);
        assert_eq!(
            [Severity::Severe, Severity::Info, Severity::Error]
                .into_iter()
                .max(),
            Some(Severity::Severe)
        );
    }

    #[test]
    fn test_defect_severities() {
        assert_eq!(Defect::UnderlineTooShort.severity(), Severity::Severe);
        assert_eq!(Defect::OverlineUnderlineMismatch.severity(), Severity::Severe);
        assert_eq!(Defect::MissingUnderline.severity(), Severity::Severe);
        assert_eq!(Defect::AdornmentTooShort.severity(), Severity::Severe);
        assert_eq!(Defect::InconsistentLevel.severity(), Severity::Severe);
        assert_eq!(Defect::IndentedSection.severity(), Severity::Severe);
        assert_eq!(Defect::MissingTitle.severity(), Severity::Error);
    }

    #[test]
    fn test_resynchronization_point() {
        let cursor = Cursor::new("Title\n==\nmore\n\nnext");
        assert_eq!(resynchronization_point(&cursor, 3), 4);
        assert_eq!(resynchronization_point(&cursor, 4), 4);
        assert_eq!(resynchronization_point(&cursor, 5), 6);

        let cursor = Cursor::new("Title\n==");
        assert_eq!(resynchronization_point(&cursor, 3), 3);
    }

    #[test]
    fn test_system_message_quotes_source() {
        let cursor = Cursor::new("Title\n==\nmore\n\nnext");
        let message = system_message("doc.rst", Defect::UnderlineTooShort, &cursor, 1, 4);
        assert_eq!(message.level, Severity::Severe);
        assert_eq!(message.line, 1);
        assert_eq!(message.source, "doc.rst");
        assert_eq!(message.items.len(), 1);
        assert_eq!(message.items[0].kind, ItemKind::LiteralBlock);
        assert_eq!(message.items[0].id, 0);
        assert_eq!(message.items[0].text, "Title\n==\nmore");
    }
}
