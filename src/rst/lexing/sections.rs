//! Section Matching
//!
//!     A section title is recognized from the shape of up to three consecutive lines, read
//!     through [`classify_line`] without moving the cursor:
//!
//!         ======          overline (optional)
//!          Title          title, may be inset when overlined
//!         ======          underline
//!
//!     Matching is split in two steps. [`match_section`] only recognizes a shape, including the
//!     malformed ones (an overline with no underline, two adornments with no title between
//!     them). [`Section::validate`] then checks lengths, indentation and nesting, and returns the
//!     first defect found. The state machine turns both into items.
//!
//!     Nesting levels follow the order in which adornment characters first appear. The active
//!     section path is always a prefix of that order, see [`SectionLevels`].

use crate::rst::lexing::cursor::Cursor;
use crate::rst::lexing::diagnostics::Defect;
use crate::rst::lexing::line_classification::{classify_line, rune_len, LineClass};
use crate::rst::token::ItemKind;

/// Adornment characters in first-seen order, and how deep the current section path goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionLevels {
    seen: Vec<char>,
    depth: usize,
}

impl SectionLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adornment characters of the active section path, level 1 first
    pub fn stack(&self) -> &[char] {
        &self.seen[..self.depth]
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Every adornment character assigned a level so far, in first-seen order
    pub fn seen(&self) -> &[char] {
        &self.seen
    }

    /// Assigns a level to a title adorned with `ch` and makes it the current section.
    ///
    /// A character already on the active path closes the deeper sections and yields a sibling.
    /// Otherwise the title must open exactly one level below the current one: a known character
    /// only when it was first seen at that level, a new one only when every known character is
    /// on the active path. On error nothing changes.
    pub fn assign(&mut self, ch: char) -> Result<usize, Defect> {
        match self.seen.iter().position(|&c| c == ch) {
            Some(position) if position <= self.depth => {
                self.depth = position + 1;
                Ok(self.depth)
            }
            Some(_) => Err(Defect::InconsistentLevel),
            None if self.seen.len() == self.depth => {
                self.seen.push(ch);
                self.depth += 1;
                Ok(self.depth)
            }
            None => Err(Defect::InconsistentLevel),
        }
    }
}

/// An adornment line of a section construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adornment {
    pub line: usize,
    pub ch: char,
    pub length: usize,
    pub indent: usize,
}

impl Adornment {
    fn from_class(line: usize, class: LineClass) -> Option<Self> {
        match class {
            LineClass::Adornment { ch, length, indent } => Some(Adornment {
                line,
                ch,
                length,
                indent,
            }),
            _ => None,
        }
    }
}

/// A title line; `length` is the raw rune count of the trimmed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Title {
    pub line: usize,
    pub length: usize,
    pub indent: usize,
}

impl Title {
    fn read(cursor: &Cursor, line: usize, indent: usize) -> Self {
        let length = cursor.line(line).map_or(0, |text| rune_len(text.trim()));
        Title {
            line,
            length,
            indent,
        }
    }
}

/// The shapes the matcher recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Adornment, title, adornment
    Overlined {
        overline: Adornment,
        title: Title,
        underline: Adornment,
    },

    /// Adornment and title with no adornment after
    MissingUnderline { overline: Adornment, title: Title },

    /// Two adornments with nothing, or only a blank line, between them
    MissingTitle {
        overline: Adornment,
        blank: Option<usize>,
        underline: Adornment,
    },

    /// Title, adornment
    Underlined { title: Title, underline: Adornment },

    /// An adornment line on its own, followed by a blank line or the end of the document
    Standalone { adornment: Adornment },
}

/// One item a section construct contributes to the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: ItemKind,
    pub line: usize,
    pub column: usize,
    pub text: String,
}

/// Recognizes the section shape starting at the cursor's line, if any.
pub fn match_section(cursor: &Cursor) -> Option<Section> {
    let number = cursor.line_number();
    let current = classify_line(cursor.line(number)?);
    let next = cursor.line(number + 1).map(classify_line);
    let after = cursor.line(number + 2).map(classify_line);
    let adornment_after = || after.and_then(|class| Adornment::from_class(number + 2, class));

    match current {
        LineClass::Blank => None,
        LineClass::Adornment { .. } => {
            let overline = Adornment::from_class(number, current)?;
            let section = match next {
                Some(LineClass::Text { indent }) => {
                    let title = Title::read(cursor, number + 1, indent);
                    match adornment_after() {
                        Some(underline) => Section::Overlined {
                            overline,
                            title,
                            underline,
                        },
                        None => Section::MissingUnderline { overline, title },
                    }
                }
                Some(class @ LineClass::Adornment { .. }) => Section::MissingTitle {
                    overline,
                    blank: None,
                    underline: Adornment::from_class(number + 1, class)?,
                },
                Some(LineClass::Blank) => match adornment_after() {
                    Some(underline) if underline.ch == overline.ch => Section::MissingTitle {
                        overline,
                        blank: Some(number + 1),
                        underline,
                    },
                    _ => Section::Standalone {
                        adornment: overline,
                    },
                },
                None => Section::Standalone {
                    adornment: overline,
                },
            };
            Some(section)
        }
        LineClass::Text { indent } => {
            let underline = next.and_then(|class| Adornment::from_class(number + 1, class))?;
            Some(Section::Underlined {
                title: Title::read(cursor, number, indent),
                underline,
            })
        }
    }
}

impl Section {
    pub fn first_line(&self) -> usize {
        match self {
            Section::Overlined { overline, .. }
            | Section::MissingUnderline { overline, .. }
            | Section::MissingTitle { overline, .. } => overline.line,
            Section::Underlined { title, .. } => title.line,
            Section::Standalone { adornment } => adornment.line,
        }
    }

    pub fn last_line(&self) -> usize {
        match self {
            Section::Overlined { underline, .. }
            | Section::MissingTitle { underline, .. }
            | Section::Underlined { underline, .. } => underline.line,
            Section::MissingUnderline { title, .. } => title.line,
            Section::Standalone { adornment } => adornment.line,
        }
    }

    pub fn is_standalone(&self) -> bool {
        matches!(self, Section::Standalone { .. })
    }

    /// Whether the construct does not start at column 1. An overlined title may be inset.
    pub fn is_indented(&self) -> bool {
        match self {
            Section::Overlined {
                overline,
                underline,
                ..
            }
            | Section::MissingTitle {
                overline,
                underline,
                ..
            } => overline.indent > 0 || underline.indent > 0,
            Section::MissingUnderline { overline, .. } => overline.indent > 0,
            Section::Underlined { title, underline } => title.indent > 0 || underline.indent > 0,
            Section::Standalone { adornment } => adornment.indent > 0,
        }
    }

    /// Checks the construct and, when it carries a title, assigns its level.
    ///
    /// Returns the level of a titled section, `None` for a standalone adornment, or the first
    /// defect found. Levels are only touched by a construct with no structural defect.
    pub fn validate(
        &self,
        levels: &mut SectionLevels,
        min_adornment_length: usize,
    ) -> Result<Option<usize>, Defect> {
        if let Some(defect) = self.structural_defect(min_adornment_length) {
            return Err(defect);
        }
        match self {
            Section::Overlined { underline, .. } | Section::Underlined { underline, .. } => {
                levels.assign(underline.ch).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn structural_defect(&self, min_length: usize) -> Option<Defect> {
        if self.is_indented() {
            return Some(Defect::IndentedSection);
        }
        match *self {
            Section::Overlined {
                overline,
                title,
                underline,
            } => {
                if overline.ch != underline.ch {
                    Some(Defect::OverlineUnderlineMismatch)
                } else if title.length > overline.length {
                    Some(Defect::OverlineTooShort)
                } else if title.length > underline.length {
                    Some(Defect::UnderlineTooShort)
                } else {
                    None
                }
            }
            Section::MissingUnderline { .. } => Some(Defect::MissingUnderline),
            Section::MissingTitle { .. } => Some(Defect::MissingTitle),
            Section::Underlined { title, underline } => {
                (title.length > underline.length).then_some(Defect::UnderlineTooShort)
            }
            // Only an adornment with no title to measure against has a minimum length
            Section::Standalone { adornment } => {
                (adornment.length < min_length).then_some(Defect::AdornmentTooShort)
            }
        }
    }

    /// The items of the construct in stream order, and the position a system message takes
    /// among them: before the closing adornment, or last when there is none.
    pub fn pieces(&self, cursor: &Cursor) -> (Vec<Piece>, usize) {
        let adornment = |a: &Adornment| piece(cursor, ItemKind::SectionAdornment, a.line, a.indent);
        let title = |t: &Title| piece(cursor, ItemKind::Title, t.line, t.indent);

        match self {
            Section::Overlined {
                overline,
                title: t,
                underline,
            } => (vec![adornment(overline), title(t), adornment(underline)], 2),
            Section::MissingUnderline { overline, title: t } => {
                (vec![adornment(overline), title(t)], 2)
            }
            Section::MissingTitle {
                overline,
                blank,
                underline,
            } => {
                let mut pieces = vec![adornment(overline)];
                if let Some(line) = blank {
                    pieces.push(Piece {
                        kind: ItemKind::BlankLine,
                        line: *line,
                        column: 1,
                        text: cursor.line(*line).unwrap_or_default().to_string(),
                    });
                }
                pieces.push(adornment(underline));
                let slot = pieces.len() - 1;
                (pieces, slot)
            }
            Section::Underlined { title: t, underline } => {
                (vec![title(t), adornment(underline)], 1)
            }
            Section::Standalone { adornment: a } => (vec![adornment(a)], 1),
        }
    }
}

fn piece(cursor: &Cursor, kind: ItemKind, line: usize, indent: usize) -> Piece {
    Piece {
        kind,
        line,
        column: indent + 1,
        text: cursor.line(line).unwrap_or_default().trim().to_string(),
    }
}
