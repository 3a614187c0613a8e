//! Position and line index
//!
//!     The source is split into physical lines once, at construction. The cursor then walks the
//!     line table one rune at a time: `index` is a byte offset into the current line, `mark` is
//!     the rune decoded at `index` and `width` its byte length. When `index` equals the length
//!     of the line the cursor sits on the end-of-line sentinel: `mark` is `None` and `width` 0.
//!
//!     Every movement re-decodes the mark, so `index` never lands inside a multi-byte rune.
//!     Crossing a line boundary is a movement of its own: `next()` at the end of a line moves to
//!     index 0 of the following line, and `backup()` at index 0 moves to the end of the previous
//!     one.

use crate::rst::error::{LexError, LocationFault};

/// Random-access cursor over the lines of one document
#[derive(Debug, Clone)]
pub struct Cursor {
    lines: Vec<String>,
    line: usize,
    index: usize,
    mark: Option<char>,
    width: usize,
}

fn decode_at(text: &str, index: usize) -> (Option<char>, usize) {
    text[index..]
        .chars()
        .next()
        .map_or((None, 0), |c| (Some(c), c.len_utf8()))
}

impl Cursor {
    /// Splits `text` into lines. A leading byte-order mark is not part of the first line.
    pub fn new(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines = text.lines().map(str::to_owned).collect();
        let mut cursor = Cursor {
            lines,
            line: 0,
            index: 0,
            mark: None,
            width: 0,
        };
        cursor.decode();
        cursor
    }

    fn decode(&mut self) {
        let (mark, width) = decode_at(self.current_line(), self.index);
        self.mark = mark;
        self.width = width;
    }

    /// The rune under the cursor, `None` at the end of a line
    pub fn mark(&self) -> Option<char> {
        self.mark
    }

    /// Byte length of the mark
    pub fn width(&self) -> usize {
        self.width
    }

    /// Byte offset into the current line
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based number of the current line
    pub fn line_number(&self) -> usize {
        self.line + 1
    }

    /// 1-based rune column of the cursor
    pub fn column(&self) -> usize {
        self.current_line()[..self.index].chars().count() + 1
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of the 1-based line `number`
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn current_line(&self) -> &str {
        self.lines.get(self.line).map_or("", String::as_str)
    }

    /// Whether the cursor is on the final line. Always true for an empty document.
    pub fn is_last_line(&self) -> bool {
        self.line + 1 >= self.lines.len()
    }

    /// Repositions the cursor at byte `index` of the 1-based line `line_number`.
    pub fn try_goto_location(&mut self, index: usize, line_number: usize) -> Result<(), LexError> {
        let invalid = |fault| LexError::InvalidLocation {
            line: line_number,
            index,
            fault,
        };
        let text = self.line(line_number).ok_or_else(|| {
            invalid(LocationFault::NoSuchLine {
                line_count: self.lines.len(),
            })
        })?;
        if index > text.len() {
            return Err(invalid(LocationFault::PastEndOfLine { length: text.len() }));
        }
        if !text.is_char_boundary(index) {
            return Err(invalid(LocationFault::InsideRune));
        }

        self.line = line_number - 1;
        self.index = index;
        self.decode();
        Ok(())
    }

    /// Repositions the cursor.
    ///
    /// # Panics
    ///
    /// On a location outside the document or inside a rune. Such a location can only come from
    /// the caller, never from document content; use [`Cursor::try_goto_location`] to recover.
    pub fn goto_location(&mut self, index: usize, line_number: usize) {
        if let Err(err) = self.try_goto_location(index, line_number) {
            panic!("{}", err);
        }
    }

    /// Advances past the mark and returns the new mark and its width.
    ///
    /// At the end of a line this crosses to the start of the next one. At the end of the last
    /// line it returns `(None, 0)` and stays put.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> (Option<char>, usize) {
        if self.index < self.current_line().len() {
            self.index += self.width;
        } else if !self.is_last_line() {
            self.line += 1;
            self.index = 0;
        } else {
            return (None, 0);
        }
        self.decode();
        (self.mark, self.width)
    }

    /// Returns what [`Cursor::next`] would return, without moving.
    pub fn peek(&self) -> (Option<char>, usize) {
        let (line, index) = if self.index < self.current_line().len() {
            (self.line, self.index + self.width)
        } else if !self.is_last_line() {
            (self.line + 1, 0)
        } else {
            return (None, 0);
        };
        decode_at(&self.lines[line], index)
    }

    /// Moves back `n` runes, stopping at the start of the document. Backing up from index 0
    /// lands on the end-of-line sentinel of the previous line.
    pub fn backup(&mut self, n: usize) {
        for _ in 0..n {
            if self.index > 0 {
                self.index = self.current_line()[..self.index]
                    .char_indices()
                    .next_back()
                    .map_or(0, |(i, _)| i);
            } else if self.line > 0 {
                self.line -= 1;
                self.index = self.current_line().len();
            } else {
                break;
            }
        }
        self.decode();
    }

    /// Text of the line after the current one. Empty when there is no such line or when it is
    /// blank; section lookahead treats both the same.
    pub fn peek_next_line(&self) -> &str {
        match self.lines.get(self.line + 1) {
            Some(text) if !text.trim().is_empty() => text,
            _ => "",
        }
    }
}
