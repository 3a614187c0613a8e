//! Lexer state machine
//!
//!     The lexer walks the document one physical line at a time. `Start` looks at the line under
//!     the cursor and either emits it directly (blank line, paragraph line, blockquote or literal
//!     line) or hands it to `Section`, which runs the section matcher and emits the whole
//!     construct. `Error` and `Done` are terminal.
//!
//!     Items are queued as they are produced and handed out one at a time through [`Iterator`],
//!     so a caller pulling from the lexer only ever pays for the lines it has consumed.
//!
//!     Every `Start` step must make progress: move the cursor, emit an item or rule a line out as
//!     a section. A step that does none of these ends the stream with an `Error` item instead of
//!     spinning.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use tracing::{debug, trace};
use unicode_normalization::UnicodeNormalization;

use crate::rst::config::LexerOptions;
use crate::rst::lexing::cursor::Cursor;
use crate::rst::lexing::diagnostics::{self, Defect};
use crate::rst::lexing::line_classification::{classify_line, is_adornment_char, rune_len, LineClass};
use crate::rst::lexing::sections::{self, Piece, SectionLevels};
use crate::rst::token::{Item, ItemKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    Section,
    Error,
    Done,
}

/// Where the lexer stands with respect to a literal block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    Closed,
    /// The last paragraph line ended in `::`
    Pending,
    Open,
}

/// Pull-based lexer over one document
#[derive(Debug)]
pub struct Lexer {
    name: String,
    cursor: Cursor,
    options: LexerOptions,
    levels: SectionLevels,
    state: State,
    queue: VecDeque<Item>,
    last_id: usize,
    literal: Literal,
    /// A line the section matcher turned down, to be lexed as text
    text_line: Option<usize>,
    at_end: bool,
}

impl Lexer {
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self::with_options(name, text, LexerOptions::default())
    }

    pub fn with_options(name: impl Into<String>, text: &str, options: LexerOptions) -> Self {
        let name = name.into();
        let cursor = Cursor::new(text);
        debug!(name = %name, lines = cursor.line_count(), "lexer created");
        Lexer {
            name,
            cursor,
            options,
            levels: SectionLevels::new(),
            state: State::Start,
            queue: VecDeque::new(),
            last_id: 0,
            literal: Literal::Closed,
            text_line: None,
            at_end: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Section levels as they stand after the items handed out so far
    pub fn section_levels(&self) -> &SectionLevels {
        &self.levels
    }

    fn step(&mut self) {
        let previous = self.state;
        let before = self.progress();
        let next = match self.state {
            State::Start => self.lex_start(),
            State::Section => self.lex_section(),
            State::Error => self.lex_error(),
            State::Done => State::Done,
        };

        if previous == State::Start && next == State::Start && self.progress() == before {
            debug!(line = self.cursor.line_number(), "no progress in start state");
            self.state = State::Error;
            return;
        }
        if next != previous {
            trace!(from = ?previous, to = ?next, line = self.cursor.line_number(), "transition");
        }
        self.state = next;
    }

    fn progress(&self) -> (usize, usize, usize, bool, Option<usize>) {
        (
            self.cursor.line_number(),
            self.cursor.index(),
            self.last_id,
            self.at_end,
            self.text_line,
        )
    }

    fn lex_start(&mut self) -> State {
        if self.at_end || self.cursor.line_count() == 0 {
            return self.lex_eof();
        }

        let number = self.cursor.line_number();
        let class = classify_line(self.cursor.current_line());
        let rejected = self.text_line == Some(number);
        match class {
            LineClass::Blank => {
                let text = self.cursor.current_line().to_string();
                self.emit(ItemKind::BlankLine, number, 1, &text);
                self.goto_line(number + 1);
                State::Start
            }
            _ if class.indent() > 0 => self.lex_indented(number, rejected),
            _ => self.lex_text(number, rejected),
        }
    }

    /// A flush-left line: section start, or one line of paragraph text
    fn lex_text(&mut self, number: usize, rejected: bool) -> State {
        // A lone "::" introduces a literal block rather than adorning anything
        let literal_marker = self.cursor.current_line().trim_end() == "::";

        if !rejected && !literal_marker {
            let first = self.cursor.mark();
            let (second, _) = self.cursor.peek();
            if first.is_some_and(is_adornment_char) && second == first {
                return State::Section;
            }
        }

        let mut runes = 0;
        while self.cursor.mark().is_some() {
            self.cursor.next();
            runes += 1;
        }
        if !rejected && classify_line(self.cursor.peek_next_line()).is_adornment() {
            self.cursor.backup(runes);
            return State::Section;
        }

        let text = self.cursor.current_line().to_string();
        self.literal = if text.trim_end().ends_with("::") {
            Literal::Pending
        } else {
            Literal::Closed
        };
        self.emit(ItemKind::Paragraph, number, 1, &text);
        self.goto_line(number + 1);
        State::Start
    }

    /// An indented line: a misplaced section, or indentation followed by quoted or literal text
    fn lex_indented(&mut self, number: usize, rejected: bool) -> State {
        let literal = matches!(self.literal, Literal::Pending | Literal::Open);
        if !literal && !rejected {
            if let Some(section) = sections::match_section(&self.cursor) {
                if !section.is_standalone() {
                    return State::Section;
                }
            }
        }

        while matches!(self.cursor.mark(), Some(c) if c.is_whitespace()) {
            self.cursor.next();
        }
        let column = self.cursor.column();
        let line = self.cursor.current_line().to_string();
        let (indent, rest) = line.split_at(self.cursor.index());

        self.emit(ItemKind::Space, number, 1, indent);
        if literal {
            self.literal = Literal::Open;
            self.emit(ItemKind::LiteralBlock, number, column, rest);
        } else {
            self.emit(ItemKind::Blockquote, number, column, rest);
        }
        self.goto_line(number + 1);
        State::Start
    }

    fn lex_section(&mut self) -> State {
        let number = self.cursor.line_number();
        let Some(section) = sections::match_section(&self.cursor) else {
            trace!(line = number, "not a section");
            self.text_line = Some(number);
            return State::Start;
        };

        let outcome = section.validate(&mut self.levels, self.options.min_adornment_length);
        let (pieces, slot) = section.pieces(&self.cursor);
        let first = section.first_line();
        let mut resume = section.last_line() + 1;
        let mut defect = match outcome {
            Ok(level) => {
                debug!(line = first, ?level, "section");
                None
            }
            Err(defect) => {
                resume = diagnostics::resynchronization_point(&self.cursor, resume);
                debug!(line = first, %defect, resume, "malformed section");
                Some(defect)
            }
        };

        for (i, piece) in pieces.into_iter().enumerate() {
            if i == slot {
                if let Some(defect) = defect.take() {
                    self.emit_message(defect, first, resume);
                }
            }
            self.emit_piece(piece);
        }
        if let Some(defect) = defect {
            self.emit_message(defect, first, resume);
        }

        self.literal = Literal::Closed;
        self.goto_line(resume);
        State::Start
    }

    fn lex_eof(&mut self) -> State {
        let line = self.cursor.line_count().max(1);
        let column = self.cursor.line(line).map_or(1, |text| rune_len(text) + 1);
        self.emit(ItemKind::Eof, line, column, "");
        State::Done
    }

    fn lex_error(&mut self) -> State {
        let line = self.cursor.line_number();
        let column = self.cursor.column();
        let text = format!("lexer made no progress at line {}", line);
        self.emit(ItemKind::Error, line, column, &text);
        State::Done
    }

    fn goto_line(&mut self, number: usize) {
        if number > self.cursor.line_count() {
            self.at_end = true;
        } else {
            self.cursor.goto_location(0, number);
        }
    }

    fn normalize(&self, text: &str) -> String {
        if self.options.normalize_text {
            text.nfc().collect()
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, kind: ItemKind, line: usize, column: usize, text: &str) {
        self.last_id += 1;
        let item = Item::new(self.last_id, kind, line, column, self.normalize(text));
        trace!(id = item.id, kind = %item.kind, line, column, "emit");
        self.queue.push_back(item);
    }

    fn emit_piece(&mut self, piece: Piece) {
        self.emit(piece.kind, piece.line, piece.column, &piece.text);
    }

    fn emit_message(&mut self, defect: Defect, first: usize, end: usize) {
        let mut message = diagnostics::system_message(&self.name, defect, &self.cursor, first, end);
        for item in &mut message.items {
            item.text = self.normalize(&item.text);
        }
        self.last_id += 1;
        let mut item = Item::new(
            self.last_id,
            ItemKind::SystemMessage,
            first,
            1,
            defect.description(),
        );
        debug!(id = item.id, level = %message.level, line = first, "{}", defect);
        item.message = Some(message);
        self.queue.push_back(item);
    }
}

impl Iterator for Lexer {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        loop {
            if let Some(item) = self.queue.pop_front() {
                return Some(item);
            }
            if self.state == State::Done {
                return None;
            }
            self.step();
        }
    }
}

impl FusedIterator for Lexer {}
