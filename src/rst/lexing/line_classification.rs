//! Line Classification
//!
//! Classifies a single physical line as blank, section adornment or text. The line is split
//! into whitespace, punctuation and word runs by a logos lexer; the classification is then a
//! matter of looking at the shape of those runs. This is what the state machine and the section
//! matcher use for one-line lookahead, so it never looks past the line it is given.

use logos::Logos;

/// Characters that may form a section adornment
pub const SECTION_ADORNMENTS: [char; 32] = [
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<',
    '=', '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~',
];

pub fn is_adornment_char(c: char) -> bool {
    SECTION_ADORNMENTS.contains(&c)
}

/// Raw runs within a line
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum LineLexeme {
    #[regex(r"\s+")]
    Whitespace,

    // Same set as SECTION_ADORNMENTS: the printable ASCII punctuation
    #[regex(r"[!-/:-@\[-`{-~]+")]
    Punctuation,

    #[regex(r"[^\s!-/:-@\[-`{-~]+")]
    Word,
}

/// The classification of one physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Empty or only whitespace
    Blank,

    /// One adornment character repeated, optionally indented and followed by whitespace.
    /// `length` and `indent` count runes.
    Adornment {
        ch: char,
        length: usize,
        indent: usize,
    },

    /// Anything else; `indent` counts leading whitespace runes
    Text { indent: usize },
}

impl LineClass {
    pub fn is_blank(&self) -> bool {
        matches!(self, LineClass::Blank)
    }

    pub fn is_adornment(&self) -> bool {
        matches!(self, LineClass::Adornment { .. })
    }

    pub fn indent(&self) -> usize {
        match self {
            LineClass::Blank => 0,
            LineClass::Adornment { indent, .. } | LineClass::Text { indent } => *indent,
        }
    }
}

/// Classify a line. `line` must not contain a line terminator.
pub fn classify_line(line: &str) -> LineClass {
    let mut lexer = LineLexeme::lexer(line);
    let mut indent = 0;
    let mut content: Option<(LineLexeme, &str)> = None;
    let mut runs = 0;

    while let Some(result) = lexer.next() {
        let lexeme = result.unwrap_or(LineLexeme::Word);
        match (lexeme, content) {
            (LineLexeme::Whitespace, None) => indent = rune_len(lexer.slice()),
            (LineLexeme::Whitespace, Some(_)) => {}
            (_, None) => {
                content = Some((lexeme, lexer.slice()));
                runs = 1;
            }
            (_, Some(_)) => runs += 1,
        }
    }

    match content {
        None => LineClass::Blank,
        Some((LineLexeme::Punctuation, run)) if runs == 1 => {
            let mut chars = run.chars();
            match chars.next() {
                Some(ch) if chars.all(|c| c == ch) => LineClass::Adornment {
                    ch,
                    length: run.chars().count(),
                    indent,
                },
                _ => LineClass::Text { indent },
            }
        }
        Some(_) => LineClass::Text { indent },
    }
}

/// Rune length of `text`
pub fn rune_len(text: &str) -> usize {
    text.chars().count()
}
