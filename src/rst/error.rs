//! Errors for caller misuse and for the machinery around the lexer.
//!
//! Document defects are never errors: they become system message items in the token stream.

use std::fmt;

use config::ConfigError;

/// Why a cursor location was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFault {
    /// Line numbers are 1-based and must not exceed the line count
    NoSuchLine { line_count: usize },
    /// The byte index lies past the end of the line
    PastEndOfLine { length: usize },
    /// The byte index falls inside a multi-byte rune
    InsideRune,
}

impl fmt::Display for LocationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationFault::NoSuchLine { line_count } => {
                write!(f, "document has {} line(s)", line_count)
            }
            LocationFault::PastEndOfLine { length } => {
                write!(f, "line is {} byte(s) long", length)
            }
            LocationFault::InsideRune => write!(f, "index is not on a rune boundary"),
        }
    }
}

#[derive(Debug)]
pub enum LexError {
    InvalidLocation {
        line: usize,
        index: usize,
        fault: LocationFault,
    },
    Spawn(std::io::Error),
    Config(ConfigError),
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::InvalidLocation { line, index, fault } => {
                write!(f, "Invalid location {}:{}: {}", line, index, fault)
            }
            LexError::Spawn(e) => write!(f, "Could not start the token producer: {}", e),
            LexError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for LexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LexError::InvalidLocation { .. } => None,
            LexError::Spawn(e) => Some(e),
            LexError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for LexError {
    fn from(err: ConfigError) -> Self {
        LexError::Config(err)
    }
}
