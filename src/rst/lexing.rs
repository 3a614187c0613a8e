//! Lexer
//!
//! This module turns the text of one document into a stream of [`Item`]s.
//!
//! Structure:
//!     The document is split into physical lines once, by the [`cursor`]. The [`state_machine`]
//!     then walks those lines, classifying each one with a small logos scanner
//!     ([`line_classification`]) and handing section shapes to the [`sections`] matcher. Malformed
//!     sections become system message items built by [`diagnostics`]; they never stop the lexer.
//!
//! Delivery:
//!     [`Lexer`] is an [`Iterator`] that computes one item per pull, for callers on a single
//!     thread. [`TokenChannel`] runs the same lexer on a producer thread and hands items over a
//!     channel holding at most one of them, for sync or async consumers.
//!
//!     Either way the stream ends with exactly one terminal item, `EOF` or `Error`, and ids run
//!     1, 2, 3, ... within one run.

pub mod channel;
pub mod cursor;
pub mod diagnostics;
pub mod line_classification;
pub mod sections;
pub mod state_machine;

pub use channel::TokenChannel;
pub use cursor::Cursor;
pub use diagnostics::{Defect, Severity, SystemMessage};
pub use state_machine::{Lexer, State};

use crate::rst::token::Item;

/// Lexes a whole document with the default options and collects the stream.
pub fn tokenize(name: &str, text: &str) -> Vec<Item> {
    Lexer::new(name, text).collect()
}

/// The highest severity among the system messages of `items`, if there are any.
pub fn worst_severity(items: &[Item]) -> Option<Severity> {
    items
        .iter()
        .filter_map(|item| item.message.as_ref())
        .map(|message| message.level)
        .max()
}
