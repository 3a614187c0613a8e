//! # rstlex
//!
//! A lexer for a reStructuredText-like markup language.
//!
//! The lexer turns raw document text into an ordered stream of typed items: titles, section
//! adornments, paragraphs, blockquotes, literal blocks, blank lines and system messages for
//! malformed input. It never fails on document content; defects are reported in-band.
//!
//! See [`rst::lexing`] for the structure of the lexer and [`rst::lexing::TokenChannel`] for
//! running it on a producer thread.

pub mod rst;
