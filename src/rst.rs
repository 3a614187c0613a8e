//! Main module for the rst lexer

pub mod config;
pub mod error;
pub mod lexing;
pub mod token;

pub use error::LexError;
pub use token::{Item, ItemKind};
