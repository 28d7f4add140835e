//! Character-level tokenizer shared by grammar notation and CSS text.
//!
//! The [`Lexer`] is a cheap-to-clone cursor: parsers fork it with
//! [`Lexer::copy`], try a match, and commit with [`Lexer::sync`].

mod cursor;
mod symbols;
mod token;

pub use cursor::{tokenize, Lexer, LexerFlags, Token};
pub use symbols::SymbolTrie;
pub use token::TokenKind;
