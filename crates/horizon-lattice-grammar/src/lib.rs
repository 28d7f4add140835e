//! CSS grammar engine for Horizon Lattice.
//!
//! This crate parses stylesheets with property grammars that are data,
//! not code, featuring:
//!
//! - **Lexer**: A forkable token cursor with O(1) backtracking
//! - **Value types**: Lengths, colors, gradients, transforms and other leaf values
//! - **Grammars**: CSS value definition syntax compiled into combinator trees
//! - **Stylesheets**: Selectors, rule bodies, `@media` and `@import`
//!
//! # Example
//!
//! ```
//! use horizon_lattice_grammar::prelude::*;
//!
//! let sheet = StyleSheet::parse(
//!     "a.cls { color: red; border: 1px solid #333 }
//!      @media (min-width: 600px) { a.cls { color: blue } }",
//! )?;
//!
//! let rule = sheet.get_rule("a.cls").unwrap();
//! assert_eq!(
//!     rule.get("color").and_then(PropertyValue::as_single),
//!     Some(&Value::Color(Color::rgb(255, 0, 0)))
//! );
//! assert_eq!(sheet.rules_for("a.cls", &Viewport::new(800.0, 600.0)).len(), 2);
//! assert_eq!(sheet.rules_for("a.cls", &Viewport::new(320.0, 480.0)).len(), 1);
//! # Ok::<(), horizon_lattice_grammar::Error>(())
//! ```

pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod rules;
pub mod selector;
pub mod types;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::grammar::{DefinitionTable, ParseRecord, Term};
    pub use crate::lexer::{Lexer, TokenKind};
    pub use crate::parser::{Diagnostic, DiagnosticKind, ImportFetcher, ParserOptions};
    pub use crate::rules::{MediaQuery, Rule, RuleBody, StyleSheet};
    pub use crate::selector::{Combinator, Selector, SelectorPart};
    pub use crate::types::{Color, Length, MediaEnvironment, PropertyValue, Value, Viewport};
}
