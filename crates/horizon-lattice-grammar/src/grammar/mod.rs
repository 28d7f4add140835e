//! Value-definition grammars.
//!
//! A notation such as `<length> | <percentage> | auto` is compiled into a
//! [`Term`] tree once and cached in its [`DefinitionTable`]. Evaluating a
//! term against a [`Lexer`](crate::lexer::Lexer) fills a [`ParseRecord`]
//! with the property value and the values of any named sub-properties.
//!
//! Operators, tightest first:
//!
//! - juxtaposition: all terms in order
//! - `&&`: all terms in any order
//! - `||`: one or more terms in any order
//! - `|`: exactly one term
//!
//! Operators of a looser kind may not follow a tighter one at the same
//! nesting level; use brackets instead.
//!
//! Suffixes: `?`, `*`, `+`, `{m}`, `{m,}`, `{m,n}`, `#` (comma separated,
//! optionally `#{m,n}`) and `!` (important).
//!
//! # Example
//!
//! ```
//! use horizon_lattice_grammar::grammar::{DefinitionTable, ParseRecord};
//! use horizon_lattice_grammar::lexer::Lexer;
//!
//! let border = DefinitionTable::standard().property("border").unwrap().unwrap();
//! let mut record = ParseRecord::new();
//! assert!(border.parse(&mut Lexer::new("1px solid #333"), &mut record));
//! assert_eq!(record.get("border").unwrap().to_string(), "1px solid #333333");
//! ```

mod compiler;
mod defaults;
mod definitions;
mod eval;
mod record;
mod term;

pub use defaults::{MEDIA_FEATURES, PROPERTIES, VIRTUALS};
pub use definitions::DefinitionTable;
pub use eval::CSS_WIDE_KEYWORDS;
pub use record::{css_name, property_key, ParseRecord};
pub use term::{Repetition, Term, TermKind, ValueRef};
