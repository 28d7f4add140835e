//! Compiled selectors.
//!
//! Selectors are parsed into criteria groups that an element matcher
//! walks from the subject outward; this crate does no matching itself.

mod types;

pub use types::*;
