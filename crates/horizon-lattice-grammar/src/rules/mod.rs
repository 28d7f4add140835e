//! Stylesheet model: rules, rule bodies and media queries.

mod body;
mod media;
mod rule;
mod stylesheet;

pub(crate) use body::normalize;
pub use body::{RuleBody, SelectorEntry};
pub use media::{media_list_matches, MediaQuery};
pub use rule::Rule;
pub use stylesheet::StyleSheet;
