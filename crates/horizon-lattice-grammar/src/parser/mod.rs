//! Stylesheet parsing: selectors, declaration blocks, `@media` query
//! lists and `@import` resolution.

mod css_parser;
mod error;
mod import;
mod media;
mod selector;

pub use css_parser::{parse_declarations, parse_stylesheet, ParserOptions};
pub use error::{Diagnostic, DiagnosticKind};
pub use import::{FileImportFetcher, ImportFetcher};
pub(crate) use import::resolve_imports;
pub use media::parse_media_list;
pub use selector::parse_selector_list;
