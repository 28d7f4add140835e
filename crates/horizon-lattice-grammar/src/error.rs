//! Error types for the grammar engine.

use std::path::PathBuf;

/// Result type alias for grammar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tokenizing, compiling grammars, or parsing stylesheets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input at the character level.
    #[error("{message} at {line}:{column}")]
    Lex {
        message: String,
        line: u32,
        column: u32,
    },

    /// An expected token was not found.
    #[error("{message} at {line}:{column}\n{excerpt}")]
    Syntax {
        message: String,
        line: u32,
        column: u32,
        excerpt: String,
    },

    /// A grammar notation could not be compiled.
    #[error("Cannot compile grammar '{name}': {message}")]
    GrammarCompile { name: String, message: String },

    /// No grammar matched a property's value.
    #[error("Invalid value for property '{property}': '{value}'")]
    PropertyParse { property: String, value: String },

    /// A property has no grammar in the definition table.
    #[error("Unknown property '{property}'")]
    UnknownProperty { property: String },

    /// Selector parsing error.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// An `@import` could not be fetched or parsed.
    #[error("Failed to import '{url}': {message}")]
    Import { url: String, message: String },

    /// File I/O error.
    #[error("Failed to read stylesheet '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a lexical error.
    pub fn lex(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Lex {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a syntax error.
    pub fn syntax(
        message: impl Into<String>,
        line: u32,
        column: u32,
        excerpt: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            line,
            column,
            excerpt: excerpt.into(),
        }
    }

    /// Create a grammar compilation error.
    pub fn grammar(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GrammarCompile {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a property value error.
    pub fn property_parse(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::PropertyParse {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Create an unknown property error.
    pub fn unknown_property(property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            property: property.into(),
        }
    }

    /// Create a selector error.
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Create an import error.
    pub fn import(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Import {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the parse that raised it.
    ///
    /// Property, selector and import errors are recovered by the stylesheet
    /// parser and reported as diagnostics instead.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Lex { .. } | Self::Syntax { .. } | Self::Io { .. })
    }
}
