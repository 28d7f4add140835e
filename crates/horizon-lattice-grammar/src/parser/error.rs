//! Recoverable stylesheet problems.

use std::fmt;

use crate::Error;

/// What kind of problem a [`Diagnostic`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A declaration's value matched no alternative of its grammar.
    PropertyParse,
    /// A declaration named a property without a grammar.
    UnknownProperty,
    /// A rule's selector list could not be parsed; the rule was skipped.
    InvalidSelector,
    /// An `@import` could not be resolved.
    Import,
    /// Malformed structure that was skipped, such as a declaration
    /// without a colon.
    Syntax,
    /// A property grammar failed to compile.
    GrammarCompile,
}

/// A problem the stylesheet parser recovered from, with its location
/// (1-indexed).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    /// Create a new diagnostic with the given message and location.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }

    /// Report `error` at the given location.
    pub fn from_error(error: &Error, line: u32, column: u32) -> Self {
        let kind = match error {
            Error::PropertyParse { .. } => DiagnosticKind::PropertyParse,
            Error::UnknownProperty { .. } => DiagnosticKind::UnknownProperty,
            Error::InvalidSelector { .. } => DiagnosticKind::InvalidSelector,
            Error::Import { .. } | Error::Io { .. } => DiagnosticKind::Import,
            Error::GrammarCompile { .. } => DiagnosticKind::GrammarCompile,
            Error::Lex { .. } | Error::Syntax { .. } => DiagnosticKind::Syntax,
        };
        Self::new(kind, error.to_string(), line, column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}
