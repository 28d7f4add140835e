//! Compiled grammar nodes.

use std::fmt;
use std::sync::Arc;

use crate::types::LeafParser;

/// Repetition bounds of a term. `max == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Repetition {
    pub min: u32,
    pub max: Option<u32>,
}

impl Repetition {
    /// Exactly once.
    pub const ONCE: Self = Self { min: 1, max: Some(1) };

    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Whether `count` further cycles may still run.
    pub fn allows(&self, count: u32) -> bool {
        self.max.is_none_or(|max| count < max)
    }
}

impl Default for Repetition {
    fn default() -> Self {
        Self::ONCE
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (1, Some(1)) => Ok(()),
            (0, Some(1)) => f.write_str("?"),
            (0, None) => f.write_str("*"),
            (1, None) => f.write_str("+"),
            (min, None) => write!(f, "{{{min},}}"),
            (min, Some(max)) if min == max => write!(f, "{{{min}}}"),
            (min, Some(max)) => write!(f, "{{{min},{max}}}"),
        }
    }
}

/// The target of a `<name>` reference.
#[derive(Debug, Clone)]
pub enum ValueRef {
    /// A leaf parser from the registry.
    Leaf(Arc<dyn LeafParser>),
    /// Another compiled grammar.
    Grammar {
        name: String,
        term: Arc<Term>,
        /// Matches merge into the parent only and never get their own slot.
        is_virtual: bool,
    },
}

impl ValueRef {
    /// The referenced name.
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(parser) => parser.name(),
            Self::Grammar { name, .. } => name,
        }
    }
}

/// The combinator or terminal a [`Term`] applies.
#[derive(Debug, Clone)]
pub enum TermKind {
    /// Children in order (juxtaposition).
    Sequence(Vec<Term>),
    /// Every child once, in any order (`&&`).
    AllOf(Vec<Term>),
    /// One or more children, in any order (`||`).
    AnyOf(Vec<Term>),
    /// Exactly one child (`|`).
    ExactlyOneOf(Vec<Term>),
    /// A leaf or named grammar.
    ValueRef(ValueRef),
    /// A keyword or quoted string matched verbatim. Stored on match.
    Literal(String),
    /// Punctuation matched verbatim. Never stored.
    Symbol(String),
}

impl TermKind {
    pub(crate) fn is_group(&self) -> bool {
        matches!(
            self,
            Self::Sequence(_) | Self::AllOf(_) | Self::AnyOf(_) | Self::ExactlyOneOf(_)
        )
    }

    pub(crate) fn children(&self) -> &[Term] {
        match self {
            Self::Sequence(c) | Self::AllOf(c) | Self::AnyOf(c) | Self::ExactlyOneOf(c) => c,
            _ => &[],
        }
    }
}

/// A node of a compiled grammar.
#[derive(Debug, Clone)]
pub struct Term {
    pub kind: TermKind,
    pub repeat: Repetition,
    /// Repeats are separated by commas (`#`).
    pub require_comma: bool,
    /// Marked with `!` in the notation. Carried, not interpreted.
    pub important: bool,
    /// Property name a root term writes its value under.
    pub name: Option<String>,
    /// Set on roots compiled from the virtual table.
    pub is_virtual: bool,
    /// Whether suffix bounds were applied directly to this group.
    pub(crate) bounded: bool,
}

impl Term {
    pub fn new(kind: TermKind) -> Self {
        Self {
            kind,
            repeat: Repetition::ONCE,
            require_comma: false,
            important: false,
            name: None,
            is_virtual: false,
            bounded: false,
        }
    }

    /// Whether a failed match of this term may be skipped.
    pub fn is_optional(&self) -> bool {
        self.repeat.min == 0
    }

    /// Child terms of a combinator, empty for terminals.
    pub fn children(&self) -> &[Term] {
        self.kind.children()
    }
}

impl fmt::Display for Term {
    /// Renders the term back to notation, bracketing every group.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, children: &[Term], sep: &str| -> fmt::Result {
            f.write_str("[")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "{child}")?;
            }
            f.write_str("]")
        };
        match &self.kind {
            TermKind::Sequence(c) => join(f, c, " ")?,
            TermKind::AllOf(c) => join(f, c, " && ")?,
            TermKind::AnyOf(c) => join(f, c, " || ")?,
            TermKind::ExactlyOneOf(c) => join(f, c, " | ")?,
            TermKind::ValueRef(r) => write!(f, "<{}>", r.name())?,
            TermKind::Literal(text) | TermKind::Symbol(text) => f.write_str(text)?,
        }
        if self.require_comma {
            f.write_str("#")?;
            if self.repeat != Repetition::new(1, None) {
                let max = self.repeat.max.map_or(String::new(), |m| m.to_string());
                write!(f, "{{{},{max}}}", self.repeat.min)?;
            }
        } else {
            write!(f, "{}", self.repeat)?;
        }
        if self.important {
            f.write_str("!")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repetition_rendering() {
        assert_eq!(Repetition::ONCE.to_string(), "");
        assert_eq!(Repetition::new(0, Some(1)).to_string(), "?");
        assert_eq!(Repetition::new(2, Some(3)).to_string(), "{2,3}");
        assert_eq!(Repetition::new(2, None).to_string(), "{2,}");
    }

    #[test]
    fn allows_counts() {
        let rep = Repetition::new(1, Some(2));
        assert!(rep.allows(1));
        assert!(!rep.allows(2));
        assert!(Repetition::new(0, None).allows(1000));
    }

    #[test]
    fn term_rendering() {
        let mut seq = Term::new(TermKind::Sequence(vec![
            Term::new(TermKind::Literal("a".into())),
            Term::new(TermKind::Symbol("/".into())),
        ]));
        seq.repeat = Repetition::new(0, None);
        assert_eq!(seq.to_string(), "[a /]*");
    }
}
