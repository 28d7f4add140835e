//! Notation compiler: value-definition syntax to [`Term`] trees.

use std::sync::Arc;

use tracing::trace;

use super::definitions::DefinitionTable;
use super::term::{Repetition, Term, TermKind, ValueRef};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, TokenKind};

/// Which operator groups enclose the expression being read.
///
/// An operator that is already being collected by an enclosing group ends
/// the current operand instead of starting a new group.
#[derive(Debug, Clone, Copy, Default)]
struct Groups {
    one_of: bool,
    any_of: bool,
    all_of: bool,
}

pub(crate) struct Compiler<'t> {
    table: &'t DefinitionTable,
    /// Names whose compilation is in progress, for cycle detection.
    stack: Vec<String>,
    /// Name reported in errors.
    current: String,
}

impl<'t> Compiler<'t> {
    pub(crate) fn new(table: &'t DefinitionTable) -> Self {
        Self {
            table,
            stack: Vec::new(),
            current: String::new(),
        }
    }

    /// Compile `notation` as the root grammar `name`.
    pub(crate) fn compile_root(&mut self, notation: &str, name: &str, is_virtual: bool) -> Result<Term> {
        trace!(name, notation, "compiling grammar");
        let outer = std::mem::replace(&mut self.current, name.to_string());
        let result = self.compile_notation(notation);
        self.current = outer;
        let mut term = result?;
        term.name = Some(name.to_string());
        term.is_virtual = is_virtual;
        Ok(term)
    }

    fn compile_notation(&mut self, notation: &str) -> Result<Term> {
        let mut lexer = Lexer::new(notation);
        lexer.add_symbol("&&").add_symbol("||").reset();
        let term = self.expression(&mut lexer, Groups::default())?;
        if !lexer.is_end() {
            return Err(self.unexpected(&lexer));
        }
        term.ok_or_else(|| self.error("empty notation"))
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::grammar(&self.current, message)
    }

    fn unexpected(&self, lexer: &Lexer<'_>) -> Error {
        let hint = match lexer.text() {
            "&&" | "||" | "|" => "; operators of different kinds need brackets",
            _ => "",
        };
        self.error(format!(
            "unexpected `{}` at column {}{hint}",
            lexer.text(),
            lexer.column() + 1
        ))
    }

    /// Read terms until the input, a `]`, or an operator owned by an
    /// enclosing group ends the expression.
    fn expression(&mut self, lexer: &mut Lexer<'_>, groups: Groups) -> Result<Option<Term>> {
        let mut items: Vec<Term> = Vec::new();

        while !lexer.is_end() {
            if lexer.comment()? {
                continue;
            }
            match lexer.text() {
                "]" => break,
                "[" => {
                    lexer.next();
                    let inner = self.expression(lexer, Groups::default())?;
                    if lexer.text() != "]" {
                        return Err(if lexer.is_end() {
                            self.error("missing `]`")
                        } else {
                            self.unexpected(lexer)
                        });
                    }
                    lexer.next();
                    let inner = inner.ok_or_else(|| self.error("empty brackets"))?;
                    items.push(self.suffixes(lexer, inner)?);
                }
                "<" => {
                    let reference = self.reference(lexer)?;
                    items.push(self.suffixes(lexer, reference)?);
                }
                "&&" => {
                    if groups.all_of {
                        break;
                    }
                    let first = self.operand(items, "&&")?;
                    let inner = Groups {
                        all_of: true,
                        ..groups
                    };
                    return self.collect(lexer, first, "&&", inner, TermKind::AllOf).map(Some);
                }
                "||" => {
                    if groups.any_of || groups.all_of {
                        break;
                    }
                    let first = self.operand(items, "||")?;
                    let inner = Groups {
                        any_of: true,
                        ..groups
                    };
                    return self.collect(lexer, first, "||", inner, TermKind::AnyOf).map(Some);
                }
                "|" => {
                    if groups.one_of || groups.any_of || groups.all_of {
                        break;
                    }
                    let first = self.operand(items, "|")?;
                    let inner = Groups {
                        one_of: true,
                        ..groups
                    };
                    return self
                        .collect(lexer, first, "|", inner, TermKind::ExactlyOneOf)
                        .map(Some);
                }
                _ => {
                    let terminal = terminal(lexer);
                    lexer.next();
                    items.push(self.suffixes(lexer, terminal)?);
                }
            }
        }

        Ok(collapse(items))
    }

    fn operand(&self, items: Vec<Term>, operator: &str) -> Result<Term> {
        collapse(items).ok_or_else(|| self.error(format!("`{operator}` has no left operand")))
    }

    /// Gather `first` and every further operand joined by the operator.
    fn collect(
        &mut self,
        lexer: &mut Lexer<'_>,
        first: Term,
        operator: &str,
        groups: Groups,
        kind: fn(Vec<Term>) -> TermKind,
    ) -> Result<Term> {
        let mut children = vec![first];
        while lexer.text() == operator {
            lexer.next();
            let child = self
                .expression(lexer, groups)?
                .ok_or_else(|| self.error(format!("`{operator}` has no right operand")))?;
            children.push(child);
        }
        Ok(Term::new(kind(children)))
    }

    /// `<name>` with the lexer on `<`.
    fn reference(&mut self, lexer: &mut Lexer<'_>) -> Result<Term> {
        lexer.next();
        let mut raw = String::new();
        while !lexer.is_end() && lexer.text() != ">" {
            raw.push_str(lexer.text());
            lexer.next();
        }
        if lexer.is_end() {
            return Err(self.error(format!("unclosed reference `<{raw}`")));
        }
        lexer.next();
        let name = raw.replace('-', "_");
        let target = self.resolve(&name)?;
        Ok(Term::new(TermKind::ValueRef(target)))
    }

    /// Leaf registry first, then primary definitions, then virtual ones.
    fn resolve(&mut self, name: &str) -> Result<ValueRef> {
        if let Some(parser) = self.table.leaves().get(name) {
            return Ok(ValueRef::Leaf(Arc::clone(parser)));
        }
        for is_virtual in [false, true] {
            if self.table.notation_of(name, is_virtual).is_some() {
                let term = self.named(name, is_virtual)?;
                return Ok(ValueRef::Grammar {
                    name: name.to_string(),
                    term,
                    is_virtual,
                });
            }
        }
        Err(self.error(format!("undefined name `<{name}>`")))
    }

    /// Compile (or fetch from cache) a named production.
    pub(crate) fn named(&mut self, name: &str, is_virtual: bool) -> Result<Arc<Term>> {
        if let Some(term) = self.table.cached(name, is_virtual) {
            return Ok(term);
        }
        if self.stack.iter().any(|n| n == name) {
            let mut chain = self.stack.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(name);
            return Err(Error::grammar(name, format!("recursive reference ({chain})")));
        }
        let notation = self
            .table
            .notation_of(name, is_virtual)
            .ok_or_else(|| Error::grammar(name, "no definition"))?
            .to_string();

        self.stack.push(name.to_string());
        let result = self.compile_root(&notation, name, is_virtual);
        self.stack.pop();

        Ok(self.table.store(name, is_virtual, Arc::new(result?)))
    }

    /// Apply any `!`, `{m,n}`, `*`, `+`, `?` and `#` suffixes.
    fn suffixes(&mut self, lexer: &mut Lexer<'_>, mut term: Term) -> Result<Term> {
        loop {
            match lexer.text() {
                "!" => {
                    term.important = true;
                    lexer.next();
                }
                "*" => {
                    lexer.next();
                    term = bound(term, Repetition::new(0, None));
                }
                "+" => {
                    lexer.next();
                    term = bound(term, Repetition::new(1, None));
                }
                "?" => {
                    lexer.next();
                    term = bound(term, Repetition::new(0, Some(1)));
                }
                "{" => {
                    let repeat = self.braces(lexer)?;
                    term = bound(term, repeat);
                }
                "#" => {
                    lexer.next();
                    let repeat = if lexer.text() == "{" {
                        self.braces(lexer)?
                    } else {
                        Repetition::new(1, None)
                    };
                    term = bound(term, repeat);
                    term.require_comma = true;
                }
                _ => return Ok(term),
            }
        }
    }

    /// `{m}`, `{m,}` or `{m,n}` with the lexer on `{`.
    fn braces(&self, lexer: &mut Lexer<'_>) -> Result<Repetition> {
        lexer.next();
        let min = self.count(lexer)?;
        let max = if lexer.text() == "," {
            lexer.next();
            if lexer.text() == "}" {
                None
            } else {
                Some(self.count(lexer)?)
            }
        } else {
            Some(min)
        };
        if lexer.text() != "}" {
            return Err(self.error(format!("expected `}}` in repetition, found `{}`", lexer.text())));
        }
        lexer.next();
        if max.is_some_and(|max| max < min) {
            return Err(self.error(format!("repetition maximum below minimum {min}")));
        }
        Ok(Repetition::new(min, max))
    }

    fn count(&self, lexer: &mut Lexer<'_>) -> Result<u32> {
        let value = (lexer.kind() == TokenKind::Number)
            .then(|| lexer.text().parse::<u32>().ok())
            .flatten()
            .ok_or_else(|| self.error(format!("expected a count, found `{}`", lexer.text())))?;
        lexer.next();
        Ok(value)
    }
}

fn terminal(lexer: &Lexer<'_>) -> Term {
    let text = lexer.text();
    let kind = match lexer.kind() {
        TokenKind::String => TermKind::Literal(text[1..text.len() - 1].to_string()),
        TokenKind::Identifier | TokenKind::Number => TermKind::Literal(text.to_string()),
        _ => TermKind::Symbol(text.to_string()),
    };
    Term::new(kind)
}

/// Juxtaposed terms become a sequence; a lone term stands for itself.
fn collapse(mut items: Vec<Term>) -> Option<Term> {
    match items.len() {
        0 => None,
        1 => items.pop(),
        _ => Some(Term::new(TermKind::Sequence(items))),
    }
}

/// Give `term` repetition bounds, wrapping it in a sequence when it is a
/// terminal or already carries bounds of its own.
fn bound(term: Term, repeat: Repetition) -> Term {
    let mut target = if term.kind.is_group() && !term.bounded {
        term
    } else {
        Term::new(TermKind::Sequence(vec![term]))
    };
    target.repeat = repeat;
    target.bounded = true;
    target
}
