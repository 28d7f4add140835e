//! Combinator evaluation.
//!
//! Every term works on a forked lexer and commits with
//! [`Lexer::sync`] only when it matched, so a failed term never moves
//! the caller's cursor. Matching is greedy and leftmost-first: the first
//! alternative that matches in declaration order wins.

use crate::lexer::{Lexer, TokenKind};
use crate::types::{PropertyValue, Value};

use super::record::ParseRecord;
use super::term::{Term, TermKind, ValueRef};

/// Keywords every property accepts when they are the whole value.
pub const CSS_WIDE_KEYWORDS: [&str; 4] = ["initial", "inherit", "unset", "revert"];

/// Values collected while a term is being matched.
#[derive(Debug, Default)]
struct Capture {
    value: Option<PropertyValue>,
    /// Values of named, non-virtual productions matched inside the term.
    slots: Vec<(String, PropertyValue)>,
}

impl Capture {
    fn push(&mut self, value: Value) {
        PropertyValue::merge_into(&mut self.value, value.into());
    }

    fn absorb(&mut self, other: Capture) {
        if let Some(value) = other.value {
            PropertyValue::merge_into(&mut self.value, value);
        }
        for (name, value) in other.slots {
            match self.slots.iter_mut().find(|(n, _)| *n == name) {
                Some((_, slot)) => slot.extend(value),
                None => self.slots.push((name, value)),
            }
        }
    }
}

impl Term {
    /// Match the whole remaining input of `lexer` as a value of this
    /// grammar and write the result into `record`.
    ///
    /// On success the lexer is left at the end and the root's name (unless
    /// it is virtual) and any named sub-productions are set in `record`.
    /// On failure neither the lexer nor the record is changed.
    pub fn parse(&self, lexer: &mut Lexer<'_>, record: &mut ParseRecord) -> bool {
        let mut work = lexer.copy();
        let Some(capture) = self.evaluate_root(&mut work) else {
            return false;
        };
        lexer.sync(&work);
        for (name, value) in capture.slots {
            record.insert(name, value);
        }
        if let (Some(name), Some(value)) = (&self.name, capture.value) {
            if !self.is_virtual {
                record.insert(name.clone(), value);
            }
        }
        true
    }

    /// Match `source` in full and return the matched value.
    ///
    /// ```
    /// use horizon_lattice_grammar::grammar::DefinitionTable;
    /// use horizon_lattice_grammar::types::{Length, PropertyValue, Value};
    ///
    /// let table = DefinitionTable::new();
    /// let term = table.compile("<length> | auto", "size").unwrap();
    /// assert_eq!(
    ///     term.parse_value("12px"),
    ///     Some(PropertyValue::Single(Value::Length(Length::px(12.0))))
    /// );
    /// assert_eq!(term.parse_value("12px 4px"), None);
    /// ```
    pub fn parse_value(&self, source: &str) -> Option<PropertyValue> {
        let mut lexer = Lexer::new(source);
        self.evaluate_root(&mut lexer)?.value
    }

    fn evaluate_root(&self, lexer: &mut Lexer<'_>) -> Option<Capture> {
        if lexer.kind() == TokenKind::Identifier && lexer.peek().is_end() {
            let text = lexer.text().to_ascii_lowercase();
            if CSS_WIDE_KEYWORDS.contains(&text.as_str()) {
                lexer.next();
                let mut capture = Capture::default();
                capture.push(Value::Keyword(text));
                return Some(capture);
            }
        }
        let mut capture = Capture::default();
        (self.eval(lexer, &mut capture) && lexer.is_end()).then_some(capture)
    }

    /// Run repetition cycles of this term. True when at least one cycle
    /// matched and the minimum count was reached.
    fn eval(&self, lexer: &mut Lexer<'_>, capture: &mut Capture) -> bool {
        let mut work = lexer.copy();
        let mut local = Capture::default();
        let mut count = 0u32;

        while self.repeat.allows(count) && !work.is_end() {
            let mut attempt = work.copy();
            if count > 0 && self.require_comma {
                if attempt.text() != "," {
                    break;
                }
                attempt.next();
            }
            let before = attempt.offset();
            let mut temp = Capture::default();
            if !self.cycle(&mut attempt, &mut temp) {
                break;
            }
            count += 1;
            let progressed = attempt.offset() != before;
            work.sync(&attempt);
            local.absorb(temp);
            if !progressed {
                break;
            }
        }

        if count == 0 || count < self.repeat.min {
            return false;
        }
        lexer.sync(&work);
        capture.absorb(local);
        true
    }

    /// One cycle of this term's combinator.
    fn cycle(&self, lexer: &mut Lexer<'_>, capture: &mut Capture) -> bool {
        match &self.kind {
            TermKind::Sequence(children) => children
                .iter()
                .all(|child| child.eval(lexer, capture) || child.is_optional()),
            TermKind::AllOf(children) => {
                let done = scan(children, lexer, capture);
                children
                    .iter()
                    .zip(&done)
                    .all(|(child, hit)| *hit || child.is_optional())
            }
            TermKind::AnyOf(children) => scan(children, lexer, capture).contains(&true),
            TermKind::ExactlyOneOf(children) => {
                children.iter().any(|child| child.eval(lexer, capture))
            }
            TermKind::ValueRef(ValueRef::Leaf(parser)) => match parser.parse(lexer) {
                Some(value) => {
                    capture.push(value);
                    true
                }
                None => false,
            },
            TermKind::ValueRef(ValueRef::Grammar {
                name,
                term,
                is_virtual,
            }) => {
                let mut inner = Capture::default();
                if !term.eval(lexer, &mut inner) {
                    return false;
                }
                if !is_virtual {
                    if let Some(value) = &inner.value {
                        inner.slots.push((name.clone(), value.clone()));
                    }
                }
                capture.absorb(inner);
                true
            }
            TermKind::Literal(text) => {
                if !literal_matches(lexer, text) {
                    return false;
                }
                capture.push(Value::Keyword(text.clone()));
                lexer.next();
                true
            }
            TermKind::Symbol(text) => {
                if lexer.is_end() || lexer.text() != text {
                    return false;
                }
                lexer.next();
                true
            }
        }
    }
}

/// Try each unmatched child in declaration order, restarting the scan
/// after every hit, until a full pass matches nothing.
fn scan(children: &[Term], lexer: &mut Lexer<'_>, capture: &mut Capture) -> Vec<bool> {
    let mut done = vec![false; children.len()];
    'scan: loop {
        for (i, child) in children.iter().enumerate() {
            if done[i] {
                continue;
            }
            if child.eval(lexer, capture) {
                done[i] = true;
                continue 'scan;
            }
        }
        return done;
    }
}

fn literal_matches(lexer: &Lexer<'_>, text: &str) -> bool {
    if lexer.is_end() {
        return false;
    }
    match lexer.kind() {
        TokenKind::Identifier => lexer.text().eq_ignore_ascii_case(text),
        TokenKind::String => {
            let token = lexer.text();
            token.len() >= 2 && &token[1..token.len() - 1] == text
        }
        _ => lexer.text() == text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::DefinitionTable;
    use crate::types::{Color, Length, Number, Percentage};

    fn table() -> DefinitionTable {
        DefinitionTable::new()
    }

    fn value(notation: &str, input: &str) -> Option<PropertyValue> {
        table().compile(notation, "t").unwrap().parse_value(input)
    }

    fn accepts(notation: &str, input: &str) -> bool {
        value(notation, input).is_some()
    }

    #[test]
    fn alternatives_by_kind() {
        let term = table().compile("<length>|<percentage>|auto", "t").unwrap();
        assert_eq!(
            term.parse_value("12px"),
            Some(Value::Length(Length::px(12.0)).into())
        );
        assert_eq!(
            term.parse_value("50%"),
            Some(Value::Percentage(Percentage(50.0)).into())
        );
        assert_eq!(term.parse_value("auto"), Some(Value::keyword("auto").into()));
        assert_eq!(term.parse_value("none"), None);
    }

    #[test]
    fn repeated_leaf_becomes_list() {
        assert_eq!(
            value("<color>{1,4}", "red blue"),
            Some(PropertyValue::List(vec![
                Value::Color(Color::rgb(255, 0, 0)),
                Value::Color(Color::rgb(0, 0, 255)),
            ]))
        );
        assert_eq!(
            value("<color>{1,4}", "red"),
            Some(Value::Color(Color::rgb(255, 0, 0)).into())
        );
    }

    #[test]
    fn cardinality_bounds() {
        assert!(!accepts("<number>{2,3}", "1"));
        assert!(accepts("<number>{2,3}", "1 2"));
        assert!(accepts("<number>{2,3}", "1 2 3"));
        assert!(!accepts("<number>{2,3}", "1 2 3 4"));
    }

    #[test]
    fn all_of_accepts_permutations() {
        for input in ["a b c", "a c b", "b a c", "b c a", "c a b", "c b a"] {
            assert!(accepts("a && b && c", input), "{input}");
        }
        assert!(!accepts("a && b && c", "a b"));
        assert!(!accepts("a && b && c", "a b c a"));
    }

    #[test]
    fn all_of_with_optional_member() {
        assert!(accepts("a && b?", "a"));
        assert!(accepts("a && b?", "b a"));
        assert!(!accepts("a && b?", "b"));
    }

    #[test]
    fn any_of_accepts_subsets_in_any_order() {
        assert!(accepts("a || b || c", "b"));
        assert!(accepts("a || b || c", "c a"));
        assert!(accepts("a || b || c", "c b a"));
        assert!(!accepts("a || b || c", "a a"));
        assert!(!accepts("a || b || c", "d"));
    }

    #[test]
    fn exactly_one_rejects_two() {
        assert!(accepts("a | b", "a"));
        assert!(accepts("a | b", "b"));
        assert!(!accepts("a | b", "a b"));
    }

    #[test]
    fn greedy_first_alternative_wins() {
        // `a` is taken by the first alternative, so `a b` cannot match
        assert!(!accepts("[a | a b] c", "a b c"));
        assert!(accepts("[a b | a] c", "a c"));
    }

    #[test]
    fn failing_parse_keeps_position() {
        let term = table().compile("<length> <length>", "t").unwrap();
        let mut lexer = Lexer::new("12px red");
        let before = lexer.offset();
        let mut record = ParseRecord::new();
        assert!(!term.parse(&mut lexer, &mut record));
        assert_eq!(lexer.offset(), before);
        assert!(record.is_empty());
    }

    #[test]
    fn failed_optional_branch_is_rolled_back() {
        let term = table().compile("[<length> red]? <length> blue", "t").unwrap();
        assert_eq!(
            term.parse_value("4px blue"),
            Some(PropertyValue::List(vec![
                Value::Length(Length::px(4.0)),
                Value::keyword("blue"),
            ]))
        );
    }

    #[test]
    fn comma_separated_lists() {
        assert!(accepts("<number>#", "1, 2, 3"));
        assert!(!accepts("<number>#", "1 2"));
        assert!(!accepts("<number>#", "1, 2,"));
        assert!(accepts("<number>#{2,2}", "1, 2"));
        assert!(!accepts("<number>#{2,2}", "1"));
        assert_eq!(value("<number>#", "1, 2").map(|v| v.len()), Some(2));
    }

    #[test]
    fn trailing_comma_is_left_for_the_parent() {
        assert!(accepts("<number># , x", "1, 2, x"));
    }

    #[test]
    fn symbols_are_not_stored() {
        assert_eq!(
            value("<number> / <number>", "16 / 9"),
            Some(PropertyValue::List(vec![
                Value::Number(Number(16.0)),
                Value::Number(Number(9.0)),
            ]))
        );
    }

    #[test]
    fn literals_are_case_insensitive() {
        assert_eq!(value("auto", "AUTO"), Some(Value::keyword("auto").into()));
    }

    #[test]
    fn css_wide_keywords() {
        let term = table().compile("<length>", "width").unwrap();
        let mut record = ParseRecord::new();
        assert!(term.parse(&mut Lexer::new("inherit"), &mut record));
        assert_eq!(record.get_single("width"), Some(&Value::keyword("inherit")));
        assert!(!term.parse(&mut Lexer::new("inherit 4px"), &mut ParseRecord::new()));
    }

    #[test]
    fn named_productions_get_slots() {
        let table = DefinitionTable::new()
            .with_property("border", "<border_width> || <border_style>")
            .with_property("border_width", "<length>")
            .with_virtual("border_style", "solid | dashed");
        let border = table.property("border").unwrap().unwrap();
        let mut record = ParseRecord::new();
        assert!(border.parse(&mut Lexer::new("dashed 2px"), &mut record));
        assert_eq!(
            record.get_single("border_width"),
            Some(&Value::Length(Length::px(2.0)))
        );
        assert!(!record.contains("border_style"));
        assert_eq!(record.get("border").map(PropertyValue::len), Some(2));
    }

    #[test]
    fn virtual_roots_are_not_written() {
        let table = DefinitionTable::new().with_virtual("v", "a");
        let mut compiler = super::super::compiler::Compiler::new(&table);
        let term = compiler.named("v", true).unwrap();
        let mut record = ParseRecord::new();
        assert!(term.parse(&mut Lexer::new("a"), &mut record));
        assert!(record.is_empty());
    }

    #[test]
    fn zero_width_cycles_terminate() {
        assert!(!accepts("[a? b?]*", "c"));
        assert!(accepts("[a? b?]* c", "c"));
    }

    #[test]
    fn compiled_twice_parse_alike() {
        let notation = "[<length> | auto]{1,2} && [solid || <color>]";
        let first = DefinitionTable::new().compile(notation, "t").unwrap();
        let second = DefinitionTable::new().compile(notation, "t").unwrap();
        for input in ["4px solid", "red auto 2px", "solid red auto", "auto", "red"] {
            assert_eq!(first.parse_value(input), second.parse_value(input), "{input}");
        }
    }
}
