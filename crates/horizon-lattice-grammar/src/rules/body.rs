//! Rule bodies: selectors bound to rules, optionally under `@media`.

use std::fmt;

use cssparser::ToCss;

use super::media::{media_list_matches, MediaQuery};
use super::rule::Rule;
use crate::grammar::DefinitionTable;
use crate::parser::{self, Diagnostic};
use crate::selector::Selector;
use crate::types::MediaEnvironment;
use crate::Result;

/// A selector and the rule it is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorEntry {
    /// Selector text, whitespace collapsed.
    pub text: String,
    pub selector: Selector,
    rule: usize,
}

/// Selectors and their rules, guarded by an optional media query list.
///
/// Selectors with identical text share one entry; declaring the same
/// selector again merges into its rule. Rules may be shared by several
/// selectors (`a, b { ... }`) and are copied before a merge that would
/// affect only some of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBody {
    selectors: Vec<SelectorEntry>,
    rules: Vec<Rule>,
    media: Option<Vec<MediaQuery>>,
}

impl RuleBody {
    /// A top-level body.
    pub fn new() -> Self {
        Self::default()
    }

    /// A body scoped by `@media`.
    pub fn with_media(queries: Vec<MediaQuery>) -> Self {
        Self {
            media: Some(queries),
            ..Self::default()
        }
    }

    /// The media queries guarding this body.
    pub fn media(&self) -> Option<&[MediaQuery]> {
        self.media.as_deref()
    }

    /// The query list as written, `None` for a top-level body.
    pub fn media_text(&self) -> Option<String> {
        self.media.as_ref().map(|queries| {
            queries
                .iter()
                .map(|query| query.text.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
    }

    /// Whether this body applies in `env`. Top-level bodies always do.
    pub fn matches_media(&self, env: &dyn MediaEnvironment) -> bool {
        match &self.media {
            None => true,
            Some(queries) => media_list_matches(queries, env),
        }
    }

    /// Selectors in first-declaration order.
    pub fn selectors(&self) -> impl Iterator<Item = &SelectorEntry> {
        self.selectors.iter()
    }

    /// Rules with at least one selector.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|rule| rule.refs() > 0)
    }

    /// The rule of a selector, by its text.
    pub fn get_rule(&self, selector: &str) -> Option<&Rule> {
        let index = self.position(selector)?;
        self.rules.get(self.selectors[index].rule)
    }

    /// The rule of a selector for editing. A rule shared with other
    /// selectors is copied first.
    pub fn get_rule_mut(&mut self, selector: &str) -> Option<&mut Rule> {
        let index = self.position(selector)?;
        let rule = self.detach(index);
        self.rules.get_mut(rule)
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    fn position(&self, selector: &str) -> Option<usize> {
        let text = normalize(selector);
        self.selectors.iter().position(|entry| entry.text == text)
    }

    /// Give selector `index` a rule of its own and return the rule's index.
    fn detach(&mut self, index: usize) -> usize {
        let shared = self.selectors[index].rule;
        if self.rules[shared].refs() <= 1 {
            return shared;
        }
        self.rules[shared].release();
        let mut copy = self.rules[shared].clone();
        copy.set_refs(1);
        self.rules.push(copy);
        let rule = self.rules.len() - 1;
        self.selectors[index].rule = rule;
        rule
    }

    /// Bind `selectors` (parsed from a list whose items read `texts`) to
    /// `rule`. Selectors already present get `rule` merged into theirs;
    /// the new ones share a copy of it.
    pub fn insert(&mut self, selectors: Vec<(String, Selector)>, rule: Rule) {
        let mut fresh: Option<usize> = None;
        for (text, selector) in selectors {
            let text = normalize(&text);
            if let Some(index) = self.position(&text) {
                let existing = self.detach(index);
                self.rules[existing].merge(&rule);
                continue;
            }
            let index = match fresh {
                Some(index) => index,
                None => {
                    let mut copy = rule.clone();
                    copy.set_refs(0);
                    self.rules.push(copy);
                    let index = self.rules.len() - 1;
                    fresh = Some(index);
                    index
                }
            };
            self.rules[index].add_ref();
            self.selectors.push(SelectorEntry {
                text,
                selector,
                rule: index,
            });
        }
    }

    /// Ensure every selector of the list `text` exists, with an empty rule
    /// for new ones.
    pub fn create_selector(&mut self, text: &str) -> Result<()> {
        let selectors = parser::parse_selector_list(text)?;
        self.insert(selectors, Rule::new());
        Ok(())
    }

    /// Parse `declarations` (the inside of a `{ ... }` block) with the
    /// standard property table and merge them into the rules of
    /// `selector_text`, creating the selectors if needed.
    ///
    /// ```
    /// use horizon_lattice_grammar::rules::RuleBody;
    ///
    /// let mut body = RuleBody::new();
    /// let diagnostics = body.add_properties("p", "color: red; margin: 0 auto").unwrap();
    /// assert!(diagnostics.is_empty());
    /// assert!(body.get_rule("p").unwrap().contains("margin"));
    /// ```
    pub fn add_properties(&mut self, selector_text: &str, declarations: &str) -> Result<Vec<Diagnostic>> {
        self.add_properties_with(selector_text, declarations, DefinitionTable::standard())
    }

    /// [`add_properties`](Self::add_properties) with an explicit table.
    pub fn add_properties_with(
        &mut self,
        selector_text: &str,
        declarations: &str,
        table: &DefinitionTable,
    ) -> Result<Vec<Diagnostic>> {
        let selectors = parser::parse_selector_list(selector_text)?;
        let mut diagnostics = Vec::new();
        let rule = parser::parse_declarations(declarations, table, &mut diagnostics)?;
        self.insert(selectors, rule);
        Ok(diagnostics)
    }

    /// Merge every selector of `other` into this body.
    pub fn merge(&mut self, other: &RuleBody) {
        for (index, rule) in other.rules.iter().enumerate() {
            let selectors: Vec<_> = other
                .selectors
                .iter()
                .filter(|entry| entry.rule == index)
                .map(|entry| (entry.text.clone(), entry.selector.clone()))
                .collect();
            if !selectors.is_empty() {
                self.insert(selectors, rule.clone());
            }
        }
    }

    fn write_rules<W: fmt::Write>(&self, dest: &mut W, indent: &str) -> fmt::Result {
        let inner = format!("{indent}    ");
        for (index, rule) in self.rules.iter().enumerate() {
            let texts: Vec<&str> = self
                .selectors
                .iter()
                .filter(|entry| entry.rule == index)
                .map(|entry| entry.text.as_str())
                .collect();
            if texts.is_empty() {
                continue;
            }
            writeln!(dest, "{indent}{} {{", texts.join(", "))?;
            rule.write_declarations(dest, &inner)?;
            writeln!(dest, "{indent}}}")?;
        }
        Ok(())
    }
}

impl ToCss for RuleBody {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        match self.media_text() {
            Some(media) => {
                writeln!(dest, "@media {media} {{")?;
                self.write_rules(dest, "    ")?;
                writeln!(dest, "}}")
            }
            None => self.write_rules(dest, ""),
        }
    }
}

impl fmt::Display for RuleBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/// Collapse whitespace runs; selector texts are compared in this form.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
