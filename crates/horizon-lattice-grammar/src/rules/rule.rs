//! A declaration block.

use std::fmt;

use cssparser::ToCss;

use crate::grammar::{css_name, property_key, ParseRecord};
use crate::types::PropertyValue;

/// One declared property, in declaration order.
#[derive(Debug, Clone, PartialEq)]
struct Declaration {
    key: String,
    /// Value text as written, `!important` excluded. `None` for values
    /// set programmatically.
    text: Option<String>,
    important: bool,
}

/// The merged property map of one or more selectors.
///
/// Each rule has:
/// - An ordered property map, including values that shorthands wrote to
///   their longhands
/// - The declarations that produced it, which is what gets serialized
/// - A reference count of the selectors sharing it
/// - A version bumped on every change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    properties: ParseRecord,
    declarations: Vec<Declaration>,
    refs: u32,
    version: u32,
}

impl Rule {
    /// Create an empty rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// The property map.
    pub fn properties(&self) -> &ParseRecord {
        &self.properties
    }

    /// Value of a property by CSS or in-memory name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(&property_key(name))
    }

    /// Whether a property is set.
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains(&property_key(name))
    }

    /// Whether the property was declared `!important`.
    pub fn is_important(&self, name: &str) -> bool {
        let key = property_key(name);
        self.declarations
            .iter()
            .any(|declaration| declaration.key == key && declaration.important)
    }

    /// Names of properties declared `!important`.
    pub fn important(&self) -> impl Iterator<Item = &str> {
        self.declarations
            .iter()
            .filter(|declaration| declaration.important)
            .map(|declaration| declaration.key.as_str())
    }

    /// Number of selectors sharing this rule.
    pub fn refs(&self) -> u32 {
        self.refs
    }

    pub(crate) fn add_ref(&mut self) {
        self.refs += 1;
    }

    pub(crate) fn set_refs(&mut self, refs: u32) {
        self.refs = refs;
    }

    pub(crate) fn release(&mut self) {
        self.refs = self.refs.saturating_sub(1);
    }

    /// Incremented every time the property map changes.
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Set a property directly, bypassing its grammar.
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>, important: bool) {
        let key = property_key(name);
        self.properties.insert(key.clone(), value.into());
        self.push_declaration(Declaration {
            key,
            text: None,
            important,
        });
        self.version += 1;
    }

    /// Remove a property and its declaration.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        let key = property_key(name);
        self.declarations.retain(|declaration| declaration.key != key);
        let removed = self.properties.remove(&key);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Apply a parsed declaration: `record` holds the property and any
    /// longhands its grammar filled in.
    pub(crate) fn declare(&mut self, key: String, record: &ParseRecord, text: &str, important: bool) {
        self.properties.overwrite_from(record);
        self.push_declaration(Declaration {
            key,
            text: Some(text.to_string()),
            important,
        });
        self.version += 1;
    }

    /// Overwrite this rule's properties with those of `other`.
    pub fn merge(&mut self, other: &Rule) {
        if other.properties.is_empty() && other.declarations.is_empty() {
            return;
        }
        self.properties.overwrite_from(&other.properties);
        for declaration in &other.declarations {
            self.push_declaration(declaration.clone());
        }
        self.version += 1;
    }

    /// A redeclared property moves to the end so that serialization keeps
    /// the order in which values took effect.
    fn push_declaration(&mut self, declaration: Declaration) {
        self.declarations.retain(|d| d.key != declaration.key);
        self.declarations.push(declaration);
    }

    /// Write the declarations, one per line, each prefixed with `indent`.
    pub fn write_declarations<W: fmt::Write>(&self, dest: &mut W, indent: &str) -> fmt::Result {
        for declaration in &self.declarations {
            let Some(value) = self.properties.get(&declaration.key) else {
                continue;
            };
            write!(dest, "{indent}{}: ", css_name(&declaration.key))?;
            match &declaration.text {
                Some(text) => dest.write_str(text)?,
                None => value.to_css(dest)?,
            }
            if declaration.important {
                dest.write_str(" !important")?;
            }
            dest.write_str(";\n")?;
        }
        Ok(())
    }
}

impl ToCss for Rule {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        self.write_declarations(dest, "")
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Length, Value};

    fn declared(key: &str, value: Value, text: &str) -> Rule {
        let mut record = ParseRecord::new();
        record.insert(key, value.into());
        let mut rule = Rule::new();
        rule.declare(key.to_string(), &record, text, false);
        rule
    }

    #[test]
    fn declarations_serialize_as_written() {
        let rule = declared("background_color", Value::Color(Color::rgb(255, 0, 0)), "red");
        assert_eq!(rule.to_string(), "background-color: red;\n");
        assert!(rule.contains("background-color"));
        assert_eq!(rule.version(), 1);
    }

    #[test]
    fn set_values_serialize_typed() {
        let mut rule = Rule::new();
        rule.set("width", Value::Length(Length::px(10.0)), true);
        assert_eq!(rule.to_string(), "width: 10px !important;\n");
        assert!(rule.is_important("width"));
        assert_eq!(rule.important().collect::<Vec<_>>(), vec!["width"]);
    }

    #[test]
    fn merge_overwrites_and_reorders() {
        let mut rule = declared("color", Value::Color(Color::rgb(255, 0, 0)), "red");
        rule.set("width", Value::Length(Length::px(1.0)), false);
        let other = declared("color", Value::Color(Color::rgb(0, 0, 255)), "blue");
        rule.merge(&other);
        assert_eq!(
            rule.get("color").and_then(PropertyValue::as_single),
            Some(&Value::Color(Color::rgb(0, 0, 255)))
        );
        assert_eq!(rule.to_string(), "width: 1px;\ncolor: blue;\n");
        assert_eq!(rule.version(), 3);
    }

    #[test]
    fn remove_drops_declaration() {
        let mut rule = declared("color", Value::Color(Color::rgb(255, 0, 0)), "red");
        assert!(rule.remove("color").is_some());
        assert!(rule.is_empty());
        assert_eq!(rule.to_string(), "");
        assert!(rule.remove("color").is_none());
    }

    #[test]
    fn reference_counting() {
        let mut rule = Rule::new();
        rule.add_ref();
        rule.add_ref();
        rule.release();
        assert_eq!(rule.refs(), 1);
        rule.release();
        rule.release();
        assert_eq!(rule.refs(), 0);
    }
}
