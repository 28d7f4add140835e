//! The property map grammars write into.

use std::fmt;

use cssparser::ToCss;

use crate::types::{PropertyValue, Value};

/// An insertion-ordered map from property name to parsed value.
///
/// Names use the in-memory convention (`background_color`); see
/// [`css_name`] for the hyphenated form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseRecord {
    entries: Vec<(String, PropertyValue)>,
}

impl ParseRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The single value of a property, if it holds exactly one.
    pub fn get_single(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(PropertyValue::as_single)
    }

    /// Whether the property is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a property, replacing any previous value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Add a match to a property: the first write is a scalar, later
    /// writes promote it to a list and append.
    pub fn merge_value(&mut self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => slot.extend(value),
            None => self.entries.push((name, value)),
        }
    }

    /// Remove a property.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Copy every property of `other` over this record.
    pub fn overwrite_from(&mut self, other: &ParseRecord) {
        for (name, value) in &other.entries {
            self.insert(name.clone(), value.clone());
        }
    }

    /// Properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Property names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParseRecord {
    type Item = (&'a str, &'a PropertyValue);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Display for ParseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{}: {};", css_name(name), value.to_css_string())?;
        }
        Ok(())
    }
}

/// Normalize a CSS property name to the in-memory form (`-` becomes `_`).
pub fn property_key(name: &str) -> String {
    name.trim().replace('-', "_")
}

/// The hyphenated CSS form of an in-memory property name.
pub fn css_name(key: &str) -> String {
    key.replace('_', "-")
}
