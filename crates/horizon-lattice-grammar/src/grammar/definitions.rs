//! Definition tables: notations by name plus the compiled-grammar cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::trace;

use super::compiler::Compiler;
use super::defaults;
use super::record::property_key;
use super::term::Term;
use crate::error::Result;
use crate::types::{LeafParser, LeafRegistry};

static STANDARD: OnceLock<DefinitionTable> = OnceLock::new();
static MEDIA: OnceLock<DefinitionTable> = OnceLock::new();

/// Property grammars, helper productions and leaf parsers.
///
/// Notations are compiled on first use and cached for the life of the
/// table. Compilation is pure, so two threads racing on the same name
/// produce equal trees and the first one stored is kept.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::grammar::{DefinitionTable, ParseRecord};
/// use horizon_lattice_grammar::lexer::Lexer;
///
/// let table = DefinitionTable::new()
///     .with_property("gap", "<length> <length>?")
///     .with_virtual("unused", "x");
/// let gap = table.property("gap").unwrap().unwrap();
///
/// let mut record = ParseRecord::new();
/// assert!(gap.parse(&mut Lexer::new("4px 8px"), &mut record));
/// assert_eq!(record.get("gap").unwrap().len(), 2);
///
/// // helper productions are not properties
/// assert!(table.property("unused").unwrap().is_none());
/// ```
pub struct DefinitionTable {
    primary: HashMap<String, String>,
    virtuals: HashMap<String, String>,
    leaves: LeafRegistry,
    compiled: RwLock<HashMap<String, Arc<Term>>>,
    compiled_virtual: RwLock<HashMap<String, Arc<Term>>>,
    adhoc: RwLock<HashMap<(String, String), Arc<Term>>>,
}

impl Default for DefinitionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefinitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionTable")
            .field("properties", &self.primary.len())
            .field("virtuals", &self.virtuals.len())
            .field("compiled", &self.compiled.read().len())
            .finish()
    }
}

impl Clone for DefinitionTable {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            virtuals: self.virtuals.clone(),
            leaves: self.leaves.clone(),
            compiled: RwLock::new(self.compiled.read().clone()),
            compiled_virtual: RwLock::new(self.compiled_virtual.read().clone()),
            adhoc: RwLock::new(self.adhoc.read().clone()),
        }
    }
}

impl DefinitionTable {
    /// An empty table with the builtin leaf parsers.
    pub fn new() -> Self {
        Self {
            primary: HashMap::new(),
            virtuals: HashMap::new(),
            leaves: LeafRegistry::builtin(),
            compiled: RwLock::new(HashMap::new()),
            compiled_virtual: RwLock::new(HashMap::new()),
            adhoc: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide table of CSS properties.
    pub fn standard() -> &'static DefinitionTable {
        STANDARD.get_or_init(|| {
            let mut table = Self::new();
            table.extend(defaults::PROPERTIES, defaults::VIRTUALS);
            table
        })
    }

    /// The process-wide table of media features. It shares the standard
    /// helper productions.
    pub fn media() -> &'static DefinitionTable {
        MEDIA.get_or_init(|| {
            let mut table = Self::new();
            table.extend(defaults::MEDIA_FEATURES, defaults::VIRTUALS);
            table
        })
    }

    fn extend(&mut self, primary: &[(&str, &str)], virtuals: &[(&str, &str)]) {
        for (name, notation) in primary {
            self.primary.insert(property_key(name), notation.to_string());
        }
        for (name, notation) in virtuals {
            self.virtuals.insert(property_key(name), notation.to_string());
        }
    }

    fn invalidate(&mut self) {
        self.compiled.get_mut().clear();
        self.compiled_virtual.get_mut().clear();
        self.adhoc.get_mut().clear();
    }

    /// Add or replace a property grammar.
    pub fn with_property(mut self, name: &str, notation: &str) -> Self {
        self.primary.insert(property_key(name), notation.to_string());
        self.invalidate();
        self
    }

    /// Add or replace a helper production.
    pub fn with_virtual(mut self, name: &str, notation: &str) -> Self {
        self.virtuals.insert(property_key(name), notation.to_string());
        self.invalidate();
        self
    }

    /// Register a custom leaf parser.
    pub fn with_leaf(mut self, parser: impl LeafParser + 'static) -> Self {
        self.leaves.register(Arc::new(parser));
        self.invalidate();
        self
    }

    /// The leaf parsers this table resolves `<name>` against first.
    pub fn leaves(&self) -> &LeafRegistry {
        &self.leaves
    }

    /// The compiled grammar of a property.
    ///
    /// Returns `Ok(None)` for names that are not properties, including
    /// helper productions.
    pub fn property(&self, name: &str) -> Result<Option<Arc<Term>>> {
        let key = property_key(name);
        if !self.primary.contains_key(&key) {
            return Ok(None);
        }
        Compiler::new(self).named(&key, false).map(Some)
    }

    /// Whether `name` is a property of this table.
    pub fn is_property(&self, name: &str) -> bool {
        self.primary.contains_key(&property_key(name))
    }

    /// Whether `name` is a helper production of this table.
    pub fn is_virtual(&self, name: &str) -> bool {
        self.virtuals.contains_key(&property_key(name))
    }

    /// Property names, in no particular order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.primary.keys().map(String::as_str)
    }

    /// Helper production names, in no particular order.
    pub fn virtual_names(&self) -> impl Iterator<Item = &str> {
        self.virtuals.keys().map(String::as_str)
    }

    /// Compile an arbitrary notation under `name`.
    ///
    /// The result is memoized by name and notation, apart from the
    /// property cache: compiling under a property's name never changes
    /// what [`property`](Self::property) returns.
    pub fn compile(&self, notation: &str, name: &str) -> Result<Arc<Term>> {
        let key = (name.to_string(), notation.to_string());
        if let Some(term) = self.adhoc.read().get(&key) {
            return Ok(Arc::clone(term));
        }
        let mut compiler = Compiler::new(self);
        let term = Arc::new(compiler.compile_root(notation, name, false)?);
        let mut adhoc = self.adhoc.write();
        let stored = adhoc.entry(key).or_insert_with(|| {
            trace!(name, notation, "cached ad-hoc grammar");
            term
        });
        Ok(Arc::clone(stored))
    }

    pub(crate) fn notation_of(&self, name: &str, is_virtual: bool) -> Option<&str> {
        let map = if is_virtual { &self.virtuals } else { &self.primary };
        map.get(name).map(String::as_str)
    }

    pub(crate) fn cached(&self, name: &str, is_virtual: bool) -> Option<Arc<Term>> {
        let cache = if is_virtual {
            &self.compiled_virtual
        } else {
            &self.compiled
        };
        cache.read().get(name).cloned()
    }

    /// Insert a compiled tree unless one is already cached, returning the
    /// cached tree.
    pub(crate) fn store(&self, name: &str, is_virtual: bool, term: Arc<Term>) -> Arc<Term> {
        let cache = if is_virtual {
            &self.compiled_virtual
        } else {
            &self.compiled
        };
        let mut cache = cache.write();
        let stored = cache.entry(name.to_string()).or_insert_with(|| {
            trace!(name, is_virtual, "cached grammar");
            term
        });
        Arc::clone(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{ParseRecord, TermKind};
    use crate::lexer::Lexer;

    #[test]
    fn property_lookup_normalizes_names() {
        let table = DefinitionTable::new().with_property("border-width", "<length>");
        assert!(table.property("border-width").unwrap().is_some());
        assert!(table.property("border_width").unwrap().is_some());
        assert!(table.is_property("border-width"));
        assert!(table.property("margin").unwrap().is_none());
    }

    #[test]
    fn compiled_trees_are_cached() {
        let table = DefinitionTable::new().with_property("a", "x | y");
        let first = table.property("a").unwrap().unwrap();
        let second = table.property("a").unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn compile_memoizes_by_name_and_notation() {
        let table = DefinitionTable::new();
        let first = table.compile("a b", "t").unwrap();
        let again = table.compile("a b", "t").unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let other = table.compile("c", "t").unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(other.to_string(), "c");
    }

    #[test]
    fn compile_leaves_properties_alone() {
        let table = DefinitionTable::new().with_property("color", "<color>");
        let before = table.property("color").unwrap().unwrap();
        let adhoc = table.compile("auto", "color").unwrap();
        assert_eq!(adhoc.to_string(), "auto");

        let after = table.property("color").unwrap().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        let mut record = ParseRecord::new();
        assert!(after.parse(&mut Lexer::new("red"), &mut record));
        assert!(record.contains("color"));
    }

    #[test]
    fn compile_before_property_lookup() {
        let table = DefinitionTable::new().with_property("color", "<color>");
        table.compile("auto", "color").unwrap();
        let color = table.property("color").unwrap().unwrap();
        assert_eq!(color.parse_value("red").map(|v| v.to_string()), Some("#ff0000".to_string()));
        assert_eq!(color.parse_value("auto"), None);
    }

    #[test]
    fn root_carries_name_and_virtual_flag() {
        let table = DefinitionTable::new()
            .with_property("p", "<h>")
            .with_virtual("h", "a | b");
        let p = table.property("p").unwrap().unwrap();
        assert_eq!(p.name.as_deref(), Some("p"));
        assert!(!p.is_virtual);
        match &p.kind {
            TermKind::ValueRef(crate::grammar::ValueRef::Grammar { term, .. }) => {
                assert!(term.is_virtual);
                assert_eq!(term.name.as_deref(), Some("h"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn builder_replaces_definitions() {
        let table = DefinitionTable::new()
            .with_property("a", "x")
            .with_property("a", "y");
        let a = table.property("a").unwrap().unwrap();
        assert_eq!(a.to_string(), "y");
    }

    #[test]
    fn shared_tables_are_singletons() {
        assert!(std::ptr::eq(DefinitionTable::standard(), DefinitionTable::standard()));
        assert!(DefinitionTable::standard().is_property("color"));
        assert!(DefinitionTable::media().is_property("min-width"));
        assert!(!DefinitionTable::media().is_property("color_stop"));
    }
}
