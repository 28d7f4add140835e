//! Custom multi-character symbols.

use std::collections::HashMap;

/// Trie of symbols registered with [`Lexer::add_symbol`](super::Lexer::add_symbol).
#[derive(Debug, Clone, Default)]
pub struct SymbolTrie {
    children: HashMap<char, SymbolTrie>,
    terminal: bool,
}

impl SymbolTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol.
    pub fn insert(&mut self, symbol: &str) {
        if symbol.is_empty() {
            return;
        }
        let mut node = self;
        for c in symbol.chars() {
            node = node.children.entry(c).or_default();
        }
        node.terminal = true;
    }

    /// Byte length of the longest registered symbol that prefixes `input`.
    pub fn longest_match(&self, input: &str) -> Option<usize> {
        let mut node = self;
        let mut best = None;
        for (index, c) in input.char_indices() {
            match node.children.get(&c) {
                Some(next) => {
                    node = next;
                    if node.terminal {
                        best = Some(index + c.len_utf8());
                    }
                }
                None => break,
            }
        }
        best
    }

    /// Whether no symbols have been registered.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
