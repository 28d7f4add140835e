//! Stylesheet collection and management.

use std::fmt;
use std::path::{Path, PathBuf};

use cssparser::ToCss;

use super::body::RuleBody;
use super::rule::Rule;
use crate::parser::{self, Diagnostic, ImportFetcher, ParserOptions};
use crate::types::MediaEnvironment;
use crate::{Error, Result};

/// A parsed stylesheet.
///
/// The first body holds top-level rules; each distinct `@media` query
/// list gets a body of its own, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    bodies: Vec<RuleBody>,
    /// Problems that were recovered from while parsing.
    pub diagnostics: Vec<Diagnostic>,
    /// `@import` URLs not yet fetched.
    pub pending_imports: Vec<String>,
    /// Source file path, when loaded from disk.
    pub source_path: Option<PathBuf>,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self {
            bodies: vec![RuleBody::new()],
            diagnostics: Vec::new(),
            pending_imports: Vec::new(),
            source_path: None,
        }
    }

    /// Parse CSS text with the standard definition tables.
    ///
    /// `@import` rules are recorded in [`pending_imports`](Self::pending_imports)
    /// but not fetched; use [`load`](Self::load) for that. Malformed
    /// declarations, selectors and at-rules are skipped and reported in
    /// [`diagnostics`](Self::diagnostics). Only broken tokens, such as an
    /// unterminated string, fail the parse.
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_lattice_grammar::rules::StyleSheet;
    ///
    /// let sheet = StyleSheet::parse("a.cls { color: red; } a.cls { width: 4px }").unwrap();
    /// let rule = sheet.get_rule("a.cls").unwrap();
    /// assert!(rule.contains("color") && rule.contains("width"));
    /// ```
    pub fn parse(css: &str) -> Result<Self> {
        Self::parse_with_options(css, &ParserOptions::default())
    }

    /// Parse CSS text with explicit options.
    pub fn parse_with_options(css: &str, options: &ParserOptions<'_>) -> Result<Self> {
        parser::parse_stylesheet(css, options)
    }

    /// Load a stylesheet from a CSS file.
    ///
    /// `@import` rules are left pending; see [`load`](Self::load).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let mut sheet = Self::parse(&content)?;
        sheet.source_path = Some(path.to_path_buf());
        Ok(sheet)
    }

    /// Parse CSS text and resolve its `@import` rules through `fetcher`.
    ///
    /// Imported sheets are layered beneath the importing one: the
    /// importing sheet's declarations win. A failed import is reported
    /// as a diagnostic and skipped.
    pub async fn load<F: ImportFetcher>(css: &str, fetcher: &F) -> Result<Self> {
        Self::load_with_options(css, fetcher, &ParserOptions::default()).await
    }

    /// [`load`](Self::load) with explicit options.
    pub async fn load_with_options<F: ImportFetcher>(
        css: &str,
        fetcher: &F,
        options: &ParserOptions<'_>,
    ) -> Result<Self> {
        let sheet = Self::parse_with_options(css, options)?;
        Ok(parser::resolve_imports(sheet, fetcher, options).await)
    }

    /// The top-level body.
    pub fn root(&self) -> &RuleBody {
        &self.bodies[0]
    }

    /// The top-level body, for editing.
    pub fn root_mut(&mut self) -> &mut RuleBody {
        &mut self.bodies[0]
    }

    /// All bodies: top-level first, then `@media` bodies.
    pub fn bodies(&self) -> &[RuleBody] {
        &self.bodies
    }

    /// Bodies whose media queries match `env`.
    pub fn applicable_bodies<'s>(
        &'s self,
        env: &'s dyn MediaEnvironment,
    ) -> impl Iterator<Item = &'s RuleBody> + 's {
        self.bodies.iter().filter(move |body| body.matches_media(env))
    }

    /// The top-level rule of a selector.
    pub fn get_rule(&self, selector: &str) -> Option<&Rule> {
        self.root().get_rule(selector)
    }

    /// Rules for a selector from every body that applies in `env`, in
    /// source order.
    pub fn rules_for<'s>(&'s self, selector: &str, env: &'s dyn MediaEnvironment) -> Vec<&'s Rule> {
        self.applicable_bodies(env)
            .filter_map(|body| body.get_rule(selector))
            .collect()
    }

    /// Merge `body` into the body with the same media queries, or append it.
    pub fn add_body(&mut self, body: RuleBody) {
        let media = body.media_text();
        match self.bodies.iter_mut().find(|existing| existing.media_text() == media) {
            Some(existing) => existing.merge(&body),
            None => self.bodies.push(body),
        }
    }

    /// Merge every rule of `other` into this sheet; `other` wins on
    /// conflicting properties.
    pub fn merge(&mut self, other: &StyleSheet) {
        for body in &other.bodies {
            self.add_body(body.clone());
        }
        self.diagnostics.extend(other.diagnostics.iter().cloned());
        for url in &other.pending_imports {
            if !self.pending_imports.contains(url) {
                self.pending_imports.push(url.clone());
            }
        }
    }

    /// Number of selectors across all bodies.
    pub fn len(&self) -> usize {
        self.bodies.iter().map(|body| body.selectors().count()).sum()
    }

    /// Check if the stylesheet has no selectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every rule, diagnostic and pending import.
    pub fn clear(&mut self) {
        let source_path = self.source_path.take();
        *self = Self::new();
        self.source_path = source_path;
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl ToCss for StyleSheet {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        for url in &self.pending_imports {
            dest.write_str("@import url(")?;
            cssparser::serialize_string(url, dest)?;
            dest.write_str(");\n")?;
        }
        for body in &self.bodies {
            body.to_css(dest)?;
        }
        Ok(())
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}
