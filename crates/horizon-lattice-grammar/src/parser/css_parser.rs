//! Stylesheet text parser.
//!
//! Walks the token stream of a [`Lexer`] and builds a [`StyleSheet`]:
//! qualified rules become selector/rule pairs, `@media` opens a scoped
//! body, and `@import` URLs are recorded for later resolution. Property
//! values are matched against the grammars of a [`DefinitionTable`].
//!
//! # Error Recovery
//!
//! Problems inside a rule do not abort the parse. The parser:
//! 1. Logs the problem via `tracing`
//! 2. Records a [`Diagnostic`]
//! 3. Skips the offending declaration, rule or at-rule and continues
//!
//! Only a broken token stream (an unterminated string or comment) is
//! returned as an error.

use tracing::{debug, trace, warn};

use super::error::{Diagnostic, DiagnosticKind};
use super::media::parse_media_list_at;
use super::selector::parse_selector_list;
use crate::grammar::{property_key, DefinitionTable, ParseRecord};
use crate::lexer::{Lexer, LexerFlags, TokenKind};
use crate::rules::{Rule, RuleBody, StyleSheet};
use crate::types::CssUrl;
use crate::{Error, Result};

/// Settings for parsing a stylesheet.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions<'t> {
    /// Grammars for property declarations.
    pub properties: &'t DefinitionTable,
    /// Grammars for `@media` features.
    pub media: &'t DefinitionTable,
    /// How deep `@import` chains are followed when loading.
    pub max_import_depth: usize,
}

impl Default for ParserOptions<'_> {
    fn default() -> Self {
        Self {
            properties: DefinitionTable::standard(),
            media: DefinitionTable::media(),
            max_import_depth: 16,
        }
    }
}

fn stylesheet_flags() -> LexerFlags {
    LexerFlags {
        skip_comments: true,
        ..LexerFlags::default()
    }
}

/// Parse a stylesheet.
///
/// See [`StyleSheet::parse`] for the common entry point.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::parser::{parse_stylesheet, ParserOptions};
///
/// let sheet = parse_stylesheet(
///     "a { color: red; } @media print { a { color: black } }",
///     &ParserOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(sheet.bodies().len(), 2);
/// assert!(sheet.diagnostics.is_empty());
/// ```
pub fn parse_stylesheet(css: &str, options: &ParserOptions<'_>) -> Result<StyleSheet> {
    let mut parser = SheetParser {
        lexer: Lexer::with_flags(css, stylesheet_flags()),
        options,
        diagnostics: Vec::new(),
        imports: Vec::new(),
    };

    let mut sheet = StyleSheet::new();
    let mut media_bodies = Vec::new();
    loop {
        parser.lexer.ensure_valid()?;
        if parser.lexer.is_end() {
            break;
        }
        match parser.lexer.text() {
            "}" => {
                parser.report(DiagnosticKind::Syntax, "Unexpected `}`");
                parser.lexer.next();
            }
            ";" => {
                parser.lexer.next();
            }
            "@" => {
                if let Some(body) = parser.at_rule()? {
                    media_bodies.push(body);
                }
            }
            _ => parser.qualified_rule(sheet.root_mut())?,
        }
    }

    for body in media_bodies {
        sheet.add_body(body);
    }
    sheet.diagnostics = parser.diagnostics;
    sheet.pending_imports = parser.imports;
    Ok(sheet)
}

/// Parse the inside of a declaration block into a [`Rule`].
///
/// Declarations with unknown properties or values their grammar rejects
/// are skipped and reported in `diagnostics`.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::grammar::DefinitionTable;
/// use horizon_lattice_grammar::parser::parse_declarations;
///
/// let mut diagnostics = Vec::new();
/// let rule = parse_declarations(
///     "margin: 0 auto !important; colour: red",
///     DefinitionTable::standard(),
///     &mut diagnostics,
/// )
/// .unwrap();
/// assert!(rule.is_important("margin"));
/// assert_eq!(diagnostics.len(), 1);
/// ```
pub fn parse_declarations(
    text: &str,
    table: &DefinitionTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Rule> {
    let options = ParserOptions {
        properties: table,
        ..ParserOptions::default()
    };
    let mut parser = SheetParser {
        lexer: Lexer::with_flags(text, stylesheet_flags()),
        options: &options,
        diagnostics: Vec::new(),
        imports: Vec::new(),
    };

    let mut rule = Rule::new();
    loop {
        parser.declarations(&mut rule)?;
        if parser.lexer.is_end() {
            break;
        }
        // a stray `}` outside any block
        parser.report(DiagnosticKind::Syntax, "Unexpected `}`");
        parser.lexer.next();
    }
    diagnostics.append(&mut parser.diagnostics);
    Ok(rule)
}

/// Split a trailing `!important` off a declaration value.
fn split_important(value: &str) -> (&str, bool) {
    let value = value.trim();
    let lower = value.to_ascii_lowercase();
    if let Some(head) = lower.strip_suffix("important") {
        let head = head.trim_end();
        if let Some(rest) = head.strip_suffix('!') {
            return (value[..rest.len()].trim_end(), true);
        }
    }
    (value, false)
}

/// A lexer over the value tokens between `start` and `end`, without a
/// trailing `!important`.
fn value_span<'a>(start: &Lexer<'a>, end: &Lexer<'a>, important: bool) -> Lexer<'a> {
    let mut stop = end.copy();
    if important {
        let mut cursor = start.copy();
        while cursor.offset() < end.offset() {
            let next = cursor.peek();
            if cursor.text() == "!"
                && next.text().eq_ignore_ascii_case("important")
                && next.peek().offset() >= end.offset()
            {
                stop = cursor;
                break;
            }
            cursor.next();
        }
    }
    let mut span = start.copy();
    span.fence(&stop);
    span.trim()
}

struct SheetParser<'a, 'o> {
    lexer: Lexer<'a>,
    options: &'o ParserOptions<'o>,
    diagnostics: Vec<Diagnostic>,
    imports: Vec<String>,
}

impl<'a> SheetParser<'a, '_> {
    fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let at = self.lexer.copy();
        self.report_at(&at, kind, message);
    }

    fn report_at(&mut self, at: &Lexer<'a>, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        debug!(line = at.line() + 1, column = at.column() + 1, %message, "stylesheet diagnostic");
        self.diagnostics
            .push(Diagnostic::new(kind, message, at.line() + 1, at.column() + 1));
    }

    fn report_error(&mut self, at: &Lexer<'a>, error: &Error) {
        self.diagnostics
            .push(Diagnostic::from_error(error, at.line() + 1, at.column() + 1));
    }

    /// Advance until one of `stops` at bracket depth zero, an unmatched
    /// closing bracket, or the end of input. The stop is not consumed.
    fn skip_until(&mut self, stops: &[&str]) -> Result<()> {
        let mut depth = 0usize;
        loop {
            self.lexer.ensure_valid()?;
            if self.lexer.is_end() {
                return Ok(());
            }
            if depth == 0 && stops.iter().any(|stop| *stop == self.lexer.text()) {
                return Ok(());
            }
            match self.lexer.kind() {
                TokenKind::OpenBracket => depth += 1,
                TokenKind::CloseBracket if depth == 0 => return Ok(()),
                TokenKind::CloseBracket => depth -= 1,
                _ => {}
            }
            self.lexer.next();
        }
    }

    /// Skip a `{ ... }` block starting at the current `{`.
    fn skip_block(&mut self) -> Result<()> {
        self.lexer.next();
        self.skip_until(&[])?;
        self.close_block();
        Ok(())
    }

    /// Consume the `}` ending a block.
    fn close_block(&mut self) {
        if self.lexer.text() == "}" {
            self.lexer.next();
        } else {
            self.report(DiagnosticKind::Syntax, "Unclosed block");
        }
    }

    /// `selector-list { declarations }`
    fn qualified_rule(&mut self, body: &mut RuleBody) -> Result<()> {
        let start = self.lexer.copy();
        self.skip_until(&["{", ";"])?;
        if self.lexer.text() != "{" {
            self.report_at(&start, DiagnosticKind::Syntax, "Expected `{` after selector");
            if self.lexer.text() == ";" || self.lexer.offset() == start.offset() {
                self.lexer.next();
            }
            return Ok(());
        }
        let selector_text = self.lexer.slice(&start).trim();

        match parse_selector_list(selector_text) {
            Ok(selectors) => {
                self.lexer.next();
                let mut rule = Rule::new();
                self.declarations(&mut rule)?;
                self.close_block();
                trace!(selector = selector_text, "parsed rule");
                body.insert(selectors, rule);
            }
            Err(error) => {
                warn!(%error, "skipping rule");
                self.report_error(&start, &error);
                self.skip_block()?;
            }
        }
        Ok(())
    }

    /// Declarations up to a `}` (not consumed) or the end of input.
    fn declarations(&mut self, rule: &mut Rule) -> Result<()> {
        loop {
            self.lexer.ensure_valid()?;
            if self.lexer.is_end() || self.lexer.text() == "}" {
                return Ok(());
            }
            if self.lexer.text() == ";" {
                self.lexer.next();
                continue;
            }
            self.declaration(rule)?;
        }
    }

    /// `name: value [!important]`
    fn declaration(&mut self, rule: &mut Rule) -> Result<()> {
        let start = self.lexer.copy();
        self.skip_until(&[":", ";", "}"])?;
        let name = self.lexer.slice(&start).trim();
        if self.lexer.text() != ":" || name.is_empty() {
            self.report_at(
                &start,
                DiagnosticKind::Syntax,
                format!("Expected `name: value`, found `{name}`"),
            );
            self.skip_until(&[";", "}"])?;
            if self.lexer.offset() == start.offset() {
                // an unmatched closing bracket
                self.lexer.next();
            }
            return Ok(());
        }
        self.lexer.next();

        let value_start = self.lexer.copy();
        self.skip_until(&[";", "}"])?;
        let (value, important) = split_important(self.lexer.slice(&value_start));

        let key = property_key(&name.to_ascii_lowercase());
        let term = match self.options.properties.property(&key) {
            Ok(Some(term)) => term,
            Ok(None) => {
                debug!(property = name, "unknown property");
                self.report_error(&start, &Error::unknown_property(name));
                return Ok(());
            }
            Err(error) => {
                warn!(property = name, %error, "property grammar failed to compile");
                self.report_error(&start, &error);
                return Ok(());
            }
        };

        let mut record = ParseRecord::new();
        let mut value_lexer = value_span(&value_start, &self.lexer, important);
        if term.parse(&mut value_lexer, &mut record) {
            rule.declare(key, &record, value, important);
        } else {
            let error = Error::property_parse(name, value);
            warn!(%error, "skipping declaration");
            self.report_error(&value_start, &error);
        }
        Ok(())
    }

    /// An at-rule. Returns the body of an `@media` rule.
    fn at_rule(&mut self) -> Result<Option<RuleBody>> {
        let start = self.lexer.copy();
        let at = self.lexer.copy();
        self.lexer.next();
        let name = if self.lexer.kind() == TokenKind::Identifier && self.lexer.is_adjacent_to(&at) {
            let name = self.lexer.text().to_ascii_lowercase();
            self.lexer.next();
            name
        } else {
            String::new()
        };

        match name.as_str() {
            "import" => {
                self.import(&start)?;
                Ok(None)
            }
            "media" => self.media(&start),
            _ => {
                debug!(at_rule = %name, "skipping unsupported at-rule");
                self.skip_at_rule()?;
                Ok(None)
            }
        }
    }

    fn skip_at_rule(&mut self) -> Result<()> {
        self.skip_until(&[";", "{"])?;
        match self.lexer.text() {
            "{" => self.skip_block()?,
            ";" => {
                self.lexer.next();
            }
            _ => {}
        }
        Ok(())
    }

    /// `@import url(...) [media];`
    fn import(&mut self, start: &Lexer<'a>) -> Result<()> {
        self.lexer.ensure_valid()?;
        let mut probe = self.lexer.copy();
        match CssUrl::parse(&mut probe) {
            Some(url) => {
                self.lexer.sync(&probe);
                if !self.imports.contains(&url.0) {
                    self.imports.push(url.0);
                }
            }
            None => self.report_at(start, DiagnosticKind::Syntax, "Expected a URL after `@import`"),
        }
        let rest = self.lexer.copy();
        self.skip_until(&[";"])?;
        let media = self.lexer.slice(&rest).trim();
        if !media.is_empty() {
            debug!(media, "ignoring @import media list");
        }
        if self.lexer.text() == ";" {
            self.lexer.next();
        }
        Ok(())
    }

    /// `@media query-list { rules }`
    fn media(&mut self, start: &Lexer<'a>) -> Result<Option<RuleBody>> {
        let prelude = self.lexer.copy();
        self.skip_until(&["{", ";"])?;
        if self.lexer.text() != "{" {
            self.report_at(start, DiagnosticKind::Syntax, "Expected `{` after `@media`");
            if self.lexer.text() == ";" {
                self.lexer.next();
            }
            return Ok(None);
        }
        let queries = parse_media_list_at(
            self.lexer.slice(&prelude),
            self.options.media,
            (start.line() + 1, start.column() + 1),
            &mut self.diagnostics,
        );
        self.lexer.next();

        let mut body = RuleBody::with_media(queries);
        loop {
            self.lexer.ensure_valid()?;
            if self.lexer.is_end() || self.lexer.text() == "}" {
                break;
            }
            match self.lexer.text() {
                ";" => {
                    self.lexer.next();
                }
                "@" => {
                    self.report(DiagnosticKind::Syntax, "Nested at-rules are not supported");
                    self.lexer.next();
                    self.skip_at_rule()?;
                }
                _ => self.qualified_rule(&mut body)?,
            }
        }
        self.close_block();
        Ok(Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Value};

    fn parse(css: &str) -> StyleSheet {
        parse_stylesheet(css, &ParserOptions::default()).unwrap()
    }

    #[test]
    fn parse_simple_rule() {
        let sheet = parse("a.cls { color: red; }");
        assert_eq!(sheet.root().selectors().count(), 1);
        let entry = sheet.root().selectors().next().unwrap();
        assert_eq!(entry.text, "a.cls");
        assert_eq!(
            sheet.get_rule("a.cls").unwrap().get("color").unwrap().as_single(),
            Some(&Value::Color(Color::rgb(255, 0, 0)))
        );
        assert!(sheet.diagnostics.is_empty());
    }

    #[test]
    fn parse_multiple_rules() {
        let sheet = parse(
            r#"
            Button { color: red; }
            Label { color: blue; }
        "#,
        );
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn comments_are_skipped() {
        let sheet = parse("/* head */ p /* x */ { /* y */ color: red; /* z */ }");
        assert!(sheet.get_rule("p").unwrap().contains("color"));
        assert!(sheet.diagnostics.is_empty());
    }

    #[test]
    fn important_flag() {
        let sheet = parse("p { width: 10px ! IMPORTANT; height: 2px }");
        let rule = sheet.get_rule("p").unwrap();
        assert!(rule.is_important("width"));
        assert!(!rule.is_important("height"));
        assert_eq!(split_important("red"), ("red", false));
        assert_eq!(split_important("red!important"), ("red", true));
    }

    #[test]
    fn value_span_stops_at_the_declaration_end() {
        let sheet = parse("p { width: 1px ! important ; margin: 0 2px /* note */ ; color: red }");
        let rule = sheet.get_rule("p").unwrap();
        assert!(sheet.diagnostics.is_empty());
        assert!(rule.is_important("width"));
        assert_eq!(rule.get("margin").unwrap().len(), 2);
        assert!(rule.contains("color"));

        let mut lexer = Lexer::with_flags("a: 1px 2px !important; b", stylesheet_flags());
        lexer.next().next();
        let start = lexer.copy();
        while lexer.text() != ";" {
            lexer.next();
        }
        let span = value_span(&start, &lexer, true);
        assert_eq!(span.remaining(), "1px 2px");
        assert_eq!(value_span(&start, &lexer, false).remaining(), "1px 2px !important");
    }

    #[test]
    fn recovers_from_bad_declarations() {
        let sheet = parse("p { color red; width: 1px; colr: red; height: ; }");
        let rule = sheet.get_rule("p").unwrap();
        assert!(rule.contains("width"));
        let kinds: Vec<_> = sheet.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::Syntax,
                DiagnosticKind::UnknownProperty,
                DiagnosticKind::PropertyParse,
            ]
        );
        assert_eq!(sheet.diagnostics[1].line, 1);
        assert_eq!(sheet.diagnostics[1].column, 28);
    }

    #[test]
    fn invalid_selector_skips_rule() {
        let sheet = parse("a > { color: red } b { color: blue }");
        assert!(sheet.get_rule("b").is_some());
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.diagnostics[0].kind, DiagnosticKind::InvalidSelector);
    }

    #[test]
    fn unsupported_at_rules_are_skipped() {
        let sheet = parse("@charset \"utf-8\"; @font-face { src: x } p { color: red }");
        assert_eq!(sheet.len(), 1);
        assert!(sheet.diagnostics.is_empty());
    }

    #[test]
    fn imports_are_recorded() {
        let sheet = parse("@import url(base.css); @import 'theme.css' screen; @import url(base.css);");
        assert_eq!(sheet.pending_imports, vec!["base.css".to_string(), "theme.css".to_string()]);
    }

    #[test]
    fn unterminated_tokens_are_fatal() {
        let result = parse_stylesheet("p { content: \"open; }", &ParserOptions::default());
        assert!(matches!(result, Err(Error::Lex { .. })));
        let result = parse_stylesheet("p { color: red } /* open", &ParserOptions::default());
        assert!(matches!(result, Err(Error::Lex { .. })));
    }

    #[test]
    fn stray_braces_are_reported() {
        let sheet = parse("} p { color: red }");
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.diagnostics.len(), 1);
        assert_eq!(sheet.diagnostics[0].kind, DiagnosticKind::Syntax);
    }
}
