//! `@media` query list parsing.

use tracing::debug;

use super::error::Diagnostic;
use crate::grammar::{property_key, DefinitionTable, ParseRecord};
use crate::lexer::{Lexer, LexerFlags, TokenKind};
use crate::rules::{normalize, MediaQuery};
use crate::Error;

/// Parse a comma-separated media query list, such as the prelude of an
/// `@media` rule.
///
/// Feature values are parsed with the grammars of `table`. A query with an
/// unknown feature, a value its grammar rejects, or broken syntax is kept
/// but marked invalid, and a diagnostic is recorded.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::grammar::DefinitionTable;
/// use horizon_lattice_grammar::parser::parse_media_list;
/// use horizon_lattice_grammar::types::Viewport;
///
/// let mut diagnostics = Vec::new();
/// let list = parse_media_list(
///     "screen and (min-width: 600px), print",
///     DefinitionTable::media(),
///     &mut diagnostics,
/// );
/// assert!(diagnostics.is_empty());
/// assert_eq!(list.len(), 2);
/// assert!(list[0].matches(&Viewport::new(800.0, 600.0)));
/// assert!(!list[1].matches(&Viewport::new(800.0, 600.0)));
/// ```
pub fn parse_media_list(
    text: &str,
    table: &DefinitionTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<MediaQuery> {
    parse_media_list_at(text, table, (1, 1), diagnostics)
}

/// [`parse_media_list`], reporting every diagnostic at `location`.
pub(crate) fn parse_media_list_at(
    text: &str,
    table: &DefinitionTable,
    location: (u32, u32),
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<MediaQuery> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    split_top_level(text)
        .into_iter()
        .map(|query| {
            let mut problems = Vec::new();
            let parsed = parse_query(query, table, &mut problems);
            for error in problems {
                debug!(query, %error, "invalid media query");
                diagnostics.push(Diagnostic::from_error(&error, location.0, location.1));
            }
            parsed
        })
        .collect()
}

/// Split on commas outside parentheses.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn parse_query(text: &str, table: &DefinitionTable, problems: &mut Vec<Error>) -> MediaQuery {
    let mut query = MediaQuery {
        text: normalize(text),
        valid: true,
        ..MediaQuery::default()
    };
    let mut lexer = Lexer::with_flags(
        text,
        LexerFlags {
            skip_comments: true,
            ..LexerFlags::default()
        },
    );

    if query.text.is_empty() {
        query.valid = false;
        problems.push(lexer.error("Empty media query"));
        return query;
    }

    if lexer.kind() == TokenKind::Identifier {
        let word = lexer.text().to_ascii_lowercase();
        if word == "only" || word == "not" {
            query.only = word == "only";
            query.negated = word == "not";
            lexer.next();
        }
    }
    if lexer.kind() == TokenKind::Identifier {
        query.media_type = Some(lexer.text().to_ascii_lowercase());
        lexer.next();
    } else if query.only {
        query.valid = false;
        problems.push(lexer.error("Expected a media type"));
        return query;
    }

    let mut first = query.media_type.is_none();
    while !lexer.is_end() {
        if !first {
            if !lexer.text().eq_ignore_ascii_case("and") {
                query.valid = false;
                problems.push(lexer.error(format!("Expected `and`, found `{}`", lexer.text())));
                return query;
            }
            lexer.next();
        }
        first = false;
        if let Err(error) = parse_feature(&mut lexer, &mut query, table) {
            query.valid = false;
            problems.push(error);
            return query;
        }
    }
    query
}

/// Parse `( name )` or `( name : value )` into `query`.
fn parse_feature(
    lexer: &mut Lexer<'_>,
    query: &mut MediaQuery,
    table: &DefinitionTable,
) -> Result<(), Error> {
    lexer.assert("(")?;
    if lexer.kind() != TokenKind::Identifier {
        return Err(lexer.error("Expected a media feature name"));
    }
    let name = lexer.text();
    let key = property_key(name);
    lexer.next();

    if lexer.text() == ")" {
        lexer.next();
        if !table.is_property(&key) {
            return Err(Error::unknown_property(name));
        }
        query.flags.push(key);
        return Ok(());
    }

    lexer.assert(":")?;
    let start = lexer.copy();
    let mut depth = 0usize;
    while !lexer.is_end() {
        match lexer.kind() {
            TokenKind::OpenBracket => depth += 1,
            TokenKind::CloseBracket if depth == 0 => break,
            TokenKind::CloseBracket => depth -= 1,
            _ => {}
        }
        lexer.next();
    }
    let value = lexer.slice(&start).trim();
    let mut span = start.copy();
    span.fence(&*lexer);
    let mut span = span.trim();
    lexer.assert(")")?;

    let term = table
        .property(&key)?
        .ok_or_else(|| Error::unknown_property(name))?;
    let mut parsed = ParseRecord::new();
    if !term.parse(&mut span, &mut parsed) {
        return Err(Error::property_parse(name, value));
    }
    // repeated features all have to hold
    for (feature, matched) in &parsed {
        query.features.merge_value(feature, matched.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DiagnosticKind;
    use crate::types::{MediaEnvironment, Viewport};

    struct Printer;

    impl MediaEnvironment for Printer {
        fn viewport_width(&self) -> f32 {
            600.0
        }

        fn viewport_height(&self) -> f32 {
            800.0
        }

        fn media_type(&self) -> &str {
            "print"
        }
    }

    fn parse(text: &str) -> (Vec<MediaQuery>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let list = parse_media_list(text, DefinitionTable::media(), &mut diagnostics);
        (list, diagnostics)
    }

    #[test]
    fn media_types() {
        let (list, diagnostics) = parse("print");
        assert!(diagnostics.is_empty());
        assert!(list[0].matches(&Printer));
        assert!(!list[0].matches(&Viewport::new(600.0, 800.0)));

        let (list, _) = parse("not print");
        assert!(list[0].negated);
        assert!(list[0].matches(&Viewport::new(600.0, 800.0)));

        let (list, _) = parse("only screen");
        assert!(list[0].only);
        assert_eq!(list[0].media_type.as_deref(), Some("screen"));
    }

    #[test]
    fn feature_ranges() {
        let (list, diagnostics) = parse("(min-width: 400px) and (max-width: 800px)");
        assert!(diagnostics.is_empty());
        let query = &list[0];
        assert!(query.media_type.is_none());
        assert!(query.features.contains("min_width"));
        assert!(query.matches(&Viewport::new(500.0, 100.0)));
        assert!(!query.matches(&Viewport::new(300.0, 100.0)));
        assert!(!query.matches(&Viewport::new(900.0, 100.0)));
    }

    #[test]
    fn repeated_features_all_apply() {
        for text in [
            "(min-width: 900px) and (min-width: 100px)",
            "(min-width: 100px) and (min-width: 900px)",
        ] {
            let (list, diagnostics) = parse(text);
            assert!(diagnostics.is_empty());
            assert_eq!(list[0].features.get("min_width").unwrap().len(), 2);
            assert!(!list[0].matches(&Viewport::new(500.0, 100.0)), "{text}");
            assert!(list[0].matches(&Viewport::new(1000.0, 100.0)), "{text}");
        }

        let (list, _) = parse("(orientation: landscape) and (orientation: portrait)");
        assert!(!list[0].matches(&Viewport::new(800.0, 600.0)));
        assert!(!list[0].matches(&Viewport::new(600.0, 800.0)));
    }

    #[test]
    fn features_are_combined_with_and() {
        let (list, _) = parse("(min-width: 400px) and (max-height: 300px)");
        assert!(list[0].matches(&Viewport::new(500.0, 200.0)));
        assert!(!list[0].matches(&Viewport::new(500.0, 400.0)));
        assert!(!list[0].matches(&Viewport::new(300.0, 200.0)));
    }

    #[test]
    fn orientation_and_flags() {
        let (list, diagnostics) = parse("screen and (orientation: landscape) and (color)");
        assert!(diagnostics.is_empty());
        assert_eq!(list[0].flags, vec!["color".to_string()]);
        assert!(list[0].matches(&Viewport::new(800.0, 600.0)));
        assert!(!list[0].matches(&Viewport::new(600.0, 800.0)));
    }

    #[test]
    fn invalid_queries_are_reported() {
        let (list, diagnostics) = parse("(min-width: red), (frobnicate), screen (color)");
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|query| !query.valid));
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::PropertyParse,
                DiagnosticKind::UnknownProperty,
                DiagnosticKind::Syntax,
            ]
        );
    }

    #[test]
    fn text_is_normalized() {
        let (list, _) = parse("screen   and\n(min-width:10px)");
        assert_eq!(list[0].text, "screen and (min-width:10px)");
        assert!(parse("  ").0.is_empty());
    }
}
