//! Integration tests for stylesheet parsing.

use std::collections::HashMap;
use std::future::{ready, Future};

use horizon_lattice_grammar::parser::{
    parse_declarations, DiagnosticKind, FileImportFetcher, ImportFetcher,
};
use horizon_lattice_grammar::prelude::*;
use horizon_lattice_grammar::Error;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_single_rule() {
    let sheet = StyleSheet::parse("a.cls { color: red; }").unwrap();

    assert_eq!(sheet.bodies().len(), 1);
    let entries: Vec<_> = sheet.root().selectors().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "a.cls");
    assert_eq!(entries[0].selector.parts[0].classes, vec!["cls".to_string()]);

    let rule = sheet.get_rule("a.cls").unwrap();
    assert_eq!(rule.properties().len(), 1);
    assert_eq!(
        rule.get("color").and_then(PropertyValue::as_single),
        Some(&Value::Color(Color::rgb(255, 0, 0)))
    );
}

#[test]
fn test_same_selector_merges() {
    let sheet = StyleSheet::parse("a{color:red} a{background:blue}").unwrap();

    assert_eq!(sheet.len(), 1);
    let rule = sheet.get_rule("a").unwrap();
    assert!(rule.contains("color"));
    assert!(rule.contains("background"));
    assert_eq!(
        rule.get("background-color").and_then(PropertyValue::as_single),
        Some(&Value::Color(Color::rgb(0, 0, 255)))
    );
}

#[test]
fn test_empty_value_is_reported() {
    init_tracing();
    let sheet = StyleSheet::parse("a { color: ; }").unwrap();

    assert_eq!(sheet.diagnostics.len(), 1);
    assert_eq!(sheet.diagnostics[0].kind, DiagnosticKind::PropertyParse);
    assert!(sheet.get_rule("a").unwrap().is_empty());
}

#[test]
fn test_unknown_properties_do_not_abort() {
    let sheet = StyleSheet::parse("p { frobnicate: 1; color: red } q { color: blue }").unwrap();

    assert!(sheet.get_rule("p").unwrap().contains("color"));
    assert!(sheet.get_rule("q").is_some());
    assert_eq!(sheet.diagnostics.len(), 1);
    assert_eq!(sheet.diagnostics[0].kind, DiagnosticKind::UnknownProperty);
}

#[test]
fn test_serialization_round_trips() {
    let css = r#"
        /* layout */
        body, html { margin: 0; padding: 0 }
        .card > h1 + p { font: italic bold 12px/1.5 serif; border: 1px solid #333 }
        a:hover { color: rgb(10, 20, 30) !important; }
        @media screen and (max-width: 600px) {
            .card { width: 100%; display: inline flex }
        }
    "#;
    let first = StyleSheet::parse(css).unwrap();
    assert!(first.diagnostics.is_empty(), "{:?}", first.diagnostics);

    let text = first.to_string();
    let second = StyleSheet::parse(&text).unwrap();
    assert!(second.diagnostics.is_empty(), "{:?}", second.diagnostics);
    assert_eq!(second.to_string(), text);
    assert_eq!(second.bodies(), first.bodies());

    assert!(text.contains("color: rgb(10, 20, 30) !important;"));
    assert!(text.contains("@media screen and (max-width: 600px) {"));
}

#[test]
fn test_media_bodies() {
    let css = "p { color: red }
               @media print { p { color: black } }
               @media (min-width: 800px) { p { color: blue } }
               @media print { span { color: black } }";
    let sheet = StyleSheet::parse(css).unwrap();

    assert_eq!(sheet.bodies().len(), 3);
    assert_eq!(sheet.bodies()[1].media_text().as_deref(), Some("print"));
    assert_eq!(sheet.bodies()[1].selectors().count(), 2);

    let wide = Viewport::new(1024.0, 768.0);
    let narrow = Viewport::new(320.0, 480.0);
    assert_eq!(sheet.rules_for("p", &wide).len(), 2);
    assert_eq!(sheet.rules_for("p", &narrow).len(), 1);
    assert_eq!(sheet.applicable_bodies(&narrow).count(), 1);
}

#[test]
fn test_media_features_must_all_hold() {
    let css = "@media (min-width: 900px) and (min-width: 100px) { p { color: red } }
               @media screen and (min-width: 400px) and (max-width: 600px) { a { color: blue } }";
    let sheet = StyleSheet::parse(css).unwrap();
    assert!(sheet.diagnostics.is_empty());

    assert!(sheet.rules_for("p", &Viewport::new(500.0, 500.0)).is_empty());
    assert_eq!(sheet.rules_for("p", &Viewport::new(1000.0, 500.0)).len(), 1);

    assert_eq!(sheet.rules_for("a", &Viewport::new(500.0, 500.0)).len(), 1);
    assert!(sheet.rules_for("a", &Viewport::new(700.0, 500.0)).is_empty());
    assert!(sheet.rules_for("a", &Viewport::new(300.0, 500.0)).is_empty());
}

#[test]
fn test_invalid_media_query_never_matches() {
    let sheet = StyleSheet::parse("@media not (min-width: blue) { p { color: red } }").unwrap();

    assert_eq!(sheet.diagnostics.len(), 1);
    let body = &sheet.bodies()[1];
    assert!(!body.matches_media(&Viewport::new(100.0, 100.0)));
}

#[test]
fn test_unterminated_string_is_fatal() {
    let result = StyleSheet::parse("p { font-family: \"Open Sans; }");
    assert!(matches!(result, Err(Error::Lex { line: 1, .. })));
}

#[test]
fn test_declarations_outside_a_sheet() {
    let mut diagnostics = Vec::new();
    let rule = parse_declarations(
        "flex-flow: wrap column; margin: 1px 2px",
        DefinitionTable::standard(),
        &mut diagnostics,
    )
    .unwrap();

    assert!(diagnostics.is_empty());
    assert!(rule.contains("flex_wrap"));
    assert_eq!(rule.to_string(), "flex-flow: wrap column;\nmargin: 1px 2px;\n");
}

#[test]
fn test_custom_table() {
    let table = DefinitionTable::new().with_property("gap", "<length>{1,2}");
    let options = ParserOptions {
        properties: &table,
        ..ParserOptions::default()
    };
    let sheet = StyleSheet::parse_with_options("grid { gap: 4px 8px; color: red }", &options).unwrap();

    assert_eq!(sheet.get_rule("grid").unwrap().get("gap").unwrap().len(), 2);
    assert_eq!(sheet.diagnostics[0].kind, DiagnosticKind::UnknownProperty);
}

struct MemoryFetcher(HashMap<&'static str, &'static str>);

impl ImportFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = horizon_lattice_grammar::Result<String>> {
        ready(
            self.0
                .get(url)
                .map(|css| css.to_string())
                .ok_or_else(|| Error::import(url, "not found")),
        )
    }
}

#[test]
fn test_imports_merge_beneath() {
    let fetcher = MemoryFetcher(HashMap::from([
        ("reset.css", "* { margin: 0 } p { color: red; padding: 1px }"),
        ("print.css", "@media print { p { color: black } }"),
    ]));
    let css = "@import url(reset.css); @import 'print.css'; @import 'gone.css'; p { color: blue }";
    let sheet = pollster::block_on(StyleSheet::load(css, &fetcher)).unwrap();

    let rule = sheet.get_rule("p").unwrap();
    assert_eq!(
        rule.get("color").and_then(PropertyValue::as_single),
        Some(&Value::Color(Color::rgb(0, 0, 255)))
    );
    assert!(rule.contains("padding"));
    assert!(sheet.get_rule("*").is_some());
    assert_eq!(sheet.bodies().len(), 2);
    assert_eq!(sheet.diagnostics.len(), 1);
    assert_eq!(sheet.diagnostics[0].kind, DiagnosticKind::Import);
}

#[test]
fn test_file_imports() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("colors.css"), "h1 { color: red }").unwrap();
    std::fs::write(dir.path().join("main.css"), "@import 'colors.css'; h1 { width: 10px }").unwrap();

    let sheet = StyleSheet::from_file(dir.path().join("main.css")).unwrap();
    assert_eq!(sheet.pending_imports, vec!["colors.css".to_string()]);

    let css = std::fs::read_to_string(dir.path().join("main.css")).unwrap();
    let fetcher = FileImportFetcher::new(dir.path());
    let loaded = pollster::block_on(StyleSheet::load(&css, &fetcher)).unwrap();
    let rule = loaded.get_rule("h1").unwrap();
    assert!(rule.contains("color") && rule.contains("width"));
}
