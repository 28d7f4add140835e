//! `@import` resolution.

use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tracing::{debug, warn};

use super::css_parser::ParserOptions;
use super::error::{Diagnostic, DiagnosticKind};
use crate::rules::StyleSheet;
use crate::{Error, Result};

/// Fetches the text of an imported stylesheet.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::future::{ready, Future};
///
/// use horizon_lattice_grammar::parser::ImportFetcher;
/// use horizon_lattice_grammar::rules::StyleSheet;
/// use horizon_lattice_grammar::{Error, Result};
///
/// struct Memory(HashMap<&'static str, &'static str>);
///
/// impl ImportFetcher for Memory {
///     fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> {
///         ready(
///             self.0
///                 .get(url)
///                 .map(|css| css.to_string())
///                 .ok_or_else(|| Error::import(url, "not found")),
///         )
///     }
/// }
///
/// let fetcher = Memory(HashMap::from([("base.css", "p { color: red; width: 1px }")]));
/// let sheet = pollster::block_on(StyleSheet::load(
///     "@import 'base.css'; p { color: blue }",
///     &fetcher,
/// ))
/// .unwrap();
/// let rule = sheet.get_rule("p").unwrap();
/// assert!(rule.contains("width"));
/// assert_eq!(rule.to_string(), "width: 1px;\ncolor: blue;\n");
/// ```
pub trait ImportFetcher {
    /// Fetch the stylesheet at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>>;
}

/// Reads imports from the file system, relative to a base directory.
///
/// The read is synchronous: the returned future is already complete and
/// the calling thread blocks on file I/O. Wrap it in an executor's
/// blocking pool when loading from inside an async runtime.
#[derive(Debug, Clone, Default)]
pub struct FileImportFetcher {
    base: PathBuf,
}

impl FileImportFetcher {
    /// Resolve relative URLs against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The file an import URL refers to.
    pub fn resolve(&self, url: &str) -> PathBuf {
        let path = url.strip_prefix("file://").unwrap_or(url);
        self.base.join(path)
    }
}

impl ImportFetcher for FileImportFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> {
        let path = self.resolve(url);
        let result = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e));
        std::future::ready(result)
    }
}

/// Fetch and merge the pending imports of `sheet`, recursively.
///
/// Each URL is fetched at most once per load. Imported rules sit beneath
/// the importing sheet's, in import order.
pub(crate) async fn resolve_imports<F: ImportFetcher>(
    sheet: StyleSheet,
    fetcher: &F,
    options: &ParserOptions<'_>,
) -> StyleSheet {
    let mut seen = HashSet::new();
    resolve(sheet, fetcher, options, 0, &mut seen).await
}

fn resolve<'f, 'o: 'f, F: ImportFetcher>(
    mut sheet: StyleSheet,
    fetcher: &'f F,
    options: &'f ParserOptions<'o>,
    depth: usize,
    seen: &'f mut HashSet<String>,
) -> Pin<Box<dyn Future<Output = StyleSheet> + 'f>> {
    Box::pin(async move {
        let imports = std::mem::take(&mut sheet.pending_imports);
        if imports.is_empty() {
            return sheet;
        }
        if depth >= options.max_import_depth {
            warn!(depth, "@import nesting too deep");
            for url in imports {
                let error = Error::import(&url, format!("nested deeper than {depth} imports"));
                sheet.diagnostics.push(Diagnostic::from_error(&error, 0, 0));
            }
            return sheet;
        }

        let mut layered = StyleSheet::new();
        for url in imports {
            if !seen.insert(url.clone()) {
                debug!(url, "skipping repeated import");
                continue;
            }
            debug!(url, depth, "fetching import");
            let fetched = fetcher
                .fetch(&url)
                .await
                .and_then(|css| StyleSheet::parse_with_options(&css, options));
            match fetched {
                Ok(imported) => {
                    let imported = resolve(imported, fetcher, options, depth + 1, &mut *seen).await;
                    layered.merge(&imported);
                }
                Err(error) => {
                    warn!(url, %error, "import failed");
                    let message = Error::import(&url, error.to_string()).to_string();
                    sheet
                        .diagnostics
                        .push(Diagnostic::new(DiagnosticKind::Import, message, 0, 0));
                }
            }
        }

        layered.merge(&sheet);
        layered.source_path = sheet.source_path;
        layered
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct MockFetcher {
        files: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl MockFetcher {
        fn with(mut self, url: &str, css: &str) -> Self {
            self.files.insert(url.to_string(), css.to_string());
            self
        }
    }

    impl ImportFetcher for MockFetcher {
        fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> {
            self.requests.borrow_mut().push(url.to_string());
            let result = self
                .files
                .get(url)
                .cloned()
                .ok_or_else(|| Error::import(url, "not found"));
            async move { result }
        }
    }

    fn load(css: &str, fetcher: &MockFetcher) -> StyleSheet {
        pollster::block_on(StyleSheet::load(css, fetcher)).unwrap()
    }

    #[test]
    fn imports_sit_beneath_the_importer() {
        let fetcher = MockFetcher::default()
            .with("a.css", "p { color: red } h1 { color: red }")
            .with("b.css", "h1 { color: blue }");
        let sheet = load("@import 'a.css'; @import 'b.css'; p { color: green }", &fetcher);

        assert!(sheet.pending_imports.is_empty());
        assert_eq!(sheet.to_string(), "p {\n    color: green;\n}\nh1 {\n    color: blue;\n}\n");
    }

    #[test]
    fn nested_imports_load_once() {
        let fetcher = MockFetcher::default()
            .with("a.css", "@import 'b.css'; a { width: 1px }")
            .with("b.css", "@import 'a.css'; b { width: 2px }");
        let sheet = load("@import 'a.css'; @import 'b.css';", &fetcher);

        assert!(sheet.get_rule("a").is_some());
        assert!(sheet.get_rule("b").is_some());
        assert_eq!(*fetcher.requests.borrow(), vec!["a.css", "b.css"]);
        assert!(sheet.diagnostics.is_empty());
    }

    #[test]
    fn failed_imports_become_diagnostics() {
        let fetcher = MockFetcher::default().with("broken.css", "p { content: 'open }");
        let sheet = load("@import 'missing.css'; @import 'broken.css'; p { color: red }", &fetcher);

        assert!(sheet.get_rule("p").is_some());
        assert_eq!(sheet.diagnostics.len(), 2);
        assert!(sheet
            .diagnostics
            .iter()
            .all(|diagnostic| diagnostic.kind == DiagnosticKind::Import));
    }

    #[test]
    fn depth_limit() {
        let fetcher = MockFetcher::default()
            .with("a.css", "@import 'b.css'; a { width: 1px }")
            .with("b.css", "b { width: 1px }");
        let options = ParserOptions {
            max_import_depth: 1,
            ..ParserOptions::default()
        };
        let sheet = pollster::block_on(StyleSheet::load_with_options(
            "@import 'a.css';",
            &fetcher,
            &options,
        ))
        .unwrap();

        assert!(sheet.get_rule("a").is_some());
        assert!(sheet.get_rule("b").is_none());
        assert_eq!(sheet.diagnostics.len(), 1);
        assert_eq!(sheet.diagnostics[0].kind, DiagnosticKind::Import);
    }

    #[test]
    fn files_resolve_against_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("base.css"), "body { margin: 0 }").unwrap();
        let fetcher = FileImportFetcher::new(dir.path());
        let sheet = pollster::block_on(StyleSheet::load(
            "@import url(base.css); body { color: red }",
            &fetcher,
        ))
        .unwrap();

        let rule = sheet.get_rule("body").unwrap();
        assert!(rule.contains("margin") && rule.contains("color"));
    }
}
