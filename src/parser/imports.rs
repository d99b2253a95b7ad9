//! Import extraction from raw source text.
//!
//! Works on text, not on a syntax tree: one regular expression finds every
//! string literal that sits in an import position. Comments or strings that
//! happen to look like imports are reported too; the trace is best-effort.
//! Because nothing is parsed there is no failure mode, any input yields a
//! (possibly empty) list.

use once_cell::sync::Lazy;
use regex::Regex;

/// Every import-shaped statement whose target is a quoted literal:
///
/// - `import x from './x'`, `import { a, b } from "./x"`, `import './side-effect'`
/// - `export { a } from './x'`, `export * from './x'`
/// - `import('./lazy')`
/// - `require('./legacy')`
///
/// The target may not contain a quote or span a line.
static IMPORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        (?:
            \bimport\s*\(\s*
          | \brequire\s*\(\s*
          | \bimport\s+[^'"]*
          | \bexport\s+[^'";]*?\bfrom\s*
        )
        ['"]([^'"\n]+)['"]
        "#,
    )
    .expect("import pattern is valid")
});

/// Extract import targets from one file's text, in order of appearance.
///
/// Duplicates are kept: a target imported twice is returned twice.
pub fn extract_imports(source: &str) -> Vec<String> {
    IMPORT_PATTERN
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
