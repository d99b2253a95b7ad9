//! Lexical resolution of relative import paths to node identifiers.
//!
//! Nothing here touches the file system: identifiers are joined and
//! normalised as strings so results are identical on every platform.

use std::path::Path;

/// Relative imports start with a dot (`./x`, `../x`). Anything else is a
/// package or alias import and is not traced.
pub fn is_relative(import: &str) -> bool {
    import.starts_with('.')
}

/// Directory part of an identifier (`""` for files at the root).
fn dirname(id: &str) -> &str {
    id.rfind('/').map(|i| &id[..i]).unwrap_or("")
}

/// Join `import` onto the directory of `from` and normalise the result.
///
/// `..` that cannot be popped is kept, so targets outside the scanned root
/// resolve to identifiers such as `../shared/x`.
pub fn resolve_relative(from: &str, import: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in dirname(from).split('/').chain(import.split('/')) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Identifier for a scanned file: its path relative to `root`, `/`-separated.
pub fn node_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
