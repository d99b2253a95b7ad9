//
//  language.rs
//  Flow
//

use std::path::Path;

use crate::config::ScanConfig;

/// Decides which files are scanned and completes extensionless imports.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    /// Dotted suffixes, e.g. ".tsx".
    suffixes: Vec<String>,
    default_suffix: String,
}

impl SourceFilter {
    pub fn new<S: AsRef<str>>(extensions: &[S], default_extension: &str) -> Self {
        Self {
            suffixes: extensions
                .iter()
                .map(|ext| format!(".{}", ext.as_ref().trim_start_matches('.')))
                .collect(),
            default_suffix: format!(".{}", default_extension.trim_start_matches('.')),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(&config.extensions, &config.default_extension)
    }

    /// True if the file name ends in one of the source extensions.
    pub fn is_source(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.has_source_extension(&name.to_string_lossy()))
            .unwrap_or(false)
    }

    /// True if a node identifier or import candidate already carries a source extension.
    pub fn has_source_extension(&self, name: &str) -> bool {
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Append the default extension unless one is present.
    ///
    /// This is a single guess, not a search: `./button` becomes `button.js`
    /// even when only `button.tsx` exists on disk.
    pub fn complete(&self, candidate: String) -> String {
        if self.has_source_extension(&candidate) {
            candidate
        } else {
            candidate + &self.default_suffix
        }
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}
