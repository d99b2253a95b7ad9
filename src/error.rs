//! Error types for flowtrace.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using FlowError.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors that can occur while scanning, watching or configuring flowtrace.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Reading a file or directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The directory walk failed (unreadable entry, broken link, symlink loop).
    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// The file-system subscription could not be created or failed.
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// The source directory to scan does not exist.
    #[error("source directory not found: {0}")]
    SourceDirMissing(PathBuf),

    /// flow.toml could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
