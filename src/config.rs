//
//  config.rs
//  Flow
//

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;

/// Name of the optional config file looked up in the project root.
pub const CONFIG_FILE: &str = "flow.toml";

/// Top-level flowtrace configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub layout: LayoutOptions,
}

/// What the scanner walks and which files count as source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Source directory to scan (relative to the project root).
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    /// File extensions (without the dot) that make a file a source file.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Extension appended to extensionless relative imports.
    #[serde(default = "default_extension")]
    pub default_extension: String,
    /// Directory names that are never descended.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Honour .gitignore / .ignore files while walking.
    #[serde(default)]
    pub respect_gitignore: bool,
    /// Follow symbolic links. Link loops abort the scan.
    #[serde(default = "default_true")]
    pub follow_links: bool,
    /// Maximum directory depth below the source root.
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,
}

/// File watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Trailing-edge debounce window for change events, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// HTTP / WebSocket server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Prebuilt visualization client (relative to the project root).
    #[serde(default = "default_ui_dir")]
    pub ui_dir: String,
}

/// Grid spacing for the hierarchy layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    #[serde(default = "default_x_gap")]
    pub x_gap: f64,
    #[serde(default = "default_y_gap")]
    pub y_gap: f64,
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_extensions() -> Vec<String> {
    ["js", "jsx", "ts", "tsx"].iter().map(|s| s.to_string()).collect()
}

fn default_extension() -> String {
    "js".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_depth() -> Option<usize> {
    Some(64)
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5173
}

fn default_ui_dir() -> String {
    "ui/dist".to_string()
}

fn default_x_gap() -> f64 {
    220.0
}

fn default_y_gap() -> f64 {
    150.0
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            extensions: default_extensions(),
            default_extension: default_extension(),
            exclude: Vec::new(),
            respect_gitignore: false,
            follow_links: default_true(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            ui_dir: default_ui_dir(),
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            x_gap: default_x_gap(),
            y_gap: default_y_gap(),
        }
    }
}

impl FlowConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unparsable config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Resolve the scanned source directory against the project root.
    pub fn resolve_source_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.scan.source_dir)
    }

    /// Resolve the static UI directory against the project root.
    pub fn resolve_ui_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.server.ui_dir)
    }
}
