//! CLI module for flowtrace.
//!
//! Commands:
//! - Server: serve (default)
//! - One-shot: scan, layout, stats

pub mod inspect;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{FlowConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "flowtrace")]
#[command(about = "flowtrace - live module-dependency graph of a source tree", long_about = None)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/flow.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // ─── Server ───────────────────────────────────────────────────
    /// Watch the source tree and serve the trace, push channel and UI
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
    },

    // ─── One-shot ─────────────────────────────────────────────────
    /// Scan once and print the trace as JSON
    Scan {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Scan once and print the hierarchy layout as JSON
    Layout,

    /// Scan once and print graph statistics
    Stats,
}

impl Cli {
    /// Load the config file named on the command line, or `<root>/flow.toml`.
    pub fn load_config(&self) -> FlowConfig {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| config_path(&self.root));
        FlowConfig::load(&path)
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_serve() {
        let cli = Cli::try_parse_from(["flowtrace"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["flowtrace", "--root", "web", "serve", "--port", "4000"])
            .unwrap();
        assert_eq!(cli.root, PathBuf::from("web"));
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host, None);
                assert_eq!(port, Some(4000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_config_path_defaults_to_root() {
        let cli = Cli::try_parse_from(["flowtrace", "-r", "/p", "stats"]).unwrap();
        assert!(cli.config.is_none());
        assert_eq!(config_path(&cli.root), PathBuf::from("/p/flow.toml"));
    }
}
