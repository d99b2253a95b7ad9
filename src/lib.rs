//! # flowtrace
//!
//! Live module-dependency tracing for source trees.
//!
//! flowtrace walks a source directory, pulls relative import paths out of
//! every JavaScript/TypeScript file, and keeps the resulting dependency graph
//! (a [`Trace`]) up to date while files change. A small server hands the
//! current trace out on request and pushes every new one over a WebSocket;
//! the [`layout`] module turns a trace into rows of positioned nodes for a
//! hierarchical view.
//!
//! ## Key Features
//!
//! - **Text-based**: imports are found with a pattern match, not a parser, so
//!   broken code never stops a scan
//! - **Whole-graph snapshots**: every change produces a complete new trace
//! - **Deterministic layout**: same trace, same positions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowtrace::{layout_trace, trace_project, FlowConfig, LayoutOptions};
//!
//! // Scan ./src of the current project
//! let config = FlowConfig::default();
//! let trace = trace_project(".".as_ref(), &config).unwrap();
//!
//! // Position it
//! let layout = layout_trace(&trace, &LayoutOptions::default());
//! println!("{} nodes, {} edges", layout.nodes.len(), layout.edges.len());
//! ```

pub mod cli;
pub mod config;
pub mod daemon;
pub mod error;
pub mod graph;
pub mod layout;
pub mod parser;
pub mod store;
pub mod watcher;

// Re-exports for convenience
pub use config::{FlowConfig, LayoutOptions, ScanConfig};
pub use error::{FlowError, Result};
pub use graph::{build_trace, Step, Trace, TraceStats};
pub use layout::{layout_trace, Layout, PositionedEdge, PositionedNode};
pub use store::{Snapshot, TraceStore};
pub use watcher::{start_watching, WatcherHandle};

use std::path::Path;

/// Scan the configured source directory of a project once.
pub fn trace_project(project_root: &Path, config: &FlowConfig) -> Result<Trace> {
    build_trace(&config.resolve_source_dir(project_root), &config.scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_and_layout_project() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("components")).unwrap();
        fs::write(
            src.join("main.jsx"),
            "import React from 'react';\nimport App from './App';\n",
        )
        .unwrap();
        fs::write(
            src.join("App.js"),
            "import Header from './components/Header.jsx';\nimport './App.css';\n",
        )
        .unwrap();
        fs::write(src.join("components/Header.jsx"), "export default () => null;\n").unwrap();

        let trace = trace_project(dir.path(), &FlowConfig::default()).unwrap();

        // Closure: every import target is itself a step.
        for (_, to) in trace.edges() {
            assert!(trace.step(to).is_some(), "{to} missing");
        }
        assert!(trace.step("react").is_none());
        assert_eq!(trace.step("App.js").unwrap().next, vec!["components/Header.jsx", "App.css.js"]);

        let layout = layout_trace(&trace, &LayoutOptions::default());
        let level = |id: &str| {
            layout
                .nodes
                .iter()
                .find(|n| n.id == id)
                .map(|n| (n.y / LayoutOptions::default().y_gap) as usize)
                .unwrap()
        };
        assert_eq!(level("main.jsx"), 0);
        assert_eq!(level("App.js"), 1);
        assert_eq!(level("components/Header.jsx"), 2);
        assert_eq!(level("App.css.js"), 2);
        assert_eq!(layout.edges.len(), 3);
    }
}
