//! One-shot commands: scan, layout, stats.
//!
//! Each runs a single scan and prints to stdout; nothing is watched.

use anyhow::Result;
use std::path::Path;

use crate::config::FlowConfig;
use crate::layout::layout_trace;
use crate::store::Snapshot;
use crate::trace_project;

/// Print the trace, or the failure payload the server would serve.
pub fn scan(root: &Path, config: &FlowConfig, pretty: bool) -> Result<()> {
    let snapshot = match trace_project(root, config) {
        Ok(trace) => Snapshot::Ready(trace),
        Err(e) => {
            tracing::error!(error = %e, "error generating trace");
            Snapshot::failed()
        }
    };
    let json = if pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{}", json);
    Ok(())
}

pub fn layout(root: &Path, config: &FlowConfig) -> Result<()> {
    let trace = trace_project(root, config)?;
    let layout = layout_trace(&trace, &config.layout);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

pub fn stats(root: &Path, config: &FlowConfig) -> Result<()> {
    let trace = trace_project(root, config)?;
    let stats = trace.stats();
    let placed = layout_trace(&trace, &config.layout).nodes.len();

    println!("Flow Trace Stats");
    println!("────────────────");
    println!("Source:   {}", config.resolve_source_dir(root).display());
    println!("Updated:  {}", trace.updated.to_rfc3339());
    println!("Steps:    {}", stats.steps);
    println!("Edges:    {}", stats.edges);
    println!("Entries:  {}", stats.entries);
    println!("Leaves:   {}", stats.leaves);
    if placed < stats.steps {
        println!("Unplaced: {} (not reachable from an entry)", stats.steps - placed);
    }
    Ok(())
}
