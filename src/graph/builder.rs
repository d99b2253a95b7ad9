//
//  builder.rs
//  Flow
//

use ignore::WalkBuilder;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use super::resolve::{is_relative, node_id, resolve_relative};
use super::types::{Step, Trace};
use crate::config::ScanConfig;
use crate::error::{FlowError, Result};
use crate::parser::{extract_imports, SourceFilter};

/// Configure the directory walk.
///
/// Entries are sorted by file name so the same tree always yields the same
/// step order. Hidden files are included and ignore files are only honoured
/// when asked for; every other directory is descended.
fn walker(src_dir: &Path, config: &ScanConfig) -> WalkBuilder {
    let mut builder = WalkBuilder::new(src_dir);
    builder
        .hidden(false)
        .parents(false)
        .ignore(config.respect_gitignore)
        .git_ignore(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .git_global(false)
        .require_git(false)
        .follow_links(config.follow_links)
        .max_depth(config.max_depth)
        .sort_by_file_name(|a, b| a.cmp(b));

    if !config.exclude.is_empty() {
        let exclude = config.exclude.clone();
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir
                && entry.depth() > 0
                && exclude.iter().any(|name| entry.file_name() == name.as_str()))
        });
    }
    builder
}

/// Scan `src_dir` and build a dependency trace.
///
/// Every source file becomes a step. Relative imports are resolved against
/// the importing file and completed with the default extension; targets that
/// were never scanned get an empty placeholder step. The first walk or read
/// error aborts the whole scan so a partial graph is never returned.
pub fn build_trace(src_dir: &Path, config: &ScanConfig) -> Result<Trace> {
    if !src_dir.is_dir() {
        return Err(FlowError::SourceDirMissing(src_dir.to_path_buf()));
    }

    let started = Instant::now();
    let filter = SourceFilter::from_config(config);
    let mut nodes: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut files = 0usize;

    for entry in walker(src_dir, config).build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) || !filter.is_source(entry.path()) {
            continue;
        }
        files += 1;

        let id = node_id(src_dir, entry.path());
        nodes.entry(id.clone()).or_default();

        let bytes = fs::read(entry.path())?;
        let source = String::from_utf8_lossy(&bytes);

        let mut next = Vec::new();
        for import in extract_imports(&source) {
            if !is_relative(&import) {
                continue;
            }
            let target = filter.complete(resolve_relative(&id, &import));
            nodes.entry(target.clone()).or_default();
            next.push(target);
        }

        if let Some(targets) = nodes.get_mut(&id) {
            targets.extend(next);
        }
    }

    let steps: Vec<Step> = nodes
        .into_iter()
        .map(|(id, next)| Step::new(id, next))
        .collect();

    debug!(
        root = %src_dir.display(),
        files,
        steps = steps.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan complete"
    );

    Ok(Trace::new(steps))
}
