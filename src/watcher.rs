//
//  watcher.rs
//  Flow
//

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{FlowError, Result};
use crate::store::TraceStore;

/// Shortest debounce window accepted.
const MIN_DEBOUNCE_MS: u64 = 10;

/// Keeps the file-system subscription alive. Dropping it stops watching.
pub struct WatcherHandle {
    root: PathBuf,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl WatcherHandle {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        info!(root = %self.root.display(), "file watcher released");
    }
}

/// Watch `root` recursively and rescan the store on every change.
///
/// Events are coalesced over a trailing `debounce_ms` window; each settled
/// batch (create, modify, remove or rename at any depth) triggers one full
/// refresh. Batches are delivered on a single thread, so refreshes never
/// overlap. Failing to subscribe is an error: without it the trace would
/// silently go stale.
pub fn start_watching(
    root: &Path,
    store: Arc<TraceStore>,
    debounce_ms: u64,
) -> Result<WatcherHandle> {
    if !root.is_dir() {
        return Err(FlowError::SourceDirMissing(root.to_path_buf()));
    }

    let timeout = Duration::from_millis(debounce_ms.max(MIN_DEBOUNCE_MS));
    let mut debouncer = new_debouncer(timeout, move |result: DebounceEventResult| {
        handle_batch(&store, result)
    })?;

    debouncer.watcher().watch(root, RecursiveMode::Recursive)?;

    Ok(WatcherHandle {
        root: root.to_path_buf(),
        _debouncer: debouncer,
    })
}

/// Rescan once per settled batch. A watcher error may mean lost events, so
/// it rescans too.
fn handle_batch(store: &TraceStore, result: DebounceEventResult) {
    match result {
        Ok(events) if events.is_empty() => {}
        Ok(events) => {
            debug!(changed = events.len(), "source change detected");
            store.refresh();
        }
        Err(e) => {
            warn!(error = %e, "file watcher error, rescanning");
            store.refresh();
        }
    }
}
