//! Trace store: the single owner of the current dependency snapshot.
//!
//! Readers get the latest snapshot synchronously through [`TraceStore::current`]
//! and learn about new ones asynchronously through [`TraceStore::subscribe`].
//! A refresh builds a whole new trace off to the side and then swaps the
//! pointer, so a reader sees either the old snapshot or the new one, never a
//! half-built graph. Refreshes are serialised; there is one writer at a time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::config::ScanConfig;
use crate::graph::{build_trace, Trace};

/// Payload served in place of a trace when the last scan failed.
pub const SCAN_FAILED: &str = "Failed to generate trace";

/// Pending pushes kept per subscriber before it starts to lag.
pub(crate) const PUSH_CAPACITY: usize = 16;

/// The current state of the store: a full trace or the failure sentinel.
///
/// Serialised untagged, so clients see either the trace object itself or
/// `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Ready(Trace),
    Failed { error: String },
}

impl Snapshot {
    pub fn failed() -> Self {
        Snapshot::Failed {
            error: SCAN_FAILED.to_string(),
        }
    }

    pub fn trace(&self) -> Option<&Trace> {
        match self {
            Snapshot::Ready(trace) => Some(trace),
            Snapshot::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Snapshot::Failed { .. })
    }
}

/// Owns the current snapshot of one source directory.
pub struct TraceStore {
    src_dir: PathBuf,
    config: ScanConfig,
    current: RwLock<Arc<Snapshot>>,
    refresh_lock: Mutex<()>,
    updates: broadcast::Sender<Arc<Trace>>,
}

impl TraceStore {
    /// Create the store and run the initial scan synchronously.
    pub fn load(src_dir: impl Into<PathBuf>, config: ScanConfig) -> Self {
        let src_dir = src_dir.into();
        let (updates, _) = broadcast::channel(PUSH_CAPACITY);
        let initial = scan(&src_dir, &config);
        Self {
            src_dir,
            config,
            current: RwLock::new(Arc::new(initial)),
            refresh_lock: Mutex::new(()),
            updates,
        }
    }

    /// Directory this store scans.
    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// The latest complete snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Receive every trace produced by a successful refresh from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Trace>> {
        self.updates.subscribe()
    }

    /// Rescan the whole tree, replace the snapshot, and push it on success.
    ///
    /// A failed scan replaces the snapshot with the failure sentinel and is
    /// not pushed.
    pub fn refresh(&self) -> Arc<Snapshot> {
        let _writer = self
            .refresh_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let snapshot = Arc::new(scan(&self.src_dir, &self.config));
        match self.current.write() {
            Ok(mut guard) => *guard = Arc::clone(&snapshot),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&snapshot),
        }

        if let Snapshot::Ready(trace) = snapshot.as_ref() {
            // Err only means nobody is listening right now.
            let receivers = self.updates.send(Arc::new(trace.clone())).unwrap_or(0);
            debug!(receivers, "trace update pushed");
        }
        snapshot
    }
}

/// One full scan, with failures folded into the sentinel.
fn scan(src_dir: &Path, config: &ScanConfig) -> Snapshot {
    let started = Instant::now();
    match build_trace(src_dir, config) {
        Ok(trace) => {
            let stats = trace.stats();
            info!(
                root = %src_dir.display(),
                steps = stats.steps,
                edges = stats.edges,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "trace generated"
            );
            Snapshot::Ready(trace)
        }
        Err(e) => {
            error!(root = %src_dir.display(), error = %e, "error generating trace");
            Snapshot::failed()
        }
    }
}
