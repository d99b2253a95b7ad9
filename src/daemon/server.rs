//
//  server.rs
//  Flow
//

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use super::protocol::{TRACE_PATH, UI_PATH, WS_PATH};
use super::routes::{router, AppState};
use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::store::TraceStore;
use crate::watcher::start_watching;

/// Run the flow server until Ctrl+C / SIGTERM.
///
/// Lifecycle: initial scan, watch subscription, serve, and on shutdown the
/// watcher is dropped so the subscription is released. A missing source
/// directory or a failed subscription stops startup with an error.
pub async fn start_daemon(project_root: &Path, config: FlowConfig) -> Result<()> {
    let project_root = project_root
        .canonicalize()
        .with_context(|| format!("project root {} is not accessible", project_root.display()))?;
    let src_dir = config.resolve_source_dir(&project_root);
    let src_dir = src_dir
        .canonicalize()
        .map_err(|_| FlowError::SourceDirMissing(src_dir.clone()))?;

    info!(root = %src_dir.display(), "building initial trace");
    let scan_config = config.scan.clone();
    let store_dir = src_dir.clone();
    let store = tokio::task::spawn_blocking(move || TraceStore::load(store_dir, scan_config))
        .await
        .context("initial scan panicked")?;
    let store = Arc::new(store);

    let watcher = start_watching(store.src_dir(), Arc::clone(&store), config.watch.debounce_ms)
        .context("failed to watch source directory")?;
    info!(root = %watcher.root().display(), "file watcher started");

    let ui_dir = config.resolve_ui_dir(&project_root);
    if !ui_dir.is_dir() {
        warn!(ui_dir = %ui_dir.display(), "UI build not found, {}/ will return 404", UI_PATH);
    }

    let app = router(
        AppState {
            store,
            layout: config.layout,
        },
        &ui_dir,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    info!("flow server listening on http://{}", local);
    info!("  GET {} - current trace", TRACE_PATH);
    info!("  WS  {} - trace updates", WS_PATH);
    info!("  UI  http://{}{}/", local, UI_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("flow server shutting down");
    drop(watcher);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
