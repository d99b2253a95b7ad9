//
//  routes.rs
//  Flow
//

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use super::protocol::{Envelope, LAYOUT_PATH, RESCAN_PATH, TRACE_PATH, UI_PATH, WS_PATH};
use crate::config::LayoutOptions;
use crate::graph::Trace;
use crate::layout::layout_trace;
use crate::store::{Snapshot, TraceStore};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TraceStore>,
    pub layout: LayoutOptions,
}

/// Build the HTTP surface: pull, layout, rescan, push and the static client.
pub fn router(state: AppState, ui_dir: &Path) -> Router {
    Router::new()
        .route(TRACE_PATH, get(get_trace))
        .route(LAYOUT_PATH, get(get_layout))
        .route(RESCAN_PATH, post(rescan))
        .route(WS_PATH, get(websocket_handler))
        .nest_service(
            UI_PATH,
            ServeDir::new(ui_dir).append_index_html_on_directories(true),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Current snapshot. Always 200; a failed scan is reported in the body.
async fn get_trace(State(state): State<AppState>) -> Response {
    let snapshot = state.store.current();
    Json(snapshot.as_ref()).into_response()
}

async fn get_layout(State(state): State<AppState>) -> Response {
    let snapshot = state.store.current();
    match snapshot.as_ref() {
        Snapshot::Ready(trace) => Json(layout_trace(trace, &state.layout)).into_response(),
        Snapshot::Failed { error } => Json(serde_json::json!({ "error": error })).into_response(),
    }
}

async fn rescan(State(state): State<AppState>) -> Response {
    let store = Arc::clone(&state.store);
    let snapshot = match tokio::task::spawn_blocking(move || store.refresh()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, "rescan task failed");
            state.store.current()
        }
    };
    Json(snapshot.as_ref()).into_response()
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let updates = state.store.subscribe();
    ws.on_upgrade(move |socket| push_updates(socket, updates))
}

/// Forward every trace update to one client until either side goes away.
///
/// Delivery is best-effort: a lagging client skips what it missed, and a
/// failed send ends this connection only.
async fn push_updates(socket: WebSocket, mut updates: broadcast::Receiver<Arc<Trace>>) {
    let (mut sender, mut receiver) = socket.split();
    debug!("push client connected");

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(trace) => {
                    let message = match Envelope::trace_update(&trace).to_json() {
                        Ok(message) => message,
                        Err(e) => {
                            warn!(error = %e, "failed to encode trace update");
                            continue;
                        }
                    };
                    if let Err(e) = sender.send(Message::Text(message.into())).await {
                        debug!(error = %e, "push failed, dropping client");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "push client lagging, skipped updates");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => {}
            },
        }
    }

    debug!("push client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
    use tower::ServiceExt;

    use crate::config::ScanConfig;

    fn app(src: &Path, ui: &Path) -> Router {
        let store = Arc::new(TraceStore::load(src, ScanConfig::default()));
        router(
            AppState {
                store,
                layout: LayoutOptions::default(),
            },
            ui,
        )
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn test_pull_returns_trace_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "import b from './b';").unwrap();
        fs::write(dir.path().join("b.js"), "").unwrap();

        let (status, content_type, body) =
            send(app(dir.path(), dir.path()), Method::GET, TRACE_PATH).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["steps"][0]["id"], "a.js");
        assert_eq!(value["steps"][0]["next"], serde_json::json!(["b.js"]));
        assert_eq!(value["steps"][1]["next"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_pull_reports_scan_failure_with_200() {
        let dir = tempdir().unwrap();

        let (status, _, body) =
            send(app(&dir.path().join("missing"), dir.path()), Method::GET, TRACE_PATH).await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "Failed to generate trace" }));
    }

    #[tokio::test]
    async fn test_layout_endpoint() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "import b from './b';").unwrap();
        fs::write(dir.path().join("b.js"), "").unwrap();

        let (status, _, body) = send(app(dir.path(), dir.path()), Method::GET, LAYOUT_PATH).await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["nodes"][0]["id"], "a.js");
        assert_eq!(value["nodes"][1]["y"], 150.0);
        assert_eq!(value["edges"][0]["id"], "a.js->b.js");
    }

    #[tokio::test]
    async fn test_rescan_picks_up_changes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();
        let app = app(dir.path(), dir.path());

        fs::write(dir.path().join("b.js"), "").unwrap();
        let (status, _, body) = send(app.clone(), Method::POST, RESCAN_PATH).await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["steps"].as_array().unwrap().len(), 2);

        let (_, _, body) = send(app, Method::GET, TRACE_PATH).await;
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["steps"][1]["id"], "b.js");
    }

    #[tokio::test]
    async fn test_static_client_is_served() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let ui = dir.path().join("dist");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&ui).unwrap();
        fs::write(ui.join("index.html"), "<div id=\"flow\"></div>").unwrap();

        let (status, _, body) = send(app(&src, &ui), Method::GET, "/__flow/index.html").await;

        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("id=\"flow\""));
    }

    #[tokio::test]
    async fn test_websocket_requires_upgrade() {
        let dir = tempdir().unwrap();

        let (status, _, _) = send(app(dir.path(), dir.path()), Method::GET, WS_PATH).await;

        assert_ne!(status, StatusCode::NOT_FOUND);
        assert!(status.is_client_error());
    }

    async fn serve(store: Arc<TraceStore>, ui: &Path) -> String {
        let app = router(
            AppState {
                store,
                layout: LayoutOptions::default(),
            },
            ui,
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("ws://{addr}{WS_PATH}")
    }

    /// Read text frames until one carries a trace matching `settled`.
    async fn next_update<S>(client: &mut S, settled: impl Fn(&serde_json::Value) -> bool) -> serde_json::Value
    where
        S: futures_util::Stream<Item = Result<WsMessage, WsError>> + Unpin,
    {
        let deadline = Duration::from_secs(5);
        loop {
            let frame = tokio::time::timeout(deadline, client.next())
                .await
                .expect("no update before timeout")
                .expect("connection closed")
                .unwrap();
            if !frame.is_text() {
                continue;
            }
            let value: serde_json::Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
            if settled(&value) {
                return value;
            }
        }
    }

    #[tokio::test]
    async fn test_push_reaches_remaining_clients() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();
        let store = Arc::new(TraceStore::load(dir.path(), ScanConfig::default()));
        let url = serve(Arc::clone(&store), dir.path()).await;

        let (mut survivor, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
        let (closed, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
        drop(closed);

        fs::write(dir.path().join("b.js"), "import './a';").unwrap();
        let refresher = Arc::clone(&store);
        tokio::task::spawn_blocking(move || refresher.refresh()).await.unwrap();

        let message = next_update(&mut survivor, |_| true).await;
        assert_eq!(message["type"], "custom");
        assert_eq!(message["event"], "flow:traceUpdate");
        assert_eq!(message["data"]["steps"][1]["id"], "b.js");
        assert_eq!(message["data"]["steps"][1]["next"], serde_json::json!(["a.js"]));

        // The closed client does not stop later pushes either.
        fs::write(dir.path().join("c.js"), "").unwrap();
        let refresher = Arc::clone(&store);
        tokio::task::spawn_blocking(move || refresher.refresh()).await.unwrap();
        let message = next_update(&mut survivor, |_| true).await;
        assert_eq!(message["data"]["steps"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_push_client_catches_up_after_burst() {
        let dir = tempdir().unwrap();
        let store = Arc::new(TraceStore::load(dir.path(), ScanConfig::default()));
        let url = serve(Arc::clone(&store), dir.path()).await;
        let (mut client, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

        // More refreshes than the push buffer holds, without reading.
        let refresher = Arc::clone(&store);
        let root = dir.path().to_path_buf();
        tokio::task::spawn_blocking(move || {
            for i in 0..crate::store::PUSH_CAPACITY * 3 {
                fs::write(root.join(format!("f{i}.js")), "").unwrap();
                refresher.refresh();
            }
        })
        .await
        .unwrap();

        let total = crate::store::PUSH_CAPACITY * 3;
        let message = next_update(&mut client, |m| {
            m["data"]["steps"].as_array().map(|s| s.len()) == Some(total)
        })
        .await;
        assert_eq!(message["event"], "flow:traceUpdate");
    }
}
