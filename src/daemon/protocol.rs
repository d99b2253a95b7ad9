//! Wire constants and the push envelope shared with the visualization client.

use serde::Serialize;

use crate::graph::Trace;

/// Pull endpoint for the current trace.
pub const TRACE_PATH: &str = "/api/trace";
/// Server-side hierarchy layout of the current trace.
pub const LAYOUT_PATH: &str = "/api/layout";
/// Forces a full rescan.
pub const RESCAN_PATH: &str = "/api/rescan";
/// WebSocket push channel.
pub const WS_PATH: &str = "/ws";
/// Prebuilt client; served as `/__flow/`.
pub const UI_PATH: &str = "/__flow";

pub const MESSAGE_TYPE: &str = "custom";
pub const TRACE_UPDATE_EVENT: &str = "flow:traceUpdate";

/// Push message: `{"type":"custom","event":"flow:traceUpdate","data":<Trace>}`.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub event: &'static str,
    pub data: &'a Trace,
}

impl<'a> Envelope<'a> {
    pub fn trace_update(trace: &'a Trace) -> Self {
        Self {
            kind: MESSAGE_TYPE,
            event: TRACE_UPDATE_EVENT,
            data: trace,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
