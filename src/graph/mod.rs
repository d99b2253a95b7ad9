//! Dependency graph module.
//!
//! Provides the trace data model, relative-import resolution, and the
//! directory scanner that builds a trace from a source tree.

pub mod builder;
pub mod resolve;
pub mod types;

pub use builder::build_trace;
pub use resolve::{is_relative, node_id, resolve_relative};
pub use types::{label_for, Step, Trace, TraceStats};
