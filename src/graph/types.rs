//
//  types.rs
//  Flow
//

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One node of the dependency graph: a source file (or a placeholder for an
/// import target that was never scanned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Path relative to the scanned root, always `/`-separated.
    pub id: String,
    /// Final path segment of `id`.
    pub label: String,
    /// Resolved import targets in order of appearance. Not deduplicated.
    pub next: Vec<String>,
}

impl Step {
    pub fn new(id: impl Into<String>, next: Vec<String>) -> Self {
        let id = id.into();
        Self {
            label: label_for(&id).to_string(),
            id,
            next,
        }
    }
}

/// Display label for a node identifier.
pub fn label_for(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// A timestamped, immutable snapshot of the dependency graph.
///
/// Every identifier that appears in some `next` list also appears as the
/// `id` of a step in the same trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub updated: DateTime<Utc>,
    pub steps: Vec<Step>,
}

impl Trace {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            updated: Utc::now(),
            steps,
        }
    }

    /// Look up a step by identifier.
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// All `(from, to)` pairs in step order, with multiplicity.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.steps
            .iter()
            .flat_map(|s| s.next.iter().map(move |to| (s.id.as_str(), to.as_str())))
    }

    pub fn stats(&self) -> TraceStats {
        let targets: HashSet<&str> = self.edges().map(|(_, to)| to).collect();
        TraceStats {
            steps: self.steps.len(),
            edges: self.edges().count(),
            entries: self
                .steps
                .iter()
                .filter(|s| !targets.contains(s.id.as_str()))
                .count(),
            leaves: self.steps.iter().filter(|s| s.next.is_empty()).count(),
        }
    }
}

/// Summary counts for logging and the `stats` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStats {
    pub steps: usize,
    pub edges: usize,
    /// Steps nothing imports.
    pub entries: usize,
    /// Steps that import nothing.
    pub leaves: usize,
}
