//
//  place.rs
//  Flow
//

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::levels::assign_levels;
use crate::config::LayoutOptions;
use crate::graph::{Step, Trace};

/// A node with grid coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// An edge between two positioned nodes. `id` is `"<from>-><to>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Positioned projection of one trace; rebuilt from scratch on every update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
}

/// Lay a trace out as rows of levels.
///
/// Row `level` sits at `y = level * y_gap`; within a row, nodes keep trace
/// order and sit at `x = index * x_gap`. Edges are emitted for every import
/// whose two ends were placed.
pub fn layout_trace(trace: &Trace, options: &LayoutOptions) -> Layout {
    let levels = assign_levels(trace);

    let mut rows: BTreeMap<usize, Vec<&Step>> = BTreeMap::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for step in &trace.steps {
        if !seen.insert(step.id.as_str()) {
            continue;
        }
        if let Some(&level) = levels.get(step.id.as_str()) {
            rows.entry(level).or_default().push(step);
        }
    }

    let mut nodes = Vec::with_capacity(levels.len());
    for (level, steps) in &rows {
        for (index, step) in steps.iter().enumerate() {
            nodes.push(PositionedNode {
                id: step.id.clone(),
                label: step.label.clone(),
                x: index as f64 * options.x_gap,
                y: *level as f64 * options.y_gap,
            });
        }
    }

    let placed: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = trace
        .edges()
        .filter(|(from, to)| placed.contains(from) && placed.contains(to))
        .map(|(from, to)| PositionedEdge {
            id: format!("{from}->{to}"),
            source: from.to_string(),
            target: to.to_string(),
        })
        .collect();

    Layout { nodes, edges }
}
