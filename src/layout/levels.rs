//
//  levels.rs
//  Flow
//

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

use crate::graph::Trace;

/// A node on the walk path together with its level and the index of the
/// next import to visit.
struct Frame<'a> {
    node: &'a str,
    level: usize,
    cursor: usize,
}

/// Assign every node reachable from an entry its longest-path level.
///
/// Entries are the steps no `next` list mentions; they get level 0. From each
/// entry the walk follows imports and raises a target's level to
/// `importer + 1` whenever that is larger than what it already has; a target
/// whose level would not grow is not walked again. Targets already on the
/// current walk path are skipped, which bounds the walk on cyclic graphs.
///
/// The walk keeps an explicit stack instead of recursing. Nodes that no entry
/// reaches are absent from the result.
pub fn assign_levels(trace: &Trace) -> IndexMap<&str, usize> {
    let mut importers: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut imports: HashMap<&str, &[String]> = HashMap::new();
    for step in &trace.steps {
        importers.entry(step.id.as_str()).or_default();
        imports.entry(step.id.as_str()).or_insert(step.next.as_slice());
        for target in &step.next {
            importers
                .entry(target.as_str())
                .or_default()
                .push(step.id.as_str());
        }
    }

    let roots = trace
        .steps
        .iter()
        .map(|s| s.id.as_str())
        .filter(|id| importers.get(id).map_or(true, |p| p.is_empty()));

    let mut levels: IndexMap<&str, usize> = IndexMap::new();
    let mut on_path: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Frame> = Vec::new();

    for root in roots {
        if levels.contains_key(root) {
            continue;
        }
        levels.insert(root, 0);
        on_path.insert(root);
        stack.push(Frame {
            node: root,
            level: 0,
            cursor: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let (node, level, cursor) = (frame.node, frame.level, frame.cursor);
            frame.cursor += 1;

            let Some(child) = imports.get(node).and_then(|next| next.get(cursor)) else {
                on_path.remove(node);
                stack.pop();
                continue;
            };
            let child = child.as_str();
            if on_path.contains(child) {
                continue;
            }

            let candidate = level + 1;
            if levels.get(child).map_or(true, |&known| known < candidate) {
                levels.insert(child, candidate);
                on_path.insert(child);
                stack.push(Frame {
                    node: child,
                    level: candidate,
                    cursor: 0,
                });
            }
        }
    }

    levels
}
