//! Hierarchy layout: turns a trace into positioned nodes and edges.
//!
//! Entry files (nothing imports them) sit on level 0. Every other reachable
//! file sits one level below the deepest file that imports it, so a level is
//! the longest import chain from any entry. Levels become rows, and files on
//! the same level are spread left to right in trace order.
//!
//! Files that no entry reaches, such as a cycle nothing else imports, get no
//! level and are left out of the layout together with their edges.

mod levels;
mod place;

pub use crate::config::LayoutOptions;
pub use levels::assign_levels;
pub use place::{layout_trace, Layout, PositionedEdge, PositionedNode};
