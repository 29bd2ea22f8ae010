//! Yank state and the knobs that shape it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::{Edge, Identifier};

/// Which edges a yank removes from the live edge list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetachScope {
    /// Only the edge from the parent. The yanked vertex keeps its subtree
    /// and the whole subtree floats as a unit.
    #[default]
    ParentOnly,
    /// Every incident edge, including those to the vertex's own children.
    /// The child edges are replayed when the vertex is attached.
    AllIncident,
}

/// Side of the new parent a vertex is dropped on.
///
/// Recorded for the caller's benefit only: reattachment does not check BST
/// ordering against the new parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildSlot {
    Left,
    Right,
}

impl fmt::Display for ChildSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildSlot::Left => f.write_str("left"),
            ChildSlot::Right => f.write_str("right"),
        }
    }
}

impl FromStr for ChildSlot {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(ChildSlot::Left),
            "right" => Ok(ChildSlot::Right),
            other => Err(GraphError::InvalidInput(format!("unknown child slot {other:?}"))),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    pub detach_scope: DetachScope,
}

/// The at-most-one in-flight yank.
///
/// Re-adding `disconnected_edges` to the live edge list restores exactly the
/// edge set from before the yank.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YankState {
    pub yanked_vertex_id: Option<Identifier>,
    pub disconnected_edges: Vec<Edge>,
}

impl YankState {
    /// Check whether a yank is in progress.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.yanked_vertex_id.is_some()
    }

    /// The removed edge that pointed at the yanked vertex, if any.
    pub fn parent_edge(&self) -> Option<&Edge> {
        let yanked = self.yanked_vertex_id?;
        self.disconnected_edges.iter().find(|e| e.target == yanked)
    }

    /// Removed edges that leave the yanked vertex (its child links).
    pub fn child_edges(&self) -> impl Iterator<Item = &Edge> {
        let yanked = self.yanked_vertex_id;
        self.disconnected_edges
            .iter()
            .filter(move |e| Some(e.source) == yanked)
    }

    /// Reset to idle, handing back the removed edges.
    pub fn take(&mut self) -> Vec<Edge> {
        self.yanked_vertex_id = None;
        std::mem::take(&mut self.disconnected_edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: u32, source: u32, target: u32) -> Edge {
        Edge::new(Identifier(id), Identifier(source), Identifier(target))
    }

    #[test]
    fn test_child_slot_parse() {
        assert_eq!("left".parse::<ChildSlot>(), Ok(ChildSlot::Left));
        assert_eq!("right".parse::<ChildSlot>(), Ok(ChildSlot::Right));
        assert!("up".parse::<ChildSlot>().is_err());
        assert_eq!(ChildSlot::Left.to_string(), "left");
    }

    #[test]
    fn test_parent_and_child_edges() {
        let mut state = YankState {
            yanked_vertex_id: Some(Identifier(2)),
            disconnected_edges: vec![edge(10, 1, 2), edge(11, 2, 3), edge(12, 2, 4)],
        };
        assert!(state.is_active());
        assert_eq!(state.parent_edge().map(|e| e.id), Some(Identifier(10)));
        assert_eq!(state.child_edges().count(), 2);

        let edges = state.take();
        assert_eq!(edges.len(), 3);
        assert!(!state.is_active());
        assert!(state.disconnected_edges.is_empty());
    }

    #[test]
    fn test_idle_state() {
        let state = YankState::default();
        assert!(!state.is_active());
        assert!(state.parent_edge().is_none());
        assert_eq!(state.child_edges().count(), 0);
    }
}
