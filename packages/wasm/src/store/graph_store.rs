//! GraphStore - the mutable tree a renderer draws and a gesture layer edits.
//!
//! The store owns the vertex and edge lists after layout and runs the
//! yank/reattach state machine:
//!
//! ```text
//! IDLE      --yank_vertex(v)------------------------> YANKED(v)
//! YANKED(v) --attach_vertex(t, slot) [can_attach_to]-> IDLE   (t -> v committed)
//! YANKED(v) --cancel_yank()-------------------------> IDLE   (edges restored)
//! YANKED(v) --yank_vertex(_)------------------------> YANKED(v)  (no-op)
//! IDLE      --attach_vertex / cancel_yank-----------> IDLE   (no-op)
//! ```
//!
//! `set_graph` resets to IDLE from any state. Invalid transitions are
//! silent no-ops returning `false`: they come from racing user input, not
//! from bugs.
//!
//! Every operation takes `&mut self` and completes before returning. A host
//! with real threads must route all mutations through one owner (or a
//! mutex); none of the read-modify-write sequences here are safe to
//! interleave.

use std::collections::HashSet;

use log::{debug, info};
use serde::Serialize;

use super::yank::{ChildSlot, DetachScope, StoreConfig, YankState};
use crate::error::{GraphError, Result};
use crate::graph::{Edge, Graph, Identifier, IdentifierAllocator, StyleHints, Topology, Vertex};
use crate::spatial::SpatialIndex;

/// An edge with both endpoints resolved, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSegment {
    pub edge: Identifier,
    pub from: (f32, f32, f32),
    pub to: (f32, f32, f32),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Process-local owner of the current graph and yank state.
pub struct GraphStore {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    yank: YankState,
    allocator: IdentifierAllocator,
    config: StoreConfig,
}

impl GraphStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store.
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_allocator(config, IdentifierAllocator::new())
    }

    /// Create an empty store drawing new edge ids from `allocator`.
    pub fn with_allocator(config: StoreConfig, allocator: IdentifierAllocator) -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            yank: YankState::default(),
            allocator,
            config,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Replace the graph wholesale and discard any in-progress yank.
    ///
    /// Every vertex and edge id in `graph` is reserved so edges created by
    /// later reattachments never collide with them.
    pub fn set_graph(&mut self, graph: Graph) {
        if let Some(v) = self.yank.yanked_vertex_id {
            debug!("set_graph discards yank of {v}");
        }
        self.yank = YankState::default();
        self.allocator.reset();
        for id in graph
            .vertices
            .iter()
            .map(|v| v.id)
            .chain(graph.edges.iter().map(|e| e.id))
        {
            self.allocator.reserve(id);
        }
        info!(
            "installed graph: {} vertices, {} edges",
            graph.vertices.len(),
            graph.edges.len()
        );
        self.vertices = graph.vertices;
        self.edges = graph.edges;
    }

    /// Current vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Live edges. Excludes edges held by an in-progress yank.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The yank state as a whole.
    pub fn yank_state(&self) -> &YankState {
        &self.yank
    }

    /// The vertex currently yanked, if any.
    pub fn yanked_vertex_id(&self) -> Option<Identifier> {
        self.yank.yanked_vertex_id
    }

    /// Edges removed by the current yank.
    pub fn disconnected_edges(&self) -> &[Edge] {
        &self.yank.disconnected_edges
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Snapshot of the live graph.
    pub fn graph(&self) -> Graph {
        Graph::new(self.vertices.clone(), self.edges.clone())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look up a vertex.
    pub fn get_vertex(&self, id: Identifier) -> Result<&Vertex> {
        self.vertices
            .iter()
            .find(|v| v.id == id)
            .ok_or(GraphError::VertexNotFound(id))
    }

    /// Live edges with `id` as source or target.
    pub fn get_edges_for_vertex(&self, id: Identifier) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.touches(id)).collect()
    }

    /// Resolve both endpoints of an edge.
    ///
    /// A missing endpoint means the tree invariant has been broken and is
    /// reported as [`GraphError::DanglingEdge`].
    pub fn resolve_edge(&self, edge: &Edge) -> Result<(&Vertex, &Vertex)> {
        let lookup = |id: Identifier| {
            self.vertices
                .iter()
                .find(|v| v.id == id)
                .ok_or(GraphError::DanglingEdge {
                    edge: edge.id,
                    missing: id,
                })
        };
        Ok((lookup(edge.source)?, lookup(edge.target)?))
    }

    /// Every live edge resolved to endpoint positions.
    pub fn edge_segments(&self) -> Result<Vec<EdgeSegment>> {
        self.edges
            .iter()
            .map(|edge| -> Result<EdgeSegment> {
                let (from, to) = self.resolve_edge(edge)?;
                Ok(EdgeSegment {
                    edge: edge.id,
                    from: from.position(),
                    to: to.position(),
                    color: edge.color.clone(),
                })
            })
            .collect()
    }

    // =========================================================================
    // Position and metadata mutation
    // =========================================================================

    /// Overwrite a vertex position. `z` keeps its value when `None`.
    ///
    /// Returns false if the id is unknown.
    pub fn set_vertex_position(&mut self, id: Identifier, x: f32, y: f32, z: Option<f32>) -> bool {
        match self.vertex_mut(id) {
            Some(v) => {
                v.x = x;
                v.y = y;
                v.z = z.unwrap_or(v.z);
                true
            }
            None => false,
        }
    }

    /// Like [`set_vertex_position`](Self::set_vertex_position) but clamps
    /// x and y into `[-radius, radius]`.
    ///
    /// Returns false without moving anything if `radius`, `x` or `y` is
    /// not finite.
    pub fn set_vertex_position_clamped(
        &mut self,
        id: Identifier,
        x: f32,
        y: f32,
        z: Option<f32>,
        radius: f32,
    ) -> bool {
        if !(radius.is_finite() && x.is_finite() && y.is_finite()) {
            debug!("clamped move of {id} ignored: non-finite input");
            return false;
        }
        let radius = radius.abs();
        self.set_vertex_position(
            id,
            x.clamp(-radius, radius),
            y.clamp(-radius, radius),
            z,
        )
    }

    /// Move a vertex by a delta. A missing `dz` means no z movement.
    pub fn translate_vertex(&mut self, id: Identifier, dx: f32, dy: f32, dz: Option<f32>) -> bool {
        match self.vertex_mut(id) {
            Some(v) => {
                v.x += dx;
                v.y += dy;
                v.z += dz.unwrap_or(0.0);
                true
            }
            None => false,
        }
    }

    /// Flip the red flag of a vertex. Purely cosmetic; nothing rebalances.
    pub fn toggle_red(&mut self, id: Identifier) -> bool {
        match self.vertex_mut(id) {
            Some(v) => {
                v.red = !v.red;
                true
            }
            None => false,
        }
    }

    /// Replace the style hints of a vertex.
    pub fn set_style_hints(&mut self, id: Identifier, hints: Option<StyleHints>) -> bool {
        match self.vertex_mut(id) {
            Some(v) => {
                v.style_hints = hints;
                true
            }
            None => false,
        }
    }

    fn vertex_mut(&mut self, id: Identifier) -> Option<&mut Vertex> {
        self.vertices.iter_mut().find(|v| v.id == id)
    }

    // =========================================================================
    // Yank / reattach
    // =========================================================================

    /// Detach `id` from its parent and start floating it.
    ///
    /// No-op (returns false) while another yank is active or if `id` is
    /// unknown.
    pub fn yank_vertex(&mut self, id: Identifier) -> bool {
        if let Some(current) = self.yank.yanked_vertex_id {
            debug!("yank {id} ignored: {current} is already yanked");
            return false;
        }
        if self.get_vertex(id).is_err() {
            debug!("yank {id} ignored: no such vertex");
            return false;
        }

        let scope = self.config.detach_scope;
        let (detached, live): (Vec<Edge>, Vec<Edge>) =
            std::mem::take(&mut self.edges)
                .into_iter()
                .partition(|e| match scope {
                    DetachScope::ParentOnly => e.target == id,
                    DetachScope::AllIncident => e.touches(id),
                });

        debug!("yanked {id}, detached {} edge(s)", detached.len());
        self.edges = live;
        self.yank = YankState {
            yanked_vertex_id: Some(id),
            disconnected_edges: detached,
        };
        true
    }

    /// The yanked vertex plus everything below it.
    ///
    /// Walks the live edges together with the yanked vertex's own detached
    /// child edges, so the answer is the same under either detach scope.
    /// Empty when idle.
    pub fn yanked_subtree(&self) -> HashSet<Identifier> {
        let Some(yanked) = self.yank.yanked_vertex_id else {
            return HashSet::new();
        };
        Topology::from_edges(self.edges.iter().chain(self.yank.child_edges())).subtree(yanked)
    }

    /// True for the yanked vertex and its descendants.
    pub fn is_yanked(&self, id: Identifier) -> bool {
        self.yanked_subtree().contains(&id)
    }

    /// True if a yank is active and `id` is a vertex outside the yanked
    /// subtree. Attaching inside the subtree would close a cycle.
    pub fn can_attach_to(&self, id: Identifier) -> bool {
        if !self.yank.is_active() || self.get_vertex(id).is_err() {
            return false;
        }
        !self.yanked_subtree().contains(&id)
    }

    /// Commit the yanked vertex under `target`.
    ///
    /// Adds a fresh edge `target -> yanked` (keeping the old parent edge's
    /// colour) and replays any detached child edges. The old parent edge is
    /// dropped. `slot` is not checked against BST ordering.
    ///
    /// Returns `Ok(false)` without changing anything when idle or when
    /// `target` fails [`can_attach_to`](Self::can_attach_to). Fails only if
    /// no edge id can be allocated, in which case state is untouched.
    pub fn attach_vertex(&mut self, target: Identifier, slot: ChildSlot) -> Result<bool> {
        let Some(yanked) = self.yank.yanked_vertex_id else {
            debug!("attach to {target} ignored: nothing yanked");
            return Ok(false);
        };
        if !self.can_attach_to(target) {
            debug!("attach of {yanked} to {target} rejected");
            return Ok(false);
        }

        let edge_id = self.allocator.generate()?;
        let color = self.yank.parent_edge().and_then(|e| e.color.clone());
        let detached = self.yank.take();

        self.edges
            .extend(detached.into_iter().filter(|e| e.source == yanked));
        self.edges.push(Edge {
            id: edge_id,
            source: target,
            target: yanked,
            color,
        });

        debug!("attached {yanked} under {target} ({slot})");
        Ok(true)
    }

    /// Put every detached edge back and return to idle.
    ///
    /// Returns false if nothing was yanked.
    pub fn cancel_yank(&mut self) -> bool {
        let Some(yanked) = self.yank.yanked_vertex_id else {
            return false;
        };
        let restored = self.yank.take();
        debug!("cancelled yank of {yanked}, restored {} edge(s)", restored.len());
        self.edges.extend(restored);
        true
    }

    /// Closest vertex to (x, y) that the yanked vertex could attach to,
    /// within `max_distance`.
    pub fn nearest_attach_target(&self, x: f32, y: f32, max_distance: f32) -> Option<Identifier> {
        if !self.yank.is_active() {
            return None;
        }
        let floating = self.yanked_subtree();
        let index = SpatialIndex::from_points(
            self.vertices
                .iter()
                .filter(|v| !floating.contains(&v.id))
                .map(|v| (v.id, v.x, v.y)),
        );
        index.nearest_within(x, y, max_distance)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
