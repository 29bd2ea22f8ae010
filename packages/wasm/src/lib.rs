//! YankTree - WASM Module
//!
//! This module provides the non-visual engine behind the YankTree editor:
//! build a binary search tree from a list of keys, lay it out with a force
//! simulation, and restructure it by yanking subtrees loose and reattaching
//! them elsewhere. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Vertex/edge value types, identifiers, petgraph topology view
//! - `tree`: BST construction and flattening into a graph
//! - `layout`: Force relaxation and normalisation into the render volume
//! - `store`: Mutable graph state and the yank/reattach state machine
//! - `spatial`: R-tree index for drop-target picking

use js_sys::Float32Array;
use log::{Level, info};
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod layout;
pub mod spatial;
pub mod store;
pub mod tree;

pub use error::GraphError;

use graph::{Identifier, StyleHints};
use layout::{LayoutConfig, LayoutEngine};
use store::{ChildSlot, DetachScope, GraphStore, StoreConfig};
use tree::TreeBuilder;

/// Initialize logging and the panic hook.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
    info!("yanktree initialized");
}

/// Main entry point for the tree editor.
///
/// Wraps a [`GraphStore`] and the builder that feeds it, and provides the
/// public API exposed to JavaScript.
#[wasm_bindgen]
pub struct YankTreeWasm {
    builder: TreeBuilder,
    store: GraphStore,
}

#[wasm_bindgen]
impl YankTreeWasm {
    /// Create an editor that detaches only the parent edge on yank.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            builder: TreeBuilder::new(),
            store: GraphStore::new(),
        }
    }

    /// Create an editor with a store configuration object
    /// (`{ detachScope: "parentOnly" | "allIncident" }`).
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<YankTreeWasm, JsError> {
        let config: StoreConfig = if config.is_undefined() || config.is_null() {
            StoreConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(GraphError::from)?
        };
        Ok(Self {
            builder: TreeBuilder::new(),
            store: GraphStore::with_config(config),
        })
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Build a tree from `values`, lay it out on a `width` x `height`
    /// canvas and install it, discarding any previous graph and yank.
    ///
    /// `layout_config` is an optional partial `LayoutConfig` object.
    #[wasm_bindgen(js_name = buildTree)]
    pub fn build_tree(
        &mut self,
        values: &[f64],
        width: f32,
        height: f32,
        layout_config: JsValue,
    ) -> Result<(), JsError> {
        let config: LayoutConfig = if layout_config.is_undefined() || layout_config.is_null() {
            LayoutConfig::default()
        } else {
            serde_wasm_bindgen::from_value(layout_config).map_err(GraphError::from)?
        };

        // The previous graph is discarded below, so its ids can be reused
        self.builder.reset();
        let graph = self.builder.build(values)?;
        let graph = LayoutEngine::new(config).layout(graph, width, height)?;
        self.store.set_graph(graph);
        Ok(())
    }

    // =========================================================================
    // State Access
    // =========================================================================

    /// All vertices as an array of `{ id, value, x, y, z, red, styleHints? }`.
    pub fn vertices(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.store.vertices()).map_err(GraphError::from)?)
    }

    /// Live edges as an array of `{ id, source, target, color? }`.
    pub fn edges(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.store.edges()).map_err(GraphError::from)?)
    }

    /// `{ yankedVertexId, disconnectedEdges }`.
    #[wasm_bindgen(js_name = yankState)]
    pub fn yank_state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.store.yank_state()).map_err(GraphError::from)?)
    }

    /// Live edges resolved to endpoint positions.
    ///
    /// Throws if an edge references a missing vertex.
    #[wasm_bindgen(js_name = edgeSegments)]
    pub fn edge_segments(&self) -> Result<JsValue, JsError> {
        let segments = self.store.edge_segments()?;
        Ok(serde_wasm_bindgen::to_value(&segments).map_err(GraphError::from)?)
    }

    /// Look up one vertex. Throws if the id is unknown.
    #[wasm_bindgen(js_name = getVertex)]
    pub fn get_vertex(&self, id: u32) -> Result<JsValue, JsError> {
        let vertex = self.store.get_vertex(Identifier(id))?;
        Ok(serde_wasm_bindgen::to_value(vertex).map_err(GraphError::from)?)
    }

    /// Interleaved positions [x0, y0, z0, x1, y1, z1, ...] in vertex order.
    pub fn positions(&self) -> Float32Array {
        let positions: Vec<f32> = self
            .store
            .vertices()
            .iter()
            .flat_map(|v| [v.x, v.y, v.z])
            .collect();
        Float32Array::from(&positions[..])
    }

    /// The yanked vertex id, if any.
    #[wasm_bindgen(js_name = yankedVertexId)]
    pub fn yanked_vertex_id(&self) -> Option<u32> {
        self.store.yanked_vertex_id().map(Identifier::raw)
    }

    // =========================================================================
    // Vertex Mutation
    // =========================================================================

    /// Overwrite a vertex position. Returns false if the id is unknown.
    #[wasm_bindgen(js_name = setVertexPosition)]
    pub fn set_vertex_position(&mut self, id: u32, x: f32, y: f32, z: Option<f32>) -> bool {
        self.store.set_vertex_position(Identifier(id), x, y, z)
    }

    /// Overwrite a vertex position, clamped to `[-radius, radius]`.
    #[wasm_bindgen(js_name = setVertexPositionClamped)]
    pub fn set_vertex_position_clamped(
        &mut self,
        id: u32,
        x: f32,
        y: f32,
        z: Option<f32>,
        radius: f32,
    ) -> bool {
        self.store
            .set_vertex_position_clamped(Identifier(id), x, y, z, radius)
    }

    /// Move a vertex by a delta.
    #[wasm_bindgen(js_name = translateVertex)]
    pub fn translate_vertex(&mut self, id: u32, dx: f32, dy: f32, dz: Option<f32>) -> bool {
        self.store.translate_vertex(Identifier(id), dx, dy, dz)
    }

    /// Flip a vertex's red flag.
    #[wasm_bindgen(js_name = toggleRed)]
    pub fn toggle_red(&mut self, id: u32) -> bool {
        self.store.toggle_red(Identifier(id))
    }

    /// Replace a vertex's style hints with `{ nodeColor?, textColor? }`.
    /// `undefined` or `null` clears them. Returns false if the id is unknown.
    #[wasm_bindgen(js_name = setStyleHints)]
    pub fn set_style_hints(&mut self, id: u32, hints: JsValue) -> Result<bool, JsError> {
        let hints: Option<StyleHints> = if hints.is_undefined() || hints.is_null() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value(hints).map_err(GraphError::from)?)
        };
        Ok(self.store.set_style_hints(Identifier(id), hints))
    }

    // =========================================================================
    // Yank / Reattach
    // =========================================================================

    /// Start floating a vertex. No-op while another yank is active.
    #[wasm_bindgen(js_name = yankVertex)]
    pub fn yank_vertex(&mut self, id: u32) -> bool {
        self.store.yank_vertex(Identifier(id))
    }

    /// Whether a vertex is the yanked vertex or below it.
    #[wasm_bindgen(js_name = isYanked)]
    pub fn is_yanked(&self, id: u32) -> bool {
        self.store.is_yanked(Identifier(id))
    }

    /// Whether the yanked vertex may be attached under `id`.
    #[wasm_bindgen(js_name = canAttachTo)]
    pub fn can_attach_to(&self, id: u32) -> bool {
        self.store.can_attach_to(Identifier(id))
    }

    /// Attach the yanked vertex under `target` on the given side
    /// (`"left"` or `"right"`). Returns false when nothing happened.
    #[wasm_bindgen(js_name = attachVertex)]
    pub fn attach_vertex(&mut self, target: u32, slot: &str) -> Result<bool, JsError> {
        let slot: ChildSlot = slot.parse()?;
        Ok(self.store.attach_vertex(Identifier(target), slot)?)
    }

    /// Restore the detached edges. Returns false if nothing was yanked.
    #[wasm_bindgen(js_name = cancelYank)]
    pub fn cancel_yank(&mut self) -> bool {
        self.store.cancel_yank()
    }

    /// Closest attachable vertex within `max_distance` of (x, y).
    #[wasm_bindgen(js_name = nearestAttachTarget)]
    pub fn nearest_attach_target(&self, x: f32, y: f32, max_distance: f32) -> Option<u32> {
        self.store
            .nearest_attach_target(x, y, max_distance)
            .map(Identifier::raw)
    }

    /// Whether yanks detach child edges as well as the parent edge.
    #[wasm_bindgen(js_name = detachesChildren)]
    pub fn detaches_children(&self) -> bool {
        self.store.config().detach_scope == DetachScope::AllIncident
    }
}

impl Default for YankTreeWasm {
    fn default() -> Self {
        Self::new()
    }
}
