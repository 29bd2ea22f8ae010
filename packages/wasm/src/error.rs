//! Error taxonomy for tree construction, layout and store queries.
//!
//! State-machine misuse (a second yank, attaching with nothing yanked) is
//! not represented here. The store treats those calls as no-ops.

use thiserror::Error;

use crate::graph::Identifier;

/// Errors surfaced by the core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// The key sequence handed to the tree builder cannot produce a tree.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The identifier allocator could not find an unused value.
    #[error("identifier space exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of samples drawn before giving up.
        attempts: u32,
    },

    /// No vertex with the given identifier exists in the store.
    #[error("vertex {0} not found")]
    VertexNotFound(Identifier),

    /// An edge references a vertex that does not exist.
    ///
    /// This means the tree invariant has been broken and points at a bug
    /// in whoever mutated the edge list.
    #[error("edge {edge} references missing vertex {missing}")]
    DanglingEdge {
        /// The malformed edge.
        edge: Identifier,
        /// The endpoint that could not be resolved.
        missing: Identifier,
    },

    /// The edge list does not form a single rooted tree.
    #[error("not a tree: {0}")]
    InvalidTree(String),

    /// A value crossing the JS boundary could not be (de)serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_wasm_bindgen::Error> for GraphError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        GraphError::Serialization(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;
