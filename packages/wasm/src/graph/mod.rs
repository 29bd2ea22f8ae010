//! Graph data structures.
//!
//! Vertices and edges are plain values keyed by [`Identifier`]. Edges store
//! endpoint ids only, and reachability questions go through [`Topology`],
//! a petgraph view rebuilt from the edge list on demand.

mod edge;
mod id;
mod model;
mod topology;
mod vertex;

pub use edge::Edge;
pub use id::{Identifier, IdentifierAllocator};
pub use model::Graph;
pub use topology::Topology;
pub use vertex::{StyleHints, Vertex};
