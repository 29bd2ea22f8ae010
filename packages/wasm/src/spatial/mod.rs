//! Spatial indexing for drop-target picking.
//!
//! An R-tree over vertex positions answers "which vertex is under (or
//! nearest to) this point" when a yanked vertex is released.

mod rtree;

pub use rtree::SpatialIndex;
