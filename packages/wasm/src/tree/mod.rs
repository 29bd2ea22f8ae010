//! Binary search tree construction.
//!
//! Keys are inserted in the order given into a plain, unbalanced BST and the
//! result is flattened into a [`Graph`](crate::graph::Graph).

mod builder;

pub use builder::{SearchTree, TreeBuilder, shuffled_range};
