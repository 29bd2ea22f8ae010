//! Unbalanced BST over an arena keyed by [`Identifier`].
//!
//! Duplicate keys are dropped on insert. That is the intended policy: the
//! rendered tree shows each distinct key once.
//!
//! # Flattening
//!
//! The graph is produced by a pre-order walk (node, then left, then right).
//! Vertices are emitted in walk order, and for each node its left edge is
//! emitted before its right edge, so edges follow the same order.

use std::collections::HashMap;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{GraphError, Result};
use crate::graph::{Edge, Graph, Identifier, IdentifierAllocator, Vertex};

/// A node of the search tree. Children are referenced by id.
#[derive(Debug, Clone)]
struct TreeNode {
    value: f64,
    left: Option<Identifier>,
    right: Option<Identifier>,
    red: bool,
}

/// Binary search tree built by repeated insertion.
pub struct SearchTree {
    nodes: HashMap<Identifier, TreeNode>,
    root: Identifier,
}

impl SearchTree {
    /// Build a tree whose root is the first key.
    ///
    /// Fails with [`GraphError::InvalidInput`] on an empty sequence or a
    /// non-finite key.
    pub fn from_values(values: &[f64], allocator: &mut IdentifierAllocator) -> Result<Self> {
        let (&first, rest) = values
            .split_first()
            .ok_or_else(|| GraphError::InvalidInput("key sequence is empty".into()))?;
        check_key(first)?;

        let root = allocator.generate()?;
        let mut nodes = HashMap::with_capacity(values.len());
        nodes.insert(root, TreeNode::leaf(first));

        let mut tree = Self { nodes, root };
        for &value in rest {
            tree.insert(value, allocator)?;
        }
        Ok(tree)
    }

    /// Insert a key. Returns false if an equal key is already present.
    pub fn insert(&mut self, value: f64, allocator: &mut IdentifierAllocator) -> Result<bool> {
        check_key(value)?;

        let mut current = self.root;
        loop {
            let node = &self.nodes[&current];
            let slot = if value < node.value {
                node.left
            } else if value > node.value {
                node.right
            } else {
                debug!("dropping duplicate key {value}");
                return Ok(false);
            };

            match slot {
                Some(next) => current = next,
                None => {
                    let id = allocator.generate()?;
                    self.nodes.insert(id, TreeNode::leaf(value));
                    // Lookup cannot fail: `current` came from the arena
                    if let Some(parent) = self.nodes.get_mut(&current) {
                        if value < parent.value {
                            parent.left = Some(id);
                        } else {
                            parent.right = Some(id);
                        }
                    }
                    return Ok(true);
                }
            }
        }
    }

    /// Root identifier.
    pub fn root(&self) -> Identifier {
        self.root
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order walk: node, left subtree, right subtree.
    pub fn preorder(&self) -> Vec<Identifier> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let node = &self.nodes[&id];
            // Right pushed first so left is visited first
            stack.extend(node.right);
            stack.extend(node.left);
        }
        order
    }

    /// Flatten into vertices and parent→child edges.
    pub fn to_graph(&self, allocator: &mut IdentifierAllocator) -> Result<Graph> {
        let order = self.preorder();
        let mut vertices = Vec::with_capacity(order.len());
        let mut edges = Vec::with_capacity(order.len().saturating_sub(1));

        for &id in &order {
            let node = &self.nodes[&id];
            let mut vertex = Vertex::new(id, node.value);
            vertex.red = node.red;
            vertices.push(vertex);
        }
        for &id in &order {
            let node = &self.nodes[&id];
            for child in [node.left, node.right].into_iter().flatten() {
                edges.push(Edge::new(allocator.generate()?, id, child));
            }
        }

        Ok(Graph::new(vertices, edges))
    }
}

impl TreeNode {
    fn leaf(value: f64) -> Self {
        Self {
            value,
            left: None,
            right: None,
            red: false,
        }
    }
}

fn check_key(value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GraphError::InvalidInput(format!("key {value} is not finite")))
    }
}

/// Builds graphs from key sequences, drawing every vertex and edge id from
/// one allocator so ids never collide across builds.
pub struct TreeBuilder {
    allocator: IdentifierAllocator,
}

impl TreeBuilder {
    /// Create a builder with a fresh allocator.
    pub fn new() -> Self {
        Self::with_allocator(IdentifierAllocator::new())
    }

    /// Create a builder around an existing allocator.
    pub fn with_allocator(allocator: IdentifierAllocator) -> Self {
        Self { allocator }
    }

    /// Build the BST for `values` and flatten it into a [`Graph`].
    pub fn build(&mut self, values: &[f64]) -> Result<Graph> {
        let tree = SearchTree::from_values(values, &mut self.allocator)?;
        let graph = tree.to_graph(&mut self.allocator)?;
        debug!(
            "built tree: {} keys in, {} vertices, {} edges",
            values.len(),
            graph.vertices.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    /// Forget every id issued so far. Graphs built earlier may then share
    /// ids with later ones.
    pub fn reset(&mut self) {
        self.allocator.reset();
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The keys `1..=n` in random order.
pub fn shuffled_range(n: usize, rng: &mut impl Rng) -> Vec<f64> {
    let mut values: Vec<f64> = (1..=n).map(|i| i as f64).collect();
    values.shuffle(rng);
    values
}
