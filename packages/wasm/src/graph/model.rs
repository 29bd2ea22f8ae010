//! The `Graph` value: a vertex list plus an edge list.
//!
//! This is the unit passed between the tree builder, the layout engine and
//! the store. While a tree is fully attached the edges form a single rooted
//! tree; [`Graph::validate_tree`] checks exactly that.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::id::Identifier;
use super::topology::Topology;
use super::vertex::Vertex;
use crate::error::{GraphError, Result};

/// Vertices and directed parent→child edges. List order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Create a graph from its parts.
    pub fn new(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }

    /// Check whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Look up a vertex by id.
    pub fn vertex(&self, id: Identifier) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    /// Verify the rooted-tree invariant and return the root.
    ///
    /// Fails with [`GraphError::DanglingEdge`] if an edge points at a
    /// missing vertex, and with [`GraphError::InvalidTree`] for duplicate
    /// ids, multiple parents, more than one root or a cycle.
    pub fn validate_tree(&self) -> Result<Identifier> {
        let mut ids = HashSet::with_capacity(self.vertices.len());
        for vertex in &self.vertices {
            if !ids.insert(vertex.id) {
                return Err(GraphError::InvalidTree(format!(
                    "duplicate vertex {}",
                    vertex.id
                )));
            }
        }

        let mut pairs = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            for endpoint in [edge.source, edge.target] {
                if !ids.contains(&endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id,
                        missing: endpoint,
                    });
                }
            }
            if edge.source == edge.target {
                return Err(GraphError::InvalidTree(format!(
                    "self-loop on {}",
                    edge.source
                )));
            }
            if !pairs.insert((edge.source, edge.target)) {
                return Err(GraphError::InvalidTree(format!(
                    "parallel edges {} -> {}",
                    edge.source, edge.target
                )));
            }
        }

        let topology = Topology::from_graph(&self.vertices, &self.edges);
        if let Some(vertex) = self.vertices.iter().find(|v| topology.in_degree(v.id) > 1) {
            return Err(GraphError::InvalidTree(format!(
                "{} has more than one parent",
                vertex.id
            )));
        }
        if topology.is_cyclic() {
            return Err(GraphError::InvalidTree("edges contain a cycle".into()));
        }

        match topology.roots().as_slice() {
            [root] => Ok(*root),
            [] => Err(GraphError::InvalidTree("no root".into())),
            roots => Err(GraphError::InvalidTree(format!("{} roots", roots.len()))),
        }
    }

    /// Values in in-order (left subtree, node, right subtree).
    ///
    /// A child counts as "left" when its value is below its parent's; this
    /// mirrors how the builder placed it. Siblings on the same side are
    /// visited in ascending value order. For a freshly built tree the result
    /// is the sorted, de-duplicated key sequence.
    pub fn in_order_values(&self) -> Result<Vec<f64>> {
        let root = self.validate_tree()?;
        let topology = Topology::from_graph(&self.vertices, &self.edges);
        let values: HashMap<Identifier, f64> =
            self.vertices.iter().map(|v| (v.id, v.value)).collect();

        let mut out = Vec::with_capacity(self.vertices.len());
        let mut stack = vec![Step::Visit(root)];
        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Emit(value) => {
                    out.push(value);
                    continue;
                }
                Step::Visit(node) => node,
            };
            let value = values[&node];
            let mut children: Vec<(f64, Identifier)> = topology
                .children(node)
                .into_iter()
                .map(|c| (values[&c], c))
                .collect();
            children.sort_by(|a, b| a.0.total_cmp(&b.0));

            // Reverse push order so the stack pops in ascending value order
            let split = children.partition_point(|(v, _)| *v < value);
            stack.extend(children[split..].iter().rev().map(|&(_, c)| Step::Visit(c)));
            stack.push(Step::Emit(value));
            stack.extend(children[..split].iter().rev().map(|&(_, c)| Step::Visit(c)));
        }
        Ok(out)
    }
}

enum Step {
    Visit(Identifier),
    Emit(f64),
}
