//! Reachability view of an edge list.
//!
//! Builds a petgraph `StableGraph` keyed by [`Identifier`] so that subtree,
//! root and cycle queries become plain graph-reachability questions instead
//! of pointer walks.

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::Dfs;
use petgraph::{Directed, Direction};

use super::edge::Edge;
use super::id::Identifier;
use super::vertex::Vertex;

/// Directed parent→child topology. Node weights are vertex ids, edge
/// weights are edge ids.
pub struct Topology {
    graph: StableGraph<Identifier, Identifier, Directed>,
    index: HashMap<Identifier, NodeIndex>,
}

impl Topology {
    /// Build from edges only. Vertices without edges are absent.
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut topology = Self {
            graph: StableGraph::new(),
            index: HashMap::new(),
        };
        for edge in edges {
            topology.add_edge(edge);
        }
        topology
    }

    /// Build from a vertex list plus edges, keeping isolated vertices.
    pub fn from_graph(vertices: &[Vertex], edges: &[Edge]) -> Self {
        let mut topology = Self {
            graph: StableGraph::with_capacity(vertices.len(), edges.len()),
            index: HashMap::with_capacity(vertices.len()),
        };
        for vertex in vertices {
            topology.node(vertex.id);
        }
        for edge in edges {
            topology.add_edge(edge);
        }
        topology
    }

    fn node(&mut self, id: Identifier) -> NodeIndex {
        if let Some(&index) = self.index.get(&id) {
            return index;
        }
        let index = self.graph.add_node(id);
        self.index.insert(id, index);
        index
    }

    fn add_edge(&mut self, edge: &Edge) {
        let source = self.node(edge.source);
        let target = self.node(edge.target);
        self.graph.add_edge(source, target, edge.id);
    }

    /// Every vertex reachable from `root`, including `root` itself.
    ///
    /// Returns just `root` if it has no outgoing edges or is unknown.
    pub fn subtree(&self, root: Identifier) -> HashSet<Identifier> {
        let mut reached = HashSet::new();
        reached.insert(root);
        if let Some(&start) = self.index.get(&root) {
            let mut dfs = Dfs::new(&self.graph, start);
            while let Some(nx) = dfs.next(&self.graph) {
                reached.insert(self.graph[nx]);
            }
        }
        reached
    }

    /// Direct children of `id`. Order is unspecified.
    pub fn children(&self, id: Identifier) -> Vec<Identifier> {
        let Some(&index) = self.index.get(&id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(index, Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect()
    }

    /// Number of incoming edges of `id`.
    pub fn in_degree(&self, id: Identifier) -> usize {
        self.index
            .get(&id)
            .map(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Vertices with no incoming edge.
    pub fn roots(&self) -> Vec<Identifier> {
        self.graph
            .node_indices()
            .filter(|&n| {
                self.graph
                    .neighbors_directed(n, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|n| self.graph[n])
            .collect()
    }

    /// Check whether the edge relation contains a directed cycle.
    ///
    /// Uses the iterative topological sort so long chains cannot exhaust
    /// the stack.
    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::toposort(&self.graph, None).is_err()
    }

    /// Number of vertices in the topology.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: u32, source: u32, target: u32) -> Edge {
        Edge::new(Identifier(id), Identifier(source), Identifier(target))
    }

    #[test]
    fn test_subtree() {
        // 1 → 2, 1 → 3, 2 → 4
        let edges = [edge(10, 1, 2), edge(11, 1, 3), edge(12, 2, 4)];
        let topology = Topology::from_edges(&edges);

        let sub = topology.subtree(Identifier(2));
        assert_eq!(sub.len(), 2);
        assert!(sub.contains(&Identifier(2)));
        assert!(sub.contains(&Identifier(4)));

        assert_eq!(topology.subtree(Identifier(1)).len(), 4);
        // Unknown id still counts as its own subtree
        assert_eq!(topology.subtree(Identifier(99)).len(), 1);
    }

    #[test]
    fn test_children() {
        let edges = [edge(10, 1, 2), edge(11, 1, 3), edge(12, 1, 4)];
        let topology = Topology::from_edges(&edges);
        let mut children = topology.children(Identifier(1));
        children.sort();
        assert_eq!(children, vec![Identifier(2), Identifier(3), Identifier(4)]);
        assert!(topology.children(Identifier(2)).is_empty());
    }

    #[test]
    fn test_roots_and_in_degree() {
        let vertices = [
            Vertex::new(Identifier(1), 1.0),
            Vertex::new(Identifier(2), 2.0),
            Vertex::new(Identifier(5), 5.0),
        ];
        let edges = [edge(10, 1, 2)];
        let topology = Topology::from_graph(&vertices, &edges);

        let mut roots = topology.roots();
        roots.sort();
        assert_eq!(roots, vec![Identifier(1), Identifier(5)]);
        assert_eq!(topology.in_degree(Identifier(2)), 1);
        assert_eq!(topology.in_degree(Identifier(1)), 0);
        assert_eq!(topology.node_count(), 3);
    }

    #[test]
    fn test_cycle_detection() {
        let acyclic = [edge(10, 1, 2), edge(11, 2, 3)];
        assert!(!Topology::from_edges(&acyclic).is_cyclic());

        let cyclic = [edge(10, 1, 2), edge(11, 2, 3), edge(12, 3, 1)];
        assert!(Topology::from_edges(&cyclic).is_cyclic());

        let self_loop = [edge(10, 1, 1)];
        assert!(Topology::from_edges(&self_loop).is_cyclic());
    }

    #[test]
    fn test_long_chain_cycle_check() {
        let chain: Vec<Edge> = (0..50_000).map(|i| edge(i, i, i + 1)).collect();
        let topology = Topology::from_edges(&chain);
        assert!(!topology.is_cyclic());
        assert_eq!(topology.subtree(Identifier(0)).len(), 50_001);
    }
}
