//! Spatial layout: force relaxation followed by normalisation.
//!
//! [`LayoutEngine::layout`] runs a bounded, synchronous simulation and then
//! fits the result into a square of half-extent `radius` centred on the
//! origin with y pointing up. Edges are never modified.
//!
//! The computation has no suspension points. Callers that move it off the
//! UI thread must wait for the whole result; partial layouts are not
//! meaningful.

mod config;
mod force;
mod normalize;

pub use config::LayoutConfig;
pub use force::ForceSimulation;
pub use normalize::{bounds, normalize};

use std::collections::HashMap;

use log::{info, warn};

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Identifier};

/// Positions the vertices of a graph.
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out `graph` on a `width` x `height` canvas and normalise.
    ///
    /// An empty graph comes back unchanged. An edge whose endpoint is not
    /// in the vertex list fails with [`GraphError::DanglingEdge`].
    pub fn layout(&self, mut graph: Graph, width: f32, height: f32) -> Result<Graph> {
        if graph.is_empty() {
            return Ok(graph);
        }

        let slots: HashMap<Identifier, usize> = graph
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id, i))
            .collect();

        let links = graph
            .edges
            .iter()
            .map(|edge| -> Result<(usize, usize)> {
                let slot = |id: Identifier| {
                    slots.get(&id).copied().ok_or(GraphError::DanglingEdge {
                        edge: edge.id,
                        missing: id,
                    })
                };
                Ok((slot(edge.source)?, slot(edge.target)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let positions = ForceSimulation::new(
            graph.vertices.len(),
            &links,
            width as f64,
            height as f64,
            &self.config,
        )
        .run();

        for (vertex, (x, y)) in graph.vertices.iter_mut().zip(positions) {
            vertex.x = x as f32;
            vertex.y = y as f32;
            vertex.z = 0.0;
        }

        let scale = normalize(&mut graph.vertices, self.config.radius);
        if graph.vertices.len() > 1 && scale >= 2.0 * self.config.radius {
            warn!("layout collapsed to a point; {} vertices coincide", graph.vertices.len());
        }
        info!(
            "laid out {} vertices / {} edges (scale {scale:.3})",
            graph.vertices.len(),
            graph.edges.len()
        );
        Ok(graph)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, IdentifierAllocator, Vertex};
    use crate::tree::TreeBuilder;

    fn engine(seed: u64) -> LayoutEngine {
        LayoutEngine::new(LayoutConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    fn sample_graph() -> Graph {
        TreeBuilder::with_allocator(IdentifierAllocator::seeded(11))
            .build(&[5.0, 3.0, 8.0, 1.0, 4.0, 7.0, 9.0])
            .unwrap()
    }

    #[test]
    fn test_empty_graph_is_noop() {
        let out = engine(1).layout(Graph::default(), 400.0, 800.0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_bbox_spans_diameter() {
        let out = engine(1).layout(sample_graph(), 400.0, 800.0).unwrap();
        let (min_x, min_y, max_x, max_y) = bounds(&out.vertices).unwrap();
        let span = (max_x - min_x).max(max_y - min_y);
        assert!((span - 200.0).abs() < 1e-2, "span = {span}");

        // Centred on the origin
        assert!(((min_x + max_x) / 2.0).abs() < 1e-2);
        assert!(((min_y + max_y) / 2.0).abs() < 1e-2);

        for v in &out.vertices {
            assert!(v.x.abs() <= 100.0 + 1e-2 && v.y.abs() <= 100.0 + 1e-2);
            assert_eq!(v.z, 0.0);
        }
    }

    #[test]
    fn test_edges_untouched() {
        let graph = sample_graph();
        let edges = graph.edges.clone();
        let out = engine(2).layout(graph, 400.0, 800.0).unwrap();
        assert_eq!(out.edges, edges);
    }

    #[test]
    fn test_seeded_layout_reproducible() {
        let a = engine(3).layout(sample_graph(), 400.0, 800.0).unwrap();
        let b = engine(3).layout(sample_graph(), 400.0, 800.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_vertex_lands_on_origin() {
        let graph = Graph::new(vec![Vertex::new(Identifier(1), 1.0)], Vec::new());
        let out = engine(1).layout(graph, 400.0, 800.0).unwrap();
        assert_eq!(out.vertices[0].position(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let graph = Graph::new(
            vec![Vertex::new(Identifier(1), 1.0)],
            vec![Edge::new(Identifier(9), Identifier(1), Identifier(2))],
        );
        assert_eq!(
            engine(1).layout(graph, 400.0, 800.0),
            Err(GraphError::DanglingEdge {
                edge: Identifier(9),
                missing: Identifier(2),
            })
        );
    }
}
