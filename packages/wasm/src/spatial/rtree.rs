//! R-tree based spatial index using the rstar crate.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::Identifier;

/// A vertex position in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexPoint {
    pub id: Identifier,
    pub x: f32,
    pub y: f32,
}

impl RTreeObject for VertexPoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for VertexPoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over the x/y plane of the render volume.
pub struct SpatialIndex {
    tree: RTree<VertexPoint>,
}

impl SpatialIndex {
    /// Bulk-load an index from (id, x, y) tuples.
    pub fn from_points(points: impl IntoIterator<Item = (Identifier, f32, f32)>) -> Self {
        let points: Vec<_> = points
            .into_iter()
            .map(|(id, x, y)| VertexPoint { id, x, y })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Nearest vertex to a point.
    pub fn nearest(&self, x: f32, y: f32) -> Option<Identifier> {
        self.tree.nearest_neighbor(&[x, y]).map(|p| p.id)
    }

    /// Nearest vertex no further than `max_distance` from a point.
    pub fn nearest_within(&self, x: f32, y: f32, max_distance: f32) -> Option<Identifier> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|p| p.distance_2(&[x, y]) <= max_distance_sq)
            .map(|p| p.id)
    }

    /// Number of indexed vertices.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SpatialIndex {
        SpatialIndex::from_points([
            (Identifier(0), 0.0, 0.0),
            (Identifier(1), 10.0, 10.0),
            (Identifier(2), 5.0, 5.0),
        ])
    }

    #[test]
    fn test_nearest() {
        let index = index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.nearest(0.0, 0.0), Some(Identifier(0)));
        assert_eq!(index.nearest(6.0, 6.0), Some(Identifier(2)));
        assert_eq!(index.nearest(11.0, 11.0), Some(Identifier(1)));
    }

    #[test]
    fn test_nearest_within() {
        let index = index();
        assert_eq!(index.nearest_within(1.0, 0.0, 2.0), Some(Identifier(0)));
        assert_eq!(index.nearest_within(-20.0, 0.0, 2.0), None);
    }

    #[test]
    fn test_empty() {
        let index = SpatialIndex::from_points(std::iter::empty());
        assert!(index.is_empty());
        assert_eq!(index.nearest(0.0, 0.0), None);
    }
}
