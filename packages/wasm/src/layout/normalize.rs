//! Fit simulated positions into the render volume.
//!
//! The larger bounding-box side is scaled to `2 * radius`, the box centre
//! is moved to the origin and the y axis is flipped (layout space grows
//! downward, render space grows upward). z is reset to 0.

use crate::graph::Vertex;

/// Normalise vertex positions in place and return the scale applied.
///
/// A degenerate box (all vertices coincident) is scaled against a side of 1
/// so the result is finite. Empty input is a no-op returning 1.
pub fn normalize(vertices: &mut [Vertex], radius: f32) -> f32 {
    let Some((min_x, min_y, max_x, max_y)) = bounds(vertices) else {
        return 1.0;
    };

    let span = (max_x - min_x).max(max_y - min_y);
    let span = if span > f32::EPSILON { span } else { 1.0 };
    let scale = 2.0 * radius / span;
    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;

    for v in vertices.iter_mut() {
        v.x = (v.x - cx) * scale;
        v.y = -(v.y - cy) * scale;
        v.z = 0.0;
    }
    scale
}

/// Bounding box (min_x, min_y, max_x, max_y) of the x/y positions.
pub fn bounds(vertices: &[Vertex]) -> Option<(f32, f32, f32, f32)> {
    if vertices.is_empty() {
        return None;
    }
    Some(vertices.iter().fold(
        (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        |(min_x, min_y, max_x, max_y), v| {
            (min_x.min(v.x), min_y.min(v.y), max_x.max(v.x), max_y.max(v.y))
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Identifier;

    fn at(id: u32, x: f32, y: f32) -> Vertex {
        let mut v = Vertex::new(Identifier(id), id as f64);
        v.x = x;
        v.y = y;
        v.z = 3.0;
        v
    }

    #[test]
    fn test_empty() {
        let mut vertices: Vec<Vertex> = Vec::new();
        assert_eq!(normalize(&mut vertices, 100.0), 1.0);
        assert_eq!(bounds(&vertices), None);
    }

    #[test]
    fn test_scale_center_and_flip() {
        // Box 400 wide, 200 tall, centred on (300, 200)
        let mut vertices = vec![at(0, 100.0, 100.0), at(1, 500.0, 300.0)];
        let scale = normalize(&mut vertices, 100.0);

        assert!((scale - 0.5).abs() < 1e-6);
        assert_eq!(vertices[0].position(), (-100.0, 50.0, 0.0));
        assert_eq!(vertices[1].position(), (100.0, -50.0, 0.0));
    }

    #[test]
    fn test_tall_box_uses_height() {
        let mut vertices = vec![at(0, 0.0, 0.0), at(1, 10.0, 40.0), at(2, 5.0, 20.0)];
        normalize(&mut vertices, 100.0);

        let (min_x, min_y, max_x, max_y) = bounds(&vertices).unwrap();
        assert!((max_y - min_y - 200.0).abs() < 1e-3);
        assert!((max_x - min_x - 50.0).abs() < 1e-3);
        // Top of layout space ends up at the top of render space
        assert!((vertices[0].y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_coincident_vertices() {
        let mut vertices = vec![at(0, 7.0, 7.0), at(1, 7.0, 7.0)];
        let scale = normalize(&mut vertices, 100.0);
        assert_eq!(scale, 200.0);
        for v in &vertices {
            assert_eq!(v.position(), (0.0, 0.0, 0.0));
        }
    }
}
