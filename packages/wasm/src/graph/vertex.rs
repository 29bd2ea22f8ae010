//! Vertex type.
//!
//! Each vertex has:
//! - A stable identifier (immutable once created)
//! - The numeric key it was built from (immutable)
//! - A mutable position (x, y, z) set by layout and by dragging
//! - Optional style hints and a `red` flag kept as metadata for renderers

use serde::{Deserialize, Serialize};

use super::id::Identifier;

/// Rendering hints attached to a vertex. The core never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleHints {
    /// Fill colour of the vertex body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_color: Option<String>,
    /// Colour of the value label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// A node of the rendered tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    pub id: Identifier,
    pub value: f64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Red/black colouring flag. Stored only; no balancing is performed.
    #[serde(default)]
    pub red: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_hints: Option<StyleHints>,
}

impl Vertex {
    /// Create a vertex at the origin.
    pub fn new(id: Identifier, value: f64) -> Self {
        Self {
            id,
            value,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            red: false,
            style_hints: None,
        }
    }

    /// Current position as a tuple.
    #[inline]
    pub fn position(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vertex_at_origin() {
        let v = Vertex::new(Identifier(1), 5.0);
        assert_eq!(v.position(), (0.0, 0.0, 0.0));
        assert!(!v.red);
        assert!(v.style_hints.is_none());
    }
}
