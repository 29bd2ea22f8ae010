//! Edge type.
//!
//! An edge is a directed parent→child link. It stores endpoint identifiers
//! only; endpoints are always resolved through the vertex list, never kept
//! as embedded copies that could go stale.

use serde::{Deserialize, Serialize};

use super::id::Identifier;

/// Directed parent→child relation between two vertices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: Identifier,
    pub source: Identifier,
    pub target: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Edge {
    /// Create an uncoloured edge.
    pub fn new(id: Identifier, source: Identifier, target: Identifier) -> Self {
        Self {
            id,
            source,
            target,
            color: None,
        }
    }

    /// Check whether `vertex` is either endpoint.
    #[inline]
    pub fn touches(&self, vertex: Identifier) -> bool {
        self.source == vertex || self.target == vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches() {
        let e = Edge::new(Identifier(0), Identifier(1), Identifier(2));
        assert!(e.touches(Identifier(1)));
        assert!(e.touches(Identifier(2)));
        assert!(!e.touches(Identifier(0)));
    }
}
