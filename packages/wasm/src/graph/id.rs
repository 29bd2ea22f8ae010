//! Identifiers and the collision-checked allocator that hands them out.
//!
//! Identifiers are drawn at random from a fixed space and rejected on
//! collision. They carry no ordering meaning: two vertices built one after
//! another get unrelated ids.

use std::collections::HashSet;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Stable identifier shared by vertices and edges.
///
/// Wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub u32);

impl Identifier {
    /// Create a new Identifier from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

impl From<u32> for Identifier {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<Identifier> for u32 {
    #[inline]
    fn from(id: Identifier) -> Self {
        id.0
    }
}

/// Generates identifiers that are unique for the lifetime of the allocator.
pub struct IdentifierAllocator {
    issued: HashSet<Identifier>,
    rng: StdRng,
    space: u32,
    max_attempts: u32,
}

impl IdentifierAllocator {
    /// Size of the default sampling space.
    pub const DEFAULT_SPACE: u32 = 1 << 30;

    /// Samples drawn before [`GraphError::Exhausted`] is returned.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

    /// Create an allocator over the default space, seeded from the OS.
    pub fn new() -> Self {
        Self::with_space(Self::DEFAULT_SPACE, Self::DEFAULT_MAX_ATTEMPTS)
    }

    /// Create an allocator sampling from `0..space`, giving up after
    /// `max_attempts` collisions in a row.
    pub fn with_space(space: u32, max_attempts: u32) -> Self {
        Self::from_rng(StdRng::from_rng(&mut rand::rng()), space, max_attempts)
    }

    /// Create a reproducible allocator over the default space.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(
            StdRng::seed_from_u64(seed),
            Self::DEFAULT_SPACE,
            Self::DEFAULT_MAX_ATTEMPTS,
        )
    }

    fn from_rng(rng: StdRng, space: u32, max_attempts: u32) -> Self {
        Self {
            issued: HashSet::new(),
            rng,
            space: space.max(1),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Draw a fresh identifier.
    ///
    /// Exhaustion means the space is far too small for the graph and should
    /// be treated as a configuration error by the caller.
    pub fn generate(&mut self) -> Result<Identifier> {
        for _ in 0..self.max_attempts {
            let candidate = Identifier(self.rng.random_range(0..self.space));
            if self.issued.insert(candidate) {
                return Ok(candidate);
            }
        }
        Err(GraphError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Mark an externally created identifier as taken.
    ///
    /// Returns false if it had already been issued.
    pub fn reserve(&mut self, id: Identifier) -> bool {
        self.issued.insert(id)
    }

    /// Forget every issued identifier.
    pub fn reset(&mut self) {
        self.issued.clear();
    }

    /// Number of identifiers currently issued or reserved.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Check whether nothing has been issued yet.
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        let id = Identifier::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Id(42)");

        let raw: u32 = Identifier::from(7).into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn test_generate_unique() {
        let mut alloc = IdentifierAllocator::seeded(1);
        let ids: HashSet<_> = (0..500).map(|_| alloc.generate().unwrap()).collect();
        assert_eq!(ids.len(), 500);
        assert_eq!(alloc.len(), 500);
    }

    #[test]
    fn test_small_space_fills_completely() {
        // 1000 attempts over a space of 4 finds every free slot in practice
        let mut alloc = IdentifierAllocator::with_space(4, 1000);
        let mut ids: Vec<u32> = (0..4).map(|_| alloc.generate().unwrap().raw()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_exhausted() {
        let mut alloc = IdentifierAllocator::with_space(1, 10);
        assert_eq!(alloc.generate(), Ok(Identifier(0)));
        assert_eq!(alloc.generate(), Err(GraphError::Exhausted { attempts: 10 }));
    }

    #[test]
    fn test_reserve_blocks_generation() {
        let mut alloc = IdentifierAllocator::with_space(2, 100);
        assert!(alloc.reserve(Identifier(0)));
        assert!(!alloc.reserve(Identifier(0)));
        assert_eq!(alloc.generate(), Ok(Identifier(1)));
        assert!(alloc.generate().is_err());

        alloc.reset();
        assert!(alloc.is_empty());
        assert!(alloc.generate().is_ok());
    }
}
