//! Render Digests
//!
//! SHA-256 digests of grid contents. Chat front-ends compare digests to skip
//! re-sending a board that has not changed since the last tick.

use std::fmt;
use sha2::{Sha256, Digest};

use super::grid::GridStore;

/// Digest output type (256 bits / 32 bytes)
pub type RenderDigest = [u8; 32];

/// Domain-separated hasher for grid state.
///
/// Every variable-length field is length-prefixed, so cell boundaries are
/// unambiguous even when cell values contain separator characters.
pub struct GridHasher {
    hasher: Sha256,
}

impl GridHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for rendered grids.
    pub fn for_grid() -> Self {
        Self::new(b"PLANE_ENGINE_GRID_V1")
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a length-prefixed string.
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> RenderDigest {
        self.hasher.finalize().into()
    }
}

/// Digest every cell of a grid as it would be displayed.
pub fn compute_grid_digest<T: fmt::Display>(grid: &GridStore<T>) -> RenderDigest {
    let mut hasher = GridHasher::for_grid();
    hasher.update_i32(grid.rows());
    hasher.update_i32(grid.columns());
    for row in grid.rows_iter() {
        for cell in row {
            hasher.update_str(&cell.to_string());
        }
    }
    hasher.finalize()
}
