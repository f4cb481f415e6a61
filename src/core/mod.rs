//! Core grid primitives.
//!
//! Coordinates, cell storage and digests. Nothing in this module knows about
//! objects, collisions or games.

pub mod point;
pub mod grid;
pub mod hash;

// Re-export core types
pub use point::{Point, Bounds};
pub use grid::{GridStore, GridError};
pub use hash::{GridHasher, RenderDigest, compute_grid_digest};
