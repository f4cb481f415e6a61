//! Grid Coordinates
//!
//! Integer positions and plane extents.
//! The public coordinate system puts (0, 0) at the bottom-left corner.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A cell position on a plane.
///
/// Coordinates are signed so that out-of-range input can be represented
/// and rejected (or clamped) instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Column, counted from the left edge
    pub x: i32,
    /// Row, counted from the bottom edge
    pub y: i32,
}

impl Point {
    /// Bottom-left corner
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a delta on each axis.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Unit step (each component in -1..=1) that moves this point toward `target`.
    ///
    /// Returns `(0, 0)` when both points coincide.
    #[inline]
    pub fn step_toward(self, target: Self) -> (i32, i32) {
        (
            (target.x - self.x).signum(),
            (target.y - self.y).signum(),
        )
    }

    /// True if either component is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.x < 0 || self.y < 0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Extents of a plane.
///
/// `columns` bounds the x axis, `rows` bounds the y axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Number of rows (height)
    pub rows: i32,
    /// Number of columns (width)
    pub columns: i32,
}

impl Bounds {
    /// Create bounds. Callers validate positivity (see `GridStore::create`).
    #[inline]
    pub const fn new(rows: i32, columns: i32) -> Self {
        Self { rows, columns }
    }

    /// Largest valid x.
    #[inline]
    pub const fn max_x(&self) -> i32 {
        self.columns - 1
    }

    /// Largest valid y.
    #[inline]
    pub const fn max_y(&self) -> i32 {
        self.rows - 1
    }

    /// Check if a point lies inside the plane.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.columns && point.y >= 0 && point.y < self.rows
    }

    /// Total number of cells.
    #[inline]
    pub const fn area(&self) -> usize {
        (self.rows as usize) * (self.columns as usize)
    }
}
