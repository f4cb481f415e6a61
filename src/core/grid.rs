//! Grid Storage
//!
//! Flat row-major cell storage behind every plane.
//!
//! Storage rows run top-to-bottom while public coordinates put (0, 0) at the
//! bottom-left, so every access maps `y` to storage row `rows - y - 1`.

use std::fmt;
use thiserror::Error;

use super::point::{Bounds, Point};

/// Grid storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Rows or columns were not positive.
    #[error("invalid grid dimensions {rows}x{columns}: rows and columns must be positive")]
    InvalidDimension {
        /// Requested rows
        rows: i32,
        /// Requested columns
        columns: i32,
    },

    /// Coordinate outside the grid extents.
    #[error("coordinate {point} is outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Offending coordinate
        point: Point,
        /// Grid rows
        rows: i32,
        /// Grid columns
        columns: i32,
    },
}

/// Rectangular cell store with a bottom-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct GridStore<T> {
    bounds: Bounds,
    /// Row-major, storage row 0 is the top of the rendered grid
    cells: Vec<T>,
}

impl<T: Clone> GridStore<T> {
    /// Allocate `rows` x `columns` cells, all set to `blank`.
    pub fn create(rows: i32, columns: i32, blank: T) -> Result<Self, GridError> {
        if rows <= 0 || columns <= 0 {
            return Err(GridError::InvalidDimension { rows, columns });
        }

        let bounds = Bounds::new(rows, columns);
        Ok(Self {
            bounds,
            cells: vec![blank; bounds.area()],
        })
    }

    /// Read the value at `(x, y)`.
    pub fn read(&self, x: i32, y: i32) -> Result<&T, GridError> {
        let idx = self.index(Point::new(x, y))?;
        Ok(&self.cells[idx])
    }

    /// Overwrite the value at `(x, y)`.
    ///
    /// No aliasing checks: callers keep the plane invariants.
    pub fn write(&mut self, x: i32, y: i32, value: T) -> Result<(), GridError> {
        let idx = self.index(Point::new(x, y))?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Reset every cell to `blank`.
    pub fn clear_all(&mut self, blank: &T) {
        for cell in &mut self.cells {
            *cell = blank.clone();
        }
    }
}

impl<T> GridStore<T> {
    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.bounds.rows
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> i32 {
        self.bounds.columns
    }

    /// Grid extents.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Check if `(x, y)` is inside the grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.bounds.contains(Point::new(x, y))
    }

    /// Display rows, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.bounds.columns as usize)
    }

    /// Flat index for a public coordinate, with the y axis inverted.
    #[inline]
    fn index(&self, point: Point) -> Result<usize, GridError> {
        if !self.bounds.contains(point) {
            return Err(GridError::OutOfBounds {
                point,
                rows: self.bounds.rows,
                columns: self.bounds.columns,
            });
        }
        let row = (self.bounds.rows - point.y - 1) as usize;
        Ok(row * self.bounds.columns as usize + point.x as usize)
    }
}

impl<T: fmt::Display> GridStore<T> {
    /// Render the grid as text.
    ///
    /// Cells of one row are joined by `row_sep`, rows are joined by `col_sep`.
    /// Nothing is escaped; separators must not appear in cell values.
    pub fn serialize(&self, row_sep: &str, col_sep: &str) -> String {
        self.rows_iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.to_string())
                    .collect::<Vec<_>>()
                    .join(row_sep)
            })
            .collect::<Vec<_>>()
            .join(col_sep)
    }
}
