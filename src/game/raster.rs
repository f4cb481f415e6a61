//! Line Rasterization
//!
//! Builds multi-cell objects (walls, paths) from line descriptors of the form
//! `x1,y1->x2,y2`. Each covered cell becomes its own non-colliding object with
//! id `c{x},{y}`, ready to pass to `Plane::update`.

use thiserror::Error;
use tracing::trace;

use crate::core::point::{Bounds, Point};
use crate::game::object::PlaneObject;
use crate::game::plane::Plane;

/// Separator between the two endpoints of a path.
pub const PATH_ARROW: &str = "->";

/// Path descriptor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The descriptor has no `->`.
    #[error("path {path:?} must include `->`")]
    MalformedPath {
        /// Descriptor as given
        path: String,
    },

    /// An endpoint is not two comma-separated integers.
    #[error("path {path:?} has an invalid endpoint {endpoint:?}, expected `x,y`")]
    InvalidEndpoint {
        /// Descriptor as given
        path: String,
        /// Offending endpoint (whitespace removed)
        endpoint: String,
    },
}

/// Parse `x1,y1->x2,y2` and clamp both endpoints.
///
/// Whitespace is ignored. x is clamped into `[0, rows - 1]` and y into
/// `[0, columns - 1]`; the pairing is kept for compatibility with existing
/// boards.
pub fn parse_path(path: &str, bounds: Bounds) -> Result<(Point, Point), PathError> {
    let compact: String = path.chars().filter(|c| !c.is_whitespace()).collect();
    let (from, to) = compact
        .split_once(PATH_ARROW)
        .ok_or_else(|| PathError::MalformedPath {
            path: path.to_string(),
        })?;

    let endpoint = |raw: &str| -> Result<Point, PathError> {
        let invalid = || PathError::InvalidEndpoint {
            path: path.to_string(),
            endpoint: raw.to_string(),
        };
        let (x, y) = raw.split_once(',').ok_or_else(invalid)?;
        let x: i32 = x.parse().map_err(|_| invalid())?;
        let y: i32 = y.parse().map_err(|_| invalid())?;
        Ok(Point::new(
            x.clamp(0, bounds.max_y()),
            y.clamp(0, bounds.max_x()),
        ))
    };

    Ok((endpoint(from)?, endpoint(to)?))
}

/// Cells on the segment from `start` to `end`, both included, in order.
///
/// Integer Bresenham with a single combined error term, so every octant is
/// handled by the same loop. Arithmetic runs in `i64`, so any pair of `i32`
/// endpoints is accepted.
pub fn bresenham(start: Point, end: Point) -> Vec<Point> {
    let (x0, y0) = (i64::from(start.x), i64::from(start.y));
    let (x1, y1) = (i64::from(end.x), i64::from(end.y));
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut error = dx - dy;

    let mut cells = Vec::new();
    let (mut x, mut y) = (x0, y0);
    loop {
        // Every step stays between the two i32 endpoints
        cells.push(Point::new(x as i32, y as i32));
        if x == x1 && y == y1 {
            break;
        }

        let doubled = error * 2;
        if doubled > -dy {
            error -= dy;
            x += sx;
        }
        if doubled < dx {
            error += dx;
            y += sy;
        }
    }
    cells
}

/// Accumulates line objects for one plane.
pub struct LineRasterizer<'p, V> {
    plane: &'p Plane<V>,
    objects: Vec<PlaneObject<V>>,
}

impl<'p, V: Clone + PartialEq> LineRasterizer<'p, V> {
    /// Create an empty rasterizer for `plane`.
    pub fn new(plane: &'p Plane<V>) -> Self {
        Self {
            plane,
            objects: Vec::new(),
        }
    }

    /// Rasterize one line drawn with `value`.
    pub fn draw(&mut self, path: &str, value: V) -> Result<usize, PathError> {
        self.draw_lines([(path, value)])
    }

    /// Rasterize several lines.
    ///
    /// Every descriptor is parsed before anything is added, so a bad line
    /// leaves the rasterizer unchanged. Returns the number of cells added.
    pub fn draw_lines<'s>(
        &mut self,
        lines: impl IntoIterator<Item = (&'s str, V)>,
    ) -> Result<usize, PathError> {
        let bounds = self.plane.bounds();
        let parsed = lines
            .into_iter()
            .map(|(path, value)| parse_path(path, bounds).map(|ends| (ends, value)))
            .collect::<Result<Vec<_>, _>>()?;

        let before = self.objects.len();
        for ((start, end), value) in parsed {
            for cell in bresenham(start, end) {
                let id = format!("c{},{}", cell.x, cell.y);
                let object = PlaneObject::with_value(self.plane, cell.x, cell.y, id, value.clone())
                    .detect_collision(false);
                self.objects.push(object);
            }
            trace!(%start, %end, "line rasterized");
        }
        Ok(self.objects.len() - before)
    }

    /// Objects so far, in rasterization order.
    pub fn objects(&self) -> &[PlaneObject<V>] {
        &self.objects
    }

    /// Take the objects, releasing the plane borrow.
    pub fn into_objects(self) -> Vec<PlaneObject<V>> {
        self.objects
    }
}
