//! Collision Detection
//!
//! Linear scans over a plane's registry. Grids are small and draw order is
//! part of the result, so there is no spatial index.

use std::collections::BTreeMap;

use crate::core::point::Point;
use crate::game::plane::ObjectRecord;

/// Check if two objects share a cell.
#[inline]
pub fn cells_overlap(a: Point, b: Point) -> bool {
    a == b
}

/// Records (in iteration order) sitting on `at` under an id other than `id`.
pub fn overlapping_records<'a, V: 'a>(
    records: impl IntoIterator<Item = &'a ObjectRecord<V>>,
    id: &str,
    at: Point,
) -> Vec<&'a ObjectRecord<V>> {
    records
        .into_iter()
        .filter(|record| record.id != id && cells_overlap(record.position, at))
        .collect()
}

/// The object a collision at `matched.position` should report.
///
/// That is whoever is currently drawn in the cell, unless the cell is blank
/// or drawn by the colliding object itself, in which case the matched record
/// is reported.
pub fn resolve_occupant<'a, V>(
    owners: &BTreeMap<Point, String>,
    records: &'a BTreeMap<String, ObjectRecord<V>>,
    matched: &'a ObjectRecord<V>,
    colliding_id: &str,
) -> &'a ObjectRecord<V> {
    owners
        .get(&matched.position)
        .filter(|owner| owner.as_str() != colliding_id)
        .and_then(|owner| records.get(owner))
        .unwrap_or(matched)
}
