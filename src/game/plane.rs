//! Plane
//!
//! A grid plus a registry of the objects drawn on it.
//!
//! ## Update Cycle
//!
//! `update` runs once per game tick:
//!
//! 1. Inactive game: redraw every known object at its origin, register nothing.
//! 2. Active game: validate the batch, refresh the records of known batch
//!    members to where they are now, clear the grid, then walk the batch in
//!    reverse so the first-listed object ends up on top. Each object is checked
//!    against the registry, erased from any cell it already drew this batch,
//!    drawn, and recorded.
//!
//! Work is staged on copies of the grid and registry and committed only when
//! the whole batch succeeds, so a failed update leaves the plane untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::config::{CollisionPolicy, PlaneConfig, RegistryPolicy};
use crate::core::grid::{GridError, GridStore};
use crate::core::hash::{compute_grid_digest, RenderDigest};
use crate::core::point::{Bounds, Point};
use crate::game::collision::{overlapping_records, resolve_occupant};
use crate::game::events::CollisionEvent;
use crate::game::object::{AiError, PlaneObject, StepOutcome};

// =============================================================================
// IDENTITY & COLLABORATORS
// =============================================================================

/// Unique plane identifier. Objects remember the plane they were built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaneId(Uuid);

impl PlaneId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Anything that can say whether its game is running.
///
/// Polled once per `Plane::update`.
pub trait ActivityGate {
    /// Whether updates should be applied.
    fn is_active(&self) -> bool;
}

impl ActivityGate for bool {
    fn is_active(&self) -> bool {
        *self
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// What the plane remembers about a registered object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectRecord<V> {
    /// Object id
    pub id: String,
    /// Display value at the last update
    pub value: V,
    /// Position at the last update
    pub position: Point,
    /// Construction position, used for idle redraw
    pub origin: Point,
    /// Collision flag at the last update
    pub detect_collision: bool,
}

impl<V: Clone> ObjectRecord<V> {
    fn capture(object: &PlaneObject<V>) -> Self {
        Self {
            id: object.id().to_string(),
            value: object.value().clone(),
            position: object.position(),
            origin: object.origin(),
            detect_collision: object.detects_collision(),
        }
    }
}

/// Outcome of one `Plane::update`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateReport<V> {
    /// The game was inactive and objects were redrawn at their origins
    pub idle: bool,
    /// Ids drawn this update, in draw order
    pub drawn: Vec<String>,
    /// Collision events delivered, keyed by receiving object id
    pub collisions: Vec<(String, CollisionEvent<V>)>,
    /// Ids dropped from the registry under `RegistryPolicy::EvictOmitted`
    pub evicted: Vec<String>,
}

impl<V> UpdateReport<V> {
    fn new(idle: bool) -> Self {
        Self {
            idle,
            drawn: Vec::new(),
            collisions: Vec::new(),
            evicted: Vec::new(),
        }
    }
}

/// Plane errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaneError {
    /// Grid construction or bounds failure.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// An object in the batch has a negative coordinate.
    #[error("invalid coordinate {point} for {id}: x and y must be non-negative ((0, 0) is the bottom left corner)")]
    InvalidCoordinate {
        /// Object id
        id: String,
        /// Offending position
        point: Point,
    },

    /// An object built for another plane was passed in.
    #[error("{id} belongs to a different plane")]
    ForeignObject {
        /// Object id
        id: String,
    },

    /// Collision under `CollisionPolicy::Reject`.
    #[error("collision detected: {id} cannot occupy {at}, already held by {other}")]
    CollisionConflict {
        /// Incoming object id
        id: String,
        /// Occupying object id
        other: String,
        /// Contested cell
        at: Point,
    },

    /// Pursuit precondition failed.
    #[error(transparent)]
    Ai(#[from] AiError),
}

// =============================================================================
// PLANE
// =============================================================================

/// A 2D grid of display values with a bottom-left origin.
#[derive(Clone, Debug)]
pub struct Plane<V = String> {
    id: PlaneId,
    config: PlaneConfig,
    blank: V,
    grid: GridStore<V>,
    records: BTreeMap<String, ObjectRecord<V>>,
    /// Registration order of `records` keys
    order: Vec<String>,
}

impl<V: Clone + PartialEq> Plane<V> {
    /// Create a plane with the default configuration.
    pub fn new(rows: i32, columns: i32, blank: V) -> Result<Self, PlaneError> {
        Self::with_config(rows, columns, blank, PlaneConfig::default())
    }

    /// Create a plane.
    pub fn with_config(
        rows: i32,
        columns: i32,
        blank: V,
        config: PlaneConfig,
    ) -> Result<Self, PlaneError> {
        let grid = GridStore::create(rows, columns, blank.clone())?;
        Ok(Self {
            id: PlaneId::generate(),
            config,
            blank,
            grid,
            records: BTreeMap::new(),
            order: Vec::new(),
        })
    }
}

impl<V> Plane<V> {
    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Plane identifier.
    pub fn id(&self) -> PlaneId {
        self.id
    }

    /// Plane extents.
    pub fn bounds(&self) -> Bounds {
        self.grid.bounds()
    }

    /// Number of rows.
    pub fn rows(&self) -> i32 {
        self.grid.rows()
    }

    /// Number of columns.
    pub fn columns(&self) -> i32 {
        self.grid.columns()
    }

    /// Empty-cell value.
    pub fn blank(&self) -> &V {
        &self.blank
    }

    /// Active configuration.
    pub fn config(&self) -> &PlaneConfig {
        &self.config
    }

    /// Backing grid.
    pub fn grid(&self) -> &GridStore<V> {
        &self.grid
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered ids in registration order.
    pub fn registered_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Registered records in registration order.
    pub fn records(&self) -> impl Iterator<Item = &ObjectRecord<V>> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Record for an id.
    pub fn record(&self, id: &str) -> Option<&ObjectRecord<V>> {
        self.records.get(id)
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// Last known position of an object.
    pub fn lookup_by_id(&self, id: &str) -> Option<Point> {
        self.records.get(id).map(|record| record.position)
    }
}

impl<V: Clone + PartialEq> Plane<V> {
    /// Value drawn at `(x, y)`, or `None` for a blank cell.
    pub fn lookup_at(&self, x: i32, y: i32) -> Result<Option<&V>, PlaneError> {
        let value = self.grid.read(x, y)?;
        Ok((*value != self.blank).then_some(value))
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Blank every cell. Registered objects and their positions are kept.
    pub fn clear(&mut self) {
        self.grid.clear_all(&self.blank);
    }

    /// Drop an object from the registry, blanking its cell if it is still drawn.
    pub fn remove(&mut self, id: &str) -> Option<ObjectRecord<V>> {
        let record = self.records.remove(id)?;
        self.order.retain(|known| known != id);

        let at = record.position;
        if let Ok(current) = self.grid.read(at.x, at.y) {
            if *current == record.value {
                let _ = self.grid.write(at.x, at.y, self.blank.clone());
            }
        }
        debug!(plane = %self.id, id, "object removed");
        Some(record)
    }

    /// Redraw the plane for one tick.
    ///
    /// See the module docs for the full cycle. Collision events are delivered
    /// to the objects' outboxes and echoed in the report.
    pub fn update<'a, G, I>(&mut self, game: &G, objects: I) -> Result<UpdateReport<V>, PlaneError>
    where
        G: ActivityGate + ?Sized,
        I: IntoIterator<Item = &'a mut PlaneObject<V>>,
        V: 'a,
    {
        if !game.is_active() {
            return self.redraw_origins();
        }

        let mut batch: Vec<&'a mut PlaneObject<V>> = objects.into_iter().collect();
        for object in &batch {
            self.validate(object)?;
        }

        let mut grid = self.grid.clone();
        grid.clear_all(&self.blank);
        let mut records = self.records.clone();
        let mut order = self.order.clone();

        // Known objects in this batch are compared where they are now, not
        // where they were last drawn
        for object in &batch {
            if let Some(record) = records.get_mut(object.id()) {
                *record = ObjectRecord::capture(object);
            }
        }

        // Cells drawn this batch and who drew them
        let mut owners: BTreeMap<Point, String> = BTreeMap::new();
        let mut drawn_at: BTreeMap<String, Point> = BTreeMap::new();
        let mut deliveries: Vec<(usize, CollisionEvent<V>)> = Vec::new();
        let mut report = UpdateReport::new(false);

        for (idx, object) in batch.iter().enumerate().rev() {
            let id = object.id();
            let at = object.position();

            if object.detects_collision() {
                let mut reported: BTreeSet<&str> = BTreeSet::new();
                let ordered = order.iter().filter_map(|known| records.get(known));
                for matched in overlapping_records(ordered, id, at) {
                    let occupant = resolve_occupant(&owners, &records, matched, id);
                    if !reported.insert(occupant.id.as_str()) {
                        continue;
                    }
                    if self.config.collision_policy == CollisionPolicy::Reject {
                        return Err(PlaneError::CollisionConflict {
                            id: id.to_string(),
                            other: occupant.id.clone(),
                            at,
                        });
                    }
                    trace!(id, other = %occupant.id, %at, "collision");
                    deliveries.push((
                        idx,
                        CollisionEvent::object(at, occupant.id.clone(), occupant.value.clone()),
                    ));
                }
            }

            // An id listed twice keeps only its top-most draw
            if let Some(previous) = drawn_at.get(id).copied() {
                if owners.get(&previous).map(String::as_str) == Some(id) {
                    grid.write(previous.x, previous.y, self.blank.clone())?;
                    owners.remove(&previous);
                }
            }

            grid.write(at.x, at.y, object.value().clone())?;
            owners.insert(at, id.to_string());
            drawn_at.insert(id.to_string(), at);

            if records.insert(id.to_string(), ObjectRecord::capture(object)).is_none() {
                order.push(id.to_string());
            }
            report.drawn.push(id.to_string());
            trace!(id, %at, "drawn");
        }

        if self.config.registry_policy == RegistryPolicy::EvictOmitted {
            let (kept, evicted): (Vec<String>, Vec<String>) = order
                .into_iter()
                .partition(|known| drawn_at.contains_key(known));
            for id in &evicted {
                records.remove(id);
            }
            order = kept;
            report.evicted = evicted;
        }

        self.grid = grid;
        self.records = records;
        self.order = order;

        for (idx, event) in deliveries {
            let object = &mut batch[idx];
            report.collisions.push((object.id().to_string(), event.clone()));
            object.notify_collision(event.collider);
        }

        debug!(
            plane = %self.id,
            drawn = report.drawn.len(),
            collisions = report.collisions.len(),
            evicted = report.evicted.len(),
            "plane updated"
        );
        Ok(report)
    }

    /// Step a pursuing object toward its target's last rendered position.
    pub fn pursue(&self, pursuer: &mut PlaneObject<V>) -> Result<StepOutcome, PlaneError> {
        if pursuer.plane_id() != self.id {
            return Err(PlaneError::ForeignObject {
                id: pursuer.id().to_string(),
            });
        }
        pursuer.ensure_running()?;

        let target_id = pursuer
            .ai_state()
            .and_then(|ai| ai.target.as_ref())
            .map(|target| target.id.clone());
        if let Some(position) = target_id.and_then(|id| self.lookup_by_id(&id)) {
            pursuer.track_target(position);
        }

        Ok(pursuer.step(None)?)
    }

    /// Idle branch: show every known object at rest.
    fn redraw_origins(&mut self) -> Result<UpdateReport<V>, PlaneError> {
        self.grid.clear_all(&self.blank);
        let mut report = UpdateReport::new(true);

        for id in &self.order {
            let Some(record) = self.records.get(id) else {
                continue;
            };
            let origin = record.origin;
            if !self.grid.contains(origin.x, origin.y) {
                warn!(plane = %self.id, id = %record.id, %origin, "origin outside plane, not redrawn");
                continue;
            }
            self.grid.write(origin.x, origin.y, record.value.clone())?;
            report.drawn.push(record.id.clone());
        }

        debug!(plane = %self.id, drawn = report.drawn.len(), "idle redraw at origins");
        Ok(report)
    }

    fn validate(&self, object: &PlaneObject<V>) -> Result<(), PlaneError> {
        if object.plane_id() != self.id {
            return Err(PlaneError::ForeignObject {
                id: object.id().to_string(),
            });
        }

        let at = object.position();
        if at.is_negative() {
            return Err(PlaneError::InvalidCoordinate {
                id: object.id().to_string(),
                point: at,
            });
        }
        if !self.grid.contains(at.x, at.y) {
            return Err(GridError::OutOfBounds {
                point: at,
                rows: self.grid.rows(),
                columns: self.grid.columns(),
            }
            .into());
        }
        Ok(())
    }
}

impl<V: fmt::Display> Plane<V> {
    /// Render with the configured separators (by default cells are joined
    /// with nothing and rows with a line break).
    pub fn render(&self) -> String {
        self.grid
            .serialize(&self.config.row_separator, &self.config.column_separator)
    }

    /// Render with explicit separators.
    pub fn render_with(&self, row_sep: &str, col_sep: &str) -> String {
        self.grid.serialize(row_sep, col_sep)
    }

    /// Digest of the rendered grid.
    pub fn digest(&self) -> RenderDigest {
        compute_grid_digest(&self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::Collider;

    fn plane() -> Plane {
        Plane::new(10, 10, "empty".to_string()).unwrap()
    }

    fn nothing<'a>() -> std::iter::Empty<&'a mut PlaneObject> {
        std::iter::empty()
    }

    fn collider_ids(object: &PlaneObject) -> Vec<String> {
        object
            .events()
            .iter()
            .map(|event| event.collider.id().to_string())
            .collect()
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Plane::new(0, 10, ".".to_string()),
            Err(PlaneError::Grid(GridError::InvalidDimension { .. }))
        ));
    }

    #[test]
    fn test_bag_is_drawn_and_found() {
        let mut plane = plane();
        let mut bag = PlaneObject::new(&plane, 2, 6, "bag");

        plane.update(&true, [&mut bag]).unwrap();

        assert_eq!(plane.lookup_at(2, 6).unwrap(), Some(&"bag".to_string()));
        assert_eq!(plane.lookup_by_id("bag"), Some(Point::new(2, 6)));
        assert_eq!(plane.lookup_by_id("nothing"), None);
        assert_eq!(plane.lookup_at(0, 0).unwrap(), None);
        assert!(matches!(
            plane.lookup_at(10, 0),
            Err(PlaneError::Grid(GridError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_bag_moves_onto_apple() {
        let mut plane = plane();
        let mut bag = PlaneObject::new(&plane, 2, 6, "bag");
        let mut apple = PlaneObject::new(&plane, 1, 1, "apple");

        let first = plane.update(&true, [&mut bag, &mut apple]).unwrap();
        assert!(first.collisions.is_empty());

        bag.set_position(1, 1);
        let report = plane.update(&true, [&mut bag, &mut apple]).unwrap();

        assert_eq!(collider_ids(&bag), vec!["apple"]);
        // apple is drawn first and sees bag where it stands now
        assert_eq!(collider_ids(&apple), vec!["bag"]);
        let receivers: Vec<&str> = report.collisions.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(receivers, vec!["apple", "bag"]);
        // First listed wins the cell
        assert_eq!(plane.lookup_at(1, 1).unwrap(), Some(&"bag".to_string()));
        assert_eq!(plane.lookup_at(2, 6).unwrap(), None);
    }

    #[test]
    fn test_same_batch_collision_notifies_once() {
        let mut plane = plane();
        let mut a = PlaneObject::new(&plane, 4, 4, "a");
        let mut b = PlaneObject::new(&plane, 4, 4, "b");

        plane.update(&true, [&mut a, &mut b]).unwrap();

        assert_eq!(collider_ids(&a), vec!["b"]);
        assert!(b.events().is_empty());
        assert_eq!(plane.lookup_at(4, 4).unwrap(), Some(&"a".to_string()));
    }

    #[test]
    fn test_moved_batch_member_is_checked_where_it_is_now() {
        for b_first in [true, false] {
            let mut plane = plane();
            let mut b = PlaneObject::new(&plane, 1, 1, "b");
            plane.update(&true, [&mut b]).unwrap();

            b.set_position(5, 5);
            let mut a = PlaneObject::new(&plane, 1, 1, "a");
            let batch = if b_first { [&mut b, &mut a] } else { [&mut a, &mut b] };
            let report = plane.update(&true, batch).unwrap();

            assert!(report.collisions.is_empty());
            assert!(a.events().is_empty());
            assert!(b.events().is_empty());
            assert_eq!(plane.lookup_at(1, 1).unwrap(), Some(&"a".to_string()));
            assert_eq!(plane.lookup_at(5, 5).unwrap(), Some(&"b".to_string()));
        }
    }

    #[test]
    fn test_suppressed_collision_still_overwrites() {
        let mut plane = plane();
        let mut a = PlaneObject::new(&plane, 4, 4, "a").detect_collision(false);
        let mut b = PlaneObject::new(&plane, 4, 4, "b");

        let report = plane.update(&true, [&mut a, &mut b]).unwrap();

        assert!(a.events().is_empty());
        assert!(b.events().is_empty());
        assert!(report.collisions.is_empty());
        assert_eq!(plane.lookup_at(4, 4).unwrap(), Some(&"a".to_string()));
    }

    #[test]
    fn test_collision_reports_drawn_occupant() {
        let mut plane = plane();
        let mut low = PlaneObject::new(&plane, 5, 5, "low");
        let mut high = PlaneObject::new(&plane, 5, 5, "high").detect_collision(false);
        let mut mover = PlaneObject::new(&plane, 0, 0, "mover");

        plane.update(&true, [&mut high, &mut low, &mut mover]).unwrap();
        low.take_events();

        mover.set_position(5, 5);
        plane.update(&true, [&mut mover, &mut high, &mut low]).unwrap();

        // Both records match the cell; one notification for whoever is drawn there
        assert_eq!(collider_ids(&mover), vec!["high"]);
    }

    #[test]
    fn test_duplicate_id_keeps_top_draw() {
        let mut plane = plane();
        let mut top = PlaneObject::new(&plane, 0, 0, "dup");
        let mut stale = PlaneObject::new(&plane, 3, 3, "dup");

        plane.update(&true, [&mut top, &mut stale]).unwrap();

        assert_eq!(plane.lookup_at(0, 0).unwrap(), Some(&"dup".to_string()));
        assert_eq!(plane.lookup_at(3, 3).unwrap(), None);
        assert_eq!(plane.lookup_by_id("dup"), Some(Point::new(0, 0)));
        assert_eq!(plane.len(), 1);
    }

    #[test]
    fn test_idle_redraws_origins() {
        let mut plane = plane();
        let mut bag = PlaneObject::new(&plane, 2, 6, "bag");
        plane.update(&true, [&mut bag]).unwrap();

        bag.set_position(5, 5);
        plane.update(&true, [&mut bag]).unwrap();
        assert_eq!(plane.lookup_at(5, 5).unwrap(), Some(&"bag".to_string()));

        let report = plane.update(&false, nothing()).unwrap();
        assert!(report.idle);
        assert_eq!(report.drawn, vec!["bag"]);
        assert_eq!(plane.lookup_at(2, 6).unwrap(), Some(&"bag".to_string()));
        assert_eq!(plane.lookup_at(5, 5).unwrap(), None);
        // Registry keeps the live position
        assert_eq!(plane.lookup_by_id("bag"), Some(Point::new(5, 5)));
    }

    #[test]
    fn test_idle_skips_origin_outside_plane() {
        let mut plane = plane();
        let mut stray = PlaneObject::new(&plane, -1, 0, "stray");
        stray.set_x(0);
        plane.update(&true, [&mut stray]).unwrap();
        assert_eq!(plane.lookup_at(0, 0).unwrap(), Some(&"stray".to_string()));

        let report = plane.update(&false, nothing()).unwrap();

        assert!(report.idle);
        assert!(report.drawn.is_empty());
        assert_eq!(plane.lookup_at(0, 0).unwrap(), None);
        assert_eq!(plane.len(), 1);
    }

    #[test]
    fn test_idle_registers_nothing() {
        let mut plane = plane();
        let mut newcomer = PlaneObject::new(&plane, 1, 1, "newcomer");

        let report = plane.update(&false, [&mut newcomer]).unwrap();

        assert!(report.idle);
        assert!(plane.is_empty());
        assert_eq!(plane.lookup_at(1, 1).unwrap(), None);
    }

    #[test]
    fn test_invalid_batches_leave_plane_untouched() {
        let mut plane = plane();
        let mut bag = PlaneObject::new(&plane, 2, 6, "bag");
        plane.update(&true, [&mut bag]).unwrap();
        let before = plane.render();

        let mut negative = PlaneObject::new(&plane, -1, 0, "negative");
        assert_eq!(
            plane.update(&true, [&mut bag, &mut negative]),
            Err(PlaneError::InvalidCoordinate {
                id: "negative".to_string(),
                point: Point::new(-1, 0),
            })
        );

        let mut far = PlaneObject::new(&plane, 10, 0, "far");
        assert!(matches!(
            plane.update(&true, [&mut far]),
            Err(PlaneError::Grid(GridError::OutOfBounds { .. }))
        ));

        let other = Plane::new(10, 10, "empty".to_string()).unwrap();
        let mut foreign = PlaneObject::new(&other, 0, 0, "foreign");
        assert_eq!(
            plane.update(&true, [&mut foreign]),
            Err(PlaneError::ForeignObject { id: "foreign".to_string() })
        );

        assert_eq!(plane.render(), before);
        assert_eq!(plane.len(), 1);
    }

    #[test]
    fn test_reject_policy_is_atomic() {
        let config = PlaneConfig::default().with_collision_policy(CollisionPolicy::Reject);
        let mut plane = Plane::with_config(5, 5, ".".to_string(), config).unwrap();
        let mut a = PlaneObject::new(&plane, 1, 1, "a");
        let mut b = PlaneObject::new(&plane, 3, 3, "b");
        plane.update(&true, [&mut a, &mut b]).unwrap();
        let before = plane.render();

        a.set_position(3, 3);
        let err = plane.update(&true, [&mut a, &mut b]).unwrap_err();

        assert_eq!(
            err,
            PlaneError::CollisionConflict {
                id: "b".to_string(),
                other: "a".to_string(),
                at: Point::new(3, 3),
            }
        );
        assert_eq!(plane.render(), before);
        assert_eq!(plane.lookup_by_id("a"), Some(Point::new(1, 1)));
        assert!(a.events().is_empty());
        assert!(b.events().is_empty());
    }

    #[test]
    fn test_retain_keeps_omitted_records() {
        let mut plane = plane();
        let mut a = PlaneObject::new(&plane, 1, 1, "a");
        let mut b = PlaneObject::new(&plane, 2, 2, "b");
        plane.update(&true, [&mut a, &mut b]).unwrap();

        plane.update(&true, [&mut a]).unwrap();
        assert_eq!(plane.lookup_at(2, 2).unwrap(), None);
        assert_eq!(plane.lookup_by_id("b"), Some(Point::new(2, 2)));

        // Omitted objects still block
        a.set_position(2, 2);
        plane.update(&true, [&mut a]).unwrap();
        assert_eq!(collider_ids(&a), vec!["b"]);
    }

    #[test]
    fn test_evict_omitted() {
        let config = PlaneConfig::default().with_registry_policy(RegistryPolicy::EvictOmitted);
        let mut plane = Plane::with_config(5, 5, ".".to_string(), config).unwrap();
        let mut a = PlaneObject::new(&plane, 1, 1, "a");
        let mut b = PlaneObject::new(&plane, 2, 2, "b");
        plane.update(&true, [&mut a, &mut b]).unwrap();

        let report = plane.update(&true, [&mut a]).unwrap();

        assert_eq!(report.evicted, vec!["b"]);
        assert_eq!(plane.registered_ids().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(plane.lookup_by_id("b"), None);
    }

    #[test]
    fn test_remove_blanks_cell() {
        let mut plane = plane();
        let mut a = PlaneObject::new(&plane, 1, 1, "a");
        plane.update(&true, [&mut a]).unwrap();

        let record = plane.remove("a").unwrap();
        assert_eq!(record.position, Point::new(1, 1));
        assert_eq!(plane.lookup_at(1, 1).unwrap(), None);
        assert!(plane.remove("a").is_none());
        assert!(plane.is_empty());
    }

    #[test]
    fn test_clear_keeps_registry() {
        let mut plane = plane();
        let mut bag = PlaneObject::new(&plane, 2, 6, "bag");
        plane.update(&true, [&mut bag]).unwrap();

        plane.clear();
        assert_eq!(plane.lookup_at(2, 6).unwrap(), None);
        assert_eq!(plane.lookup_by_id("bag"), Some(Point::new(2, 6)));
    }

    #[test]
    fn test_render_is_bottom_left_origin_and_idempotent() {
        let mut plane = Plane::new(3, 3, ".".to_string()).unwrap();
        let mut corner = PlaneObject::with_value(&plane, 0, 0, "corner", "x".to_string());
        let mut top = PlaneObject::with_value(&plane, 2, 2, "top", "o".to_string());
        plane.update(&true, [&mut corner, &mut top]).unwrap();

        let first = plane.render();
        assert_eq!(first, "..o\n...\nx..");
        assert_eq!(plane.render(), first);
        assert_eq!(plane.render_with(" ", "|"), ". . o|. . .|x . .");
        assert_eq!(plane.digest(), plane.digest());
    }

    #[test]
    fn test_pursue_uses_rendered_target_position() {
        let mut plane = plane();
        let mut hunter = PlaneObject::new(&plane, 0, 0, "hunter").ai(true);
        let mut prey = PlaneObject::new(&plane, 3, 3, "prey");
        plane.update(&true, [&mut hunter, &mut prey]).unwrap();

        assert!(matches!(
            plane.pursue(&mut hunter),
            Err(PlaneError::Ai(AiError::NotRunning { .. }))
        ));

        hunter.start_pursuit(&prey).unwrap();
        prey.set_position(5, 0);
        plane.update(&true, [&mut prey, &mut hunter]).unwrap();

        assert_eq!(
            plane.pursue(&mut hunter).unwrap(),
            StepOutcome::Moved { from: Point::new(0, 0), to: Point::new(1, 0) }
        );
    }

    #[test]
    fn test_wall_events_survive_update() {
        let mut plane = plane();
        let mut runner = PlaneObject::new(&plane, 9, 0, "runner");
        runner.translate(1, 0);
        plane.update(&true, [&mut runner]).unwrap();

        assert_eq!(runner.position(), Point::new(9, 0));
        assert_eq!(runner.events().len(), 1);
        assert_eq!(runner.events()[0].collider, Collider::Wall);
    }
}
