//! Plane Objects
//!
//! Positioned, identified entities drawn on a plane.
//!
//! ## Coordinates
//!
//! Setters clamp into the plane and raise a wall collision when they do.
//! Construction records the given position as the object's `origin` without
//! clamping; `Plane::update` rejects positions that are still invalid.
//!
//! ## Pursuit AI
//!
//! Objects built with `.ai(true)` can chase a target one cell per `step`,
//! moving diagonally when both axes differ. There is no obstacle avoidance.

use thiserror::Error;
use tracing::{debug, trace};

use crate::config::WallPolicy;
use crate::core::point::{Bounds, Point};
use crate::game::events::{Collider, CollisionEvent};
use crate::game::plane::{Plane, PlaneId};

/// Pursuit AI errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    /// The object was not built with AI enabled.
    #[error("{id} is not an AI")]
    NotAnAi {
        /// Object id
        id: String,
    },

    /// `step`/`stop_pursuit` called before `start_pursuit`.
    #[error("AI {id} has not been started")]
    NotRunning {
        /// Object id
        id: String,
    },

    /// The target cannot be pursued by this object.
    #[error("{pursuer} cannot pursue {target}: {reason}")]
    InvalidTarget {
        /// Pursuer id
        pursuer: String,
        /// Rejected target id
        target: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

/// Target of a running pursuit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PursuitTarget {
    /// Target object id
    pub id: String,
    /// Last known target position
    pub position: Point,
}

/// Pursuit state, present only on AI objects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiState {
    /// Current target, set by `start_pursuit` or a step override
    pub target: Option<PursuitTarget>,
    /// Whether the pursuit is running
    pub running: bool,
}

/// Result of a pursuit step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Already on the target's cell; nothing moved.
    Arrived {
        /// Shared position
        at: Point,
    },
    /// Moved one cell (possibly diagonally).
    Moved {
        /// Position before the step
        from: Point,
        /// Position after the step (after clamping)
        to: Point,
    },
}

/// An object that can be placed on a plane.
#[derive(Clone, Debug)]
pub struct PlaneObject<V = String> {
    id: String,
    value: V,
    position: Point,
    origin: Point,
    bounds: Bounds,
    plane_id: PlaneId,
    wall_policy: WallPolicy,
    detect_collision: bool,
    ai: Option<AiState>,
    /// Collision outbox, drained by the owner
    events: Vec<CollisionEvent<V>>,
}

impl<V: Clone> PlaneObject<V> {
    /// Create an object whose display value is its id.
    pub fn new(plane: &Plane<V>, x: i32, y: i32, id: impl Into<String>) -> Self
    where
        V: From<String>,
    {
        let id = id.into();
        let value = V::from(id.clone());
        Self::with_value(plane, x, y, id, value)
    }

    /// Create an object with an explicit display value.
    pub fn with_value(plane: &Plane<V>, x: i32, y: i32, id: impl Into<String>, value: V) -> Self {
        let position = Point::new(x, y);
        Self {
            id: id.into(),
            value,
            position,
            origin: position,
            bounds: plane.bounds(),
            plane_id: plane.id(),
            wall_policy: plane.config().wall_policy,
            detect_collision: true,
            ai: None,
            events: Vec::new(),
        }
    }

    /// Set whether object collisions are reported (default true).
    pub fn detect_collision(mut self, detect: bool) -> Self {
        self.detect_collision = detect;
        self
    }

    /// Enable or disable pursuit AI (default disabled).
    pub fn ai(mut self, enabled: bool) -> Self {
        self.ai = enabled.then(AiState::default);
        self
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Replace the display value.
    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    /// X coordinate.
    pub fn x(&self) -> i32 {
        self.position.x
    }

    /// Y coordinate.
    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// Current position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Position given at construction.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Whether object collisions are reported.
    pub fn detects_collision(&self) -> bool {
        self.detect_collision
    }

    /// Id of the plane this object belongs to.
    pub fn plane_id(&self) -> PlaneId {
        self.plane_id
    }

    /// Extents of the owning plane.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    // =========================================================================
    // MOVEMENT
    // =========================================================================

    /// Set x, clamping into `[0, columns - 1]`.
    ///
    /// Clamping raises a wall collision.
    pub fn set_x(&mut self, x: i32) {
        let clamped = x.clamp(0, self.bounds.max_x());
        self.position.x = clamped;
        if clamped != x {
            trace!(id = %self.id, requested = x, clamped, "x clamped to wall");
            self.hit_wall();
        }
    }

    /// Set y, clamping into `[0, rows - 1]`.
    ///
    /// Clamping raises a wall collision.
    pub fn set_y(&mut self, y: i32) {
        let clamped = y.clamp(0, self.bounds.max_y());
        self.position.y = clamped;
        if clamped != y {
            trace!(id = %self.id, requested = y, clamped, "y clamped to wall");
            self.hit_wall();
        }
    }

    /// Set both coordinates. Each clamped axis raises its own wall collision.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.set_x(x);
        self.set_y(y);
    }

    /// Move by a delta on each axis.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        let next = self.position.offset(dx, dy);
        self.set_position(next.x, next.y);
    }

    // =========================================================================
    // COLLISIONS
    // =========================================================================

    /// Report a collision to this object.
    ///
    /// No-op when `detect_collision` is false.
    pub fn notify_collision(&mut self, collider: Collider<V>) {
        if self.detect_collision {
            self.events.push(CollisionEvent {
                at: self.position,
                collider,
            });
        }
    }

    fn hit_wall(&mut self) {
        match self.wall_policy {
            WallPolicy::Always => self.events.push(CollisionEvent::wall(self.position)),
            WallPolicy::RespectDetectCollision => self.notify_collision(Collider::Wall),
        }
    }

    /// Pending collision events, oldest first.
    pub fn events(&self) -> &[CollisionEvent<V>] {
        &self.events
    }

    /// Drain pending collision events.
    pub fn take_events(&mut self) -> Vec<CollisionEvent<V>> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // PURSUIT AI
    // =========================================================================

    /// Whether this object was built with AI enabled.
    pub fn is_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// Pursuit state, if this is an AI object.
    pub fn ai_state(&self) -> Option<&AiState> {
        self.ai.as_ref()
    }

    /// Whether a pursuit is running.
    pub fn is_pursuing(&self) -> bool {
        self.ai.as_ref().is_some_and(|ai| ai.running)
    }

    /// Start chasing `target`.
    pub fn start_pursuit(&mut self, target: &PlaneObject<V>) -> Result<(), AiError> {
        if self.ai.is_none() {
            return Err(self.not_an_ai());
        }
        let chosen = self.validate_target(target)?;

        if let Some(ai) = self.ai.as_mut() {
            ai.target = Some(chosen);
            ai.running = true;
        }
        debug!(pursuer = %self.id, target = %target.id, "pursuit started");
        Ok(())
    }

    /// Step one cell toward the target.
    ///
    /// `target_override` replaces the stored target for this and later steps.
    /// Without one, the goal is the target position remembered at
    /// `start_pursuit` (or the last override); it does not follow the target
    /// as it moves. Use `Plane::pursue` to chase the target's last drawn
    /// position, or pass the target again each step.
    pub fn step(&mut self, target_override: Option<&PlaneObject<V>>) -> Result<StepOutcome, AiError> {
        self.ensure_running()?;

        if let Some(target) = target_override {
            let chosen = self.validate_target(target)?;
            if let Some(ai) = self.ai.as_mut() {
                ai.target = Some(chosen);
            }
        }

        let goal = match self.ai.as_ref().and_then(|ai| ai.target.as_ref()) {
            Some(target) => target.position,
            None => return Err(self.not_running()),
        };

        let from = self.position;
        let (dx, dy) = from.step_toward(goal);
        if dx == 0 && dy == 0 {
            return Ok(StepOutcome::Arrived { at: from });
        }

        self.translate(dx, dy);
        trace!(id = %self.id, %from, to = %self.position, "pursuit step");
        Ok(StepOutcome::Moved {
            from,
            to: self.position,
        })
    }

    /// Stop the running pursuit. The target is kept.
    pub fn stop_pursuit(&mut self) -> Result<(), AiError> {
        self.ensure_running()?;
        if let Some(ai) = self.ai.as_mut() {
            ai.running = false;
        }
        debug!(pursuer = %self.id, "pursuit stopped");
        Ok(())
    }

    /// Fail unless this is an AI with a running pursuit.
    pub fn ensure_running(&self) -> Result<(), AiError> {
        match &self.ai {
            None => Err(self.not_an_ai()),
            Some(ai) if !ai.running => Err(self.not_running()),
            Some(_) => Ok(()),
        }
    }

    /// Update the remembered target position without switching targets.
    pub(crate) fn track_target(&mut self, position: Point) {
        if let Some(target) = self.ai.as_mut().and_then(|ai| ai.target.as_mut()) {
            target.position = position;
        }
    }

    fn validate_target(&self, target: &PlaneObject<V>) -> Result<PursuitTarget, AiError> {
        let reason = if target.id == self.id {
            Some("an object cannot pursue itself")
        } else if target.plane_id != self.plane_id {
            Some("target belongs to a different plane")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AiError::InvalidTarget {
                pursuer: self.id.clone(),
                target: target.id.clone(),
                reason,
            }),
            None => Ok(PursuitTarget {
                id: target.id.clone(),
                position: target.position,
            }),
        }
    }

    fn not_an_ai(&self) -> AiError {
        AiError::NotAnAi { id: self.id.clone() }
    }

    fn not_running(&self) -> AiError {
        AiError::NotRunning { id: self.id.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaneConfig;

    fn plane() -> Plane {
        Plane::new(10, 10, "empty".to_string()).unwrap()
    }

    fn wall_count(object: &PlaneObject) -> usize {
        object.events().iter().filter(|e| e.collider.is_wall()).count()
    }

    #[test]
    fn test_construction_defaults() {
        let plane = plane();
        let bag = PlaneObject::new(&plane, 2, 6, "bag");

        assert_eq!(bag.id(), "bag");
        assert_eq!(bag.value(), "bag");
        assert_eq!((bag.x(), bag.y()), (2, 6));
        assert_eq!(bag.origin(), Point::new(2, 6));
        assert!(bag.detects_collision());
        assert!(!bag.is_ai());
        assert_eq!(bag.plane_id(), plane.id());
    }

    #[test]
    fn test_set_value_redraws_on_next_update() {
        let mut plane = Plane::new(2, 2, ".".to_string()).unwrap();
        let mut bag = PlaneObject::new(&plane, 0, 0, "bag");
        plane.update(&true, [&mut bag]).unwrap();
        assert_eq!(plane.lookup_at(0, 0).unwrap().map(String::as_str), Some("bag"));

        bag.set_value("open".to_string());
        plane.update(&true, [&mut bag]).unwrap();
        assert_eq!(plane.lookup_at(0, 0).unwrap().map(String::as_str), Some("open"));
        assert_eq!(plane.record("bag").map(|r| r.value.as_str()), Some("open"));
    }

    #[test]
    fn test_origin_is_fixed() {
        let plane = plane();
        let mut bag = PlaneObject::new(&plane, 2, 6, "bag");
        bag.set_position(4, 4);
        assert_eq!(bag.position(), Point::new(4, 4));
        assert_eq!(bag.origin(), Point::new(2, 6));
    }

    #[test]
    fn test_clamp_high_raises_one_wall() {
        let plane = Plane::new(5, 8, ".".to_string()).unwrap();
        let mut obj = PlaneObject::new(&plane, 1, 1, "o");

        obj.set_x(8 + 3);
        assert_eq!(obj.x(), 7);
        assert_eq!(wall_count(&obj), 1);

        obj.take_events();
        obj.set_y(5 + 1);
        assert_eq!(obj.y(), 4);
        assert_eq!(wall_count(&obj), 1);
    }

    #[test]
    fn test_clamp_negative_raises_one_wall() {
        let plane = plane();
        let mut obj = PlaneObject::new(&plane, 3, 3, "o");

        obj.set_x(-4);
        assert_eq!(obj.x(), 0);
        assert_eq!(wall_count(&obj), 1);
        assert_eq!(obj.events()[0].at, Point::new(0, 3));
    }

    #[test]
    fn test_in_range_set_is_silent() {
        let plane = plane();
        let mut obj = PlaneObject::new(&plane, 3, 3, "o");
        obj.set_position(0, 9);
        assert!(obj.events().is_empty());
    }

    #[test]
    fn test_wall_ignores_detect_collision_by_default() {
        let plane = plane();
        let mut ghost = PlaneObject::new(&plane, 0, 0, "ghost").detect_collision(false);

        ghost.set_x(-1);
        assert_eq!(wall_count(&ghost), 1);

        ghost.notify_collision(Collider::Object {
            id: "other".to_string(),
            value: "other".to_string(),
            position: Point::ORIGIN,
        });
        assert_eq!(ghost.events().len(), 1);
    }

    #[test]
    fn test_wall_policy_respects_detect_collision() {
        let config = PlaneConfig::default().with_wall_policy(WallPolicy::RespectDetectCollision);
        let plane = Plane::with_config(10, 10, ".".to_string(), config).unwrap();
        let mut ghost = PlaneObject::new(&plane, 0, 0, "ghost").detect_collision(false);

        ghost.set_x(-1);
        assert_eq!(ghost.x(), 0);
        assert!(ghost.events().is_empty());

        let mut solid = PlaneObject::new(&plane, 0, 0, "solid");
        solid.set_y(100);
        assert_eq!(wall_count(&solid), 1);
    }

    #[test]
    fn test_take_events_drains() {
        let plane = plane();
        let mut obj = PlaneObject::new(&plane, 0, 0, "o");
        obj.set_x(-1);
        obj.set_y(-1);
        assert_eq!(obj.take_events().len(), 2);
        assert!(obj.events().is_empty());
    }

    #[test]
    fn test_ai_preconditions() {
        let plane = plane();
        let mut rock = PlaneObject::new(&plane, 0, 0, "rock");
        let mut hunter = PlaneObject::new(&plane, 0, 0, "hunter").ai(true);
        let prey = PlaneObject::new(&plane, 5, 5, "prey");

        assert_eq!(
            rock.start_pursuit(&prey),
            Err(AiError::NotAnAi { id: "rock".to_string() })
        );
        assert!(matches!(rock.step(None), Err(AiError::NotAnAi { .. })));
        assert!(matches!(rock.stop_pursuit(), Err(AiError::NotAnAi { .. })));

        assert!(matches!(hunter.step(None), Err(AiError::NotRunning { .. })));
        assert!(matches!(hunter.stop_pursuit(), Err(AiError::NotRunning { .. })));

        let me = hunter.clone();
        assert!(matches!(
            hunter.start_pursuit(&me),
            Err(AiError::InvalidTarget { .. })
        ));

        let elsewhere = Plane::new(10, 10, ".".to_string()).unwrap();
        let foreign = PlaneObject::new(&elsewhere, 1, 1, "foreign");
        assert!(matches!(
            hunter.start_pursuit(&foreign),
            Err(AiError::InvalidTarget { .. })
        ));
        assert!(!hunter.is_pursuing());
    }

    #[test]
    fn test_step_moves_diagonally_then_arrives() {
        let plane = plane();
        let mut hunter = PlaneObject::new(&plane, 0, 0, "hunter").ai(true);
        let prey = PlaneObject::new(&plane, 2, 1, "prey");

        hunter.start_pursuit(&prey).unwrap();
        assert!(hunter.is_pursuing());

        assert_eq!(
            hunter.step(None).unwrap(),
            StepOutcome::Moved { from: Point::new(0, 0), to: Point::new(1, 1) }
        );
        assert_eq!(
            hunter.step(None).unwrap(),
            StepOutcome::Moved { from: Point::new(1, 1), to: Point::new(2, 1) }
        );
        assert_eq!(
            hunter.step(None).unwrap(),
            StepOutcome::Arrived { at: Point::new(2, 1) }
        );
        assert!(hunter.events().is_empty());
    }

    #[test]
    fn test_step_override_switches_target() {
        let plane = plane();
        let mut hunter = PlaneObject::new(&plane, 5, 5, "hunter").ai(true);
        let east = PlaneObject::new(&plane, 9, 5, "east");
        let west = PlaneObject::new(&plane, 0, 5, "west");

        hunter.start_pursuit(&east).unwrap();
        hunter.step(Some(&west)).unwrap();
        assert_eq!(hunter.x(), 4);

        // Later steps keep chasing the override
        hunter.step(None).unwrap();
        assert_eq!(hunter.x(), 3);
        let target = hunter.ai_state().and_then(|ai| ai.target.clone()).unwrap();
        assert_eq!(target.id, "west");
    }

    #[test]
    fn test_stop_pursuit() {
        let plane = plane();
        let mut hunter = PlaneObject::new(&plane, 0, 0, "hunter").ai(true);
        let prey = PlaneObject::new(&plane, 3, 3, "prey");

        hunter.start_pursuit(&prey).unwrap();
        hunter.stop_pursuit().unwrap();
        assert!(!hunter.is_pursuing());
        assert!(matches!(hunter.step(None), Err(AiError::NotRunning { .. })));
    }
}
