//! Game Logic Module
//!
//! Planes, the objects drawn on them, and the session helpers that drive
//! them. Single-threaded: every mutation goes through `&mut`.
//!
//! ## Module Structure
//!
//! - `object`: Positioned objects, wall clamping, pursuit AI
//! - `plane`: Grid + registry, batched updates, rendering
//! - `collision`: Registry scans used during updates
//! - `raster`: Line descriptors to cell objects
//! - `events`: Collision, lifecycle and turn notifications
//! - `session`: Game on/off state
//! - `turns`: Player rotation

pub mod object;
pub mod plane;
pub mod collision;
pub mod raster;
pub mod events;
pub mod session;
pub mod turns;

// Re-export key types
pub use object::{PlaneObject, AiError, AiState, PursuitTarget, StepOutcome};
pub use plane::{Plane, PlaneId, PlaneError, ActivityGate, ObjectRecord, UpdateReport};
pub use raster::{LineRasterizer, PathError, parse_path, bresenham};
pub use events::{Collider, CollisionEvent, LifecycleEvent, TurnEvent, WALL_ID};
pub use session::Game;
pub use turns::{Turns, Player, TurnsError};
