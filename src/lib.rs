//! # Plane Engine
//!
//! Text-rendered 2D grids for chat-bot style turn-based games.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PLANE ENGINE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Grid primitives                           │
//! │  ├── point.rs    - Coordinates and plane extents             │
//! │  ├── grid.rs     - Row-major storage, y-axis inversion       │
//! │  └── hash.rs     - Render digests                            │
//! │                                                              │
//! │  game/           - Objects and planes                        │
//! │  ├── object.rs   - PlaneObject, clamping, pursuit AI         │
//! │  ├── plane.rs    - Registry, batched updates, rendering      │
//! │  ├── collision.rs- Registry collision scans                  │
//! │  ├── raster.rs   - Bresenham line objects                    │
//! │  ├── events.rs   - Collision / lifecycle / turn events       │
//! │  ├── session.rs  - Game on/off state                         │
//! │  └── turns.rs    - Player rotation                           │
//! │                                                              │
//! │  config.rs       - Policies and render defaults              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Coordinates
//!
//! (0, 0) is the bottom-left cell. x runs over columns, y over rows.
//!
//! ## Example
//!
//! ```
//! use plane_engine::{Game, Plane, PlaneObject};
//!
//! let mut game = Game::new("demo");
//! game.start();
//!
//! let mut plane = Plane::new(3, 3, ".".to_string()).unwrap();
//! let mut bag = PlaneObject::with_value(&plane, 1, 0, "bag", "b".to_string());
//! plane.update(&game, [&mut bag]).unwrap();
//!
//! assert_eq!(plane.render(), "...\n...\n.b.");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{PlaneConfig, WallPolicy, CollisionPolicy, RegistryPolicy, ConfigError};
pub use core::{Point, Bounds, GridStore, GridError, RenderDigest};
pub use game::{
    Plane, PlaneId, PlaneError, ActivityGate, UpdateReport,
    PlaneObject, AiError, StepOutcome,
    LineRasterizer, PathError,
    Collider, CollisionEvent, LifecycleEvent, TurnEvent,
    Game, Turns, Player, TurnsError,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
