//! Game Events
//!
//! Notifications produced by planes, games and turn rotations.
//! Objects queue their collision events in an outbox; games and turn
//! rotations queue lifecycle events the same way.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

use crate::core::point::Point;

/// Id and display value reported for wall contact.
pub const WALL_ID: &str = "wall";

/// What an object collided with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Collider<V> {
    /// A plane edge. Serializes as `{"id":"wall","value":"wall"}`.
    Wall,
    /// Another object, as the plane knew it when the collision happened.
    Object {
        /// Id of the other object
        id: String,
        /// Display value of the other object
        value: V,
        /// Cell where the two met
        position: Point,
    },
}

impl<V> Collider<V> {
    /// Id of the collider (`"wall"` for walls).
    pub fn id(&self) -> &str {
        match self {
            Self::Wall => WALL_ID,
            Self::Object { id, .. } => id,
        }
    }

    /// Check if this is wall contact.
    pub fn is_wall(&self) -> bool {
        matches!(self, Self::Wall)
    }
}

impl<V: Serialize> Serialize for Collider<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Wall => {
                let mut state = serializer.serialize_struct("Collider", 2)?;
                state.serialize_field("id", WALL_ID)?;
                state.serialize_field("value", WALL_ID)?;
                state.end()
            }
            Self::Object { id, value, position } => {
                let mut state = serializer.serialize_struct("Collider", 3)?;
                state.serialize_field("id", id)?;
                state.serialize_field("value", value)?;
                state.serialize_field("position", position)?;
                state.end()
            }
        }
    }
}

/// A collision delivered to one object.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CollisionEvent<V> {
    /// Position of the receiving object when the collision happened
    pub at: Point,
    /// The other party
    pub collider: Collider<V>,
}

impl<V> CollisionEvent<V> {
    /// Create a wall collision event.
    pub fn wall(at: Point) -> Self {
        Self {
            at,
            collider: Collider::Wall,
        }
    }

    /// Create an object collision event.
    pub fn object(at: Point, id: impl Into<String>, value: V) -> Self {
        Self {
            at,
            collider: Collider::Object {
                id: id.into(),
                value,
                position: at,
            },
        }
    }
}

/// Game session lifecycle notifications.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The game became active
    Started,
    /// The game stopped, optionally with a caller supplied reason
    Ended {
        /// Free-form reason forwarded to listeners
        reason: Option<String>,
    },
    /// The game failed; always followed by `Ended`
    Errored {
        /// Error description
        message: String,
    },
}

/// Turn rotation notifications.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// Rotation started
    Started {
        /// First player, if any are registered
        first: Option<String>,
    },
    /// The current player changed
    Advanced {
        /// Player whose turn it is now
        player: String,
        /// Whether the change came from an explicit override
        overridden: bool,
    },
}
