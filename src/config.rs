//! Plane Configuration
//!
//! Policies that decide how a plane reacts to walls, collisions and objects
//! that drop out of an update batch, plus the default render separators.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Environment variable for [`WallPolicy`].
pub const ENV_WALL_POLICY: &str = "PLANE_WALL_POLICY";
/// Environment variable for [`CollisionPolicy`].
pub const ENV_COLLISION_POLICY: &str = "PLANE_COLLISION_POLICY";
/// Environment variable for [`RegistryPolicy`].
pub const ENV_REGISTRY_POLICY: &str = "PLANE_REGISTRY_POLICY";
/// Environment variable for the separator placed between cells of a row.
pub const ENV_ROW_SEPARATOR: &str = "PLANE_ROW_SEPARATOR";
/// Environment variable for the separator placed between rows.
pub const ENV_COLUMN_SEPARATOR: &str = "PLANE_COLUMN_SEPARATOR";

/// How wall contact interacts with an object's `detect_collision` flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WallPolicy {
    /// Clamping always raises a wall collision, even for objects that
    /// ignore other objects.
    #[default]
    Always,
    /// Wall collisions are suppressed together with object collisions.
    RespectDetectCollision,
}

/// What `Plane::update` does when a colliding object lands on an occupied cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Deliver a collision event and let draw order decide the cell.
    #[default]
    Notify,
    /// Fail the update with `CollisionConflict`, leaving the plane untouched.
    Reject,
}

/// What happens to registered objects that are missing from an update batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryPolicy {
    /// Keep their last known record (still collidable, still redrawn when idle).
    #[default]
    Retain,
    /// Drop them from the registry.
    EvictOmitted,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A policy name was not recognised.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// Rejected value
        value: String,
    },
}

/// Plane configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneConfig {
    /// Wall notification policy handed to objects built against the plane
    pub wall_policy: WallPolicy,
    /// Collision handling during updates
    pub collision_policy: CollisionPolicy,
    /// Registry retention for omitted objects
    pub registry_policy: RegistryPolicy,
    /// Joins the cells of one row in `Plane::render`
    pub row_separator: String,
    /// Joins rows in `Plane::render`
    pub column_separator: String,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            wall_policy: WallPolicy::Always,
            collision_policy: CollisionPolicy::Notify,
            registry_policy: RegistryPolicy::Retain,
            // Emoji boards read best without a cell separator
            row_separator: String::new(),
            column_separator: "\n".to_string(),
        }
    }
}

impl PlaneConfig {
    /// Create config from environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_WALL_POLICY) {
            config.wall_policy = value.parse()?;
        }
        if let Some(value) = lookup(ENV_COLLISION_POLICY) {
            config.collision_policy = value.parse()?;
        }
        if let Some(value) = lookup(ENV_REGISTRY_POLICY) {
            config.registry_policy = value.parse()?;
        }
        if let Some(value) = lookup(ENV_ROW_SEPARATOR) {
            config.row_separator = unescape_separator(&value);
        }
        if let Some(value) = lookup(ENV_COLUMN_SEPARATOR) {
            config.column_separator = unescape_separator(&value);
        }

        Ok(config)
    }

    /// Set the wall policy.
    pub fn with_wall_policy(mut self, policy: WallPolicy) -> Self {
        self.wall_policy = policy;
        self
    }

    /// Set the collision policy.
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Set the registry policy.
    pub fn with_registry_policy(mut self, policy: RegistryPolicy) -> Self {
        self.registry_policy = policy;
        self
    }

    /// Set both render separators.
    pub fn with_separators(mut self, row: impl Into<String>, column: impl Into<String>) -> Self {
        self.row_separator = row.into();
        self.column_separator = column.into();
        self
    }
}

/// Environment values cannot easily carry control characters.
fn unescape_separator(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t")
}

impl FromStr for WallPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "respect" | "respect-detect-collision" => Ok(Self::RespectDetectCollision),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_WALL_POLICY,
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notify" => Ok(Self::Notify),
            "reject" => Ok(Self::Reject),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_COLLISION_POLICY,
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for RegistryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "evict" | "evict-omitted" => Ok(Self::EvictOmitted),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_REGISTRY_POLICY,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for WallPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::RespectDetectCollision => f.write_str("respect-detect-collision"),
        }
    }
}
