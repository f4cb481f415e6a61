//! Game Session
//!
//! The on/off switch a plane consults on every update, plus lifecycle
//! notifications for whoever drives the ticks.

use std::fmt;
use tracing::{debug, info};

use crate::game::events::LifecycleEvent;
use crate::game::plane::{ActivityGate, Plane};

/// A single game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    id: String,
    active: bool,
    events: Vec<LifecycleEvent>,
}

impl Game {
    /// Create an inactive game.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: false,
            events: Vec::new(),
        }
    }

    /// Game identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the game is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start the game.
    pub fn start(&mut self) {
        self.active = true;
        self.events.push(LifecycleEvent::Started);
        info!(game = %self.id, "game started");
    }

    /// End the game.
    pub fn end(&mut self, reason: Option<String>) {
        self.active = false;
        debug!(game = %self.id, reason = ?reason, "game ended");
        self.events.push(LifecycleEvent::Ended { reason });
    }

    /// End the game and blank the plane it was drawn on.
    pub fn end_and_clear<V: Clone + PartialEq>(&mut self, plane: &mut Plane<V>, reason: Option<String>) {
        self.end(reason);
        plane.clear();
    }

    /// Fail the game: report the error, then end it.
    pub fn fail(&mut self, error: impl fmt::Display) {
        let message = error.to_string();
        info!(game = %self.id, %message, "game failed");
        self.events.push(LifecycleEvent::Errored { message });
        self.end(None);
    }

    /// Pending lifecycle events, oldest first.
    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    /// Drain pending lifecycle events.
    pub fn take_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ActivityGate for Game {
    fn is_active(&self) -> bool {
        self.active
    }
}
