//! Turn Rotation
//!
//! Cycles through players for turn-based games. Players are identified by id;
//! the rotation keeps its place when players join, leave or the order flips.

use thiserror::Error;
use tracing::debug;

use crate::game::events::TurnEvent;

/// A participant in the rotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Player {
    /// Unique player id
    pub id: String,
    /// Display name
    pub name: String,
}

impl Player {
    /// Create a player.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Turn rotation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnsError {
    /// Override or removal named a player outside the rotation.
    #[error("player {0} is not part of the rotation")]
    UnknownPlayer(String),

    /// A player id was added twice.
    #[error("player {0} is already part of the rotation")]
    DuplicatePlayer(String),
}

/// Where the rotation stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
    /// No turn taken yet; the next turn goes to the first player
    Unstarted,
    /// Index of the current player
    At(usize),
    /// The current player left; the next turn goes to this index
    Vacated(usize),
}

/// Player rotation.
#[derive(Clone, Debug)]
pub struct Turns {
    players: Vec<Player>,
    cursor: Cursor,
    events: Vec<TurnEvent>,
}

impl Turns {
    /// Create a rotation. Later duplicates of an id are dropped.
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        let mut turns = Self {
            players: Vec::new(),
            cursor: Cursor::Unstarted,
            events: Vec::new(),
        };
        for player in players {
            let _ = turns.add_player(player);
        }
        turns
    }

    /// Players in turn order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Player whose turn it is, if any.
    pub fn current(&self) -> Option<&Player> {
        match self.cursor {
            Cursor::At(idx) => self.players.get(idx),
            _ => None,
        }
    }

    /// Append a player to the end of the rotation.
    pub fn add_player(&mut self, player: Player) -> Result<(), TurnsError> {
        if self.position(&player.id).is_some() {
            return Err(TurnsError::DuplicatePlayer(player.id));
        }
        self.players.push(player);
        Ok(())
    }

    /// Remove a player. Removing the current player hands the next turn to
    /// whoever followed them.
    pub fn remove_player(&mut self, id: &str) -> Result<Player, TurnsError> {
        let idx = self
            .position(id)
            .ok_or_else(|| TurnsError::UnknownPlayer(id.to_string()))?;
        let removed = self.players.remove(idx);

        self.cursor = match self.cursor {
            Cursor::At(cur) if cur == idx => Cursor::Vacated(idx),
            Cursor::At(cur) if cur > idx => Cursor::At(cur - 1),
            Cursor::Vacated(next) if next > idx => Cursor::Vacated(next - 1),
            other => other,
        };
        if self.players.is_empty() {
            self.cursor = Cursor::Unstarted;
        }
        Ok(removed)
    }

    /// Begin the rotation with the first player.
    pub fn start(&mut self) {
        self.cursor = if self.players.is_empty() {
            Cursor::Unstarted
        } else {
            Cursor::At(0)
        };
        let first = self.current().map(|p| p.id.clone());
        debug!(first = ?first, players = self.players.len(), "turns started");
        self.events.push(TurnEvent::Started { first });
    }

    /// Advance to the next player, or jump to `override_id`.
    ///
    /// Jumping to a player who just had a turn gives them an extra one.
    pub fn next_turn(&mut self, override_id: Option<&str>) -> Result<Option<&Player>, TurnsError> {
        let len = self.players.len();
        let overridden = override_id.is_some();

        let next = match override_id {
            Some(id) => Some(
                self.position(id)
                    .ok_or_else(|| TurnsError::UnknownPlayer(id.to_string()))?,
            ),
            None if len == 0 => None,
            None => Some(match self.cursor {
                Cursor::Unstarted => 0,
                Cursor::At(idx) => (idx + 1) % len,
                Cursor::Vacated(idx) => idx % len,
            }),
        };

        self.cursor = next.map_or(Cursor::Unstarted, Cursor::At);
        if let Some(player) = self.current() {
            let player = player.id.clone();
            debug!(%player, overridden, "turn advanced");
            self.events.push(TurnEvent::Advanced { player, overridden });
        }
        Ok(self.current())
    }

    /// Reverse the turn order. The current player keeps the turn.
    pub fn reverse_order(&mut self) {
        let len = self.players.len();
        self.players.reverse();
        self.cursor = match self.cursor {
            Cursor::At(idx) => Cursor::At(len - 1 - idx),
            // The old predecessor of the gap is now its successor
            Cursor::Vacated(idx) if len > 0 => Cursor::Vacated((len - idx) % len),
            other => other,
        };
    }

    /// Pending turn events, oldest first.
    pub fn events(&self) -> &[TurnEvent] {
        &self.events
    }

    /// Drain pending turn events.
    pub fn take_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.events)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Turns {
        Turns::new([
            Player::new("a", "Ann"),
            Player::new("b", "Bo"),
            Player::new("c", "Cy"),
        ])
    }

    fn current_id(turns: &Turns) -> Option<&str> {
        turns.current().map(|p| p.id.as_str())
    }

    #[test]
    fn test_rotation_wraps() {
        let mut turns = table();
        assert_eq!(current_id(&turns), None);

        turns.start();
        assert_eq!(current_id(&turns), Some("a"));

        turns.next_turn(None).unwrap();
        turns.next_turn(None).unwrap();
        assert_eq!(current_id(&turns), Some("c"));
        turns.next_turn(None).unwrap();
        assert_eq!(current_id(&turns), Some("a"));
    }

    #[test]
    fn test_next_turn_without_start_begins_at_first() {
        let mut turns = table();
        let first = turns.next_turn(None).unwrap().map(|p| p.id.clone());
        assert_eq!(first.as_deref(), Some("a"));
    }

    #[test]
    fn test_override_grants_extra_turn() {
        let mut turns = table();
        turns.start();
        turns.next_turn(None).unwrap();

        turns.next_turn(Some("b")).unwrap();
        assert_eq!(current_id(&turns), Some("b"));
        turns.next_turn(None).unwrap();
        assert_eq!(current_id(&turns), Some("c"));

        assert_eq!(
            turns.next_turn(Some("zed")).unwrap_err(),
            TurnsError::UnknownPlayer("zed".to_string())
        );
        assert_eq!(current_id(&turns), Some("c"));
    }

    #[test]
    fn test_remove_current_hands_turn_to_successor() {
        let mut turns = table();
        turns.start();
        turns.next_turn(None).unwrap();

        let removed = turns.remove_player("b").unwrap();
        assert_eq!(removed.name, "Bo");
        assert_eq!(current_id(&turns), None);

        turns.next_turn(None).unwrap();
        assert_eq!(current_id(&turns), Some("c"));
        assert!(turns.remove_player("b").is_err());
    }

    #[test]
    fn test_remove_before_current_keeps_turn() {
        let mut turns = table();
        turns.start();
        turns.next_turn(Some("c")).unwrap();

        turns.remove_player("a").unwrap();
        assert_eq!(current_id(&turns), Some("c"));
        turns.next_turn(None).unwrap();
        assert_eq!(current_id(&turns), Some("b"));
    }

    #[test]
    fn test_reverse_keeps_current_player() {
        let mut turns = table();
        turns.start();
        turns.next_turn(None).unwrap();

        turns.reverse_order();
        assert_eq!(current_id(&turns), Some("b"));
        turns.next_turn(None).unwrap();
        assert_eq!(current_id(&turns), Some("a"));
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut turns = table();
        assert_eq!(
            turns.add_player(Player::new("a", "Again")),
            Err(TurnsError::DuplicatePlayer("a".to_string()))
        );
        assert_eq!(turns.players().len(), 3);
    }

    #[test]
    fn test_events() {
        let mut turns = table();
        turns.start();
        turns.next_turn(Some("c")).unwrap();
        assert_eq!(
            turns.take_events(),
            vec![
                TurnEvent::Started { first: Some("a".to_string()) },
                TurnEvent::Advanced { player: "c".to_string(), overridden: true },
            ]
        );
    }

    #[test]
    fn test_empty_rotation() {
        let mut turns = Turns::new(Vec::new());
        turns.start();
        assert!(turns.next_turn(None).unwrap().is_none());
    }
}
