//! Per-player turn bookkeeping.
//!
//! Sessions are created lazily the first time a player flips and are never
//! destroyed; an idle session holds nothing.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, Position};

/// Where a player is in their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Next flip is a first card.
    Idle,
    /// Holding one card; next flip is a second card.
    HoldingFirst,
    /// Holding a matched pair; next flip removes it first.
    HoldingPair,
    /// Two cards turned up without a match; next flip turns them down first.
    Unmatched,
}

/// Cards a player has turned this turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSession {
    /// First card of the turn.
    ///
    /// Kept after a mismatch so the next turn's cleanup can find it.
    pub first: Option<Position>,

    /// Second card of the turn.
    pub second: Option<Position>,

    /// Did the two cards match?
    pub matched: bool,
}

impl PlayerSession {
    /// Current phase of the turn.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        match (self.first, self.second) {
            (Some(_), None) => TurnPhase::HoldingFirst,
            (Some(_), Some(_)) if self.matched => TurnPhase::HoldingPair,
            (Some(_), Some(_)) => TurnPhase::Unmatched,
            (None, _) => TurnPhase::Idle,
        }
    }

    /// Does this session record `pos`?
    #[must_use]
    pub fn records(&self, pos: Position) -> bool {
        self.first == Some(pos) || self.second == Some(pos)
    }

    /// Back to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Sessions by player.
#[derive(Clone, Debug, Default)]
pub struct SessionTable {
    sessions: FxHashMap<PlayerId, PlayerSession>,
}

impl SessionTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a player's session, if they have ever flipped.
    #[must_use]
    pub fn get(&self, player: &PlayerId) -> Option<&PlayerSession> {
        self.sessions.get(player)
    }

    /// Get a player's session, creating an idle one on first use.
    pub fn session_mut(&mut self, player: &PlayerId) -> &mut PlayerSession {
        self.sessions.entry(player.clone()).or_default()
    }

    /// Phase of a player's turn. Unknown players are idle.
    #[must_use]
    pub fn phase(&self, player: &PlayerId) -> TurnPhase {
        self.get(player).map_or(TurnPhase::Idle, PlayerSession::phase)
    }

    /// Iterate over all sessions.
    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &PlayerSession)> {
        self.sessions.iter()
    }

    /// Number of players seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// No player has flipped yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
