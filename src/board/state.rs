//! Everything the board lock protects.

use crate::core::PlayerId;
use crate::flip::{FlipProtocol, PlayerSession, SessionTable, TurnPhase};
use crate::grid::GridStore;
use crate::watch::{ChangeBroadcaster, WaitRegistry};

/// Grid, sessions and registries of one board.
///
/// Only ever reached through the board's mutex.
#[derive(Debug)]
pub struct BoardState {
    pub(crate) grid: GridStore,
    pub(crate) sessions: SessionTable,
    pub(crate) waits: WaitRegistry,
    pub(crate) changes: ChangeBroadcaster,
}

impl BoardState {
    /// Fresh state around a grid: no sessions, no waiters, no listeners.
    #[must_use]
    pub fn new(grid: GridStore) -> Self {
        Self {
            grid,
            sessions: SessionTable::new(),
            waits: WaitRegistry::new(),
            changes: ChangeBroadcaster::new(),
        }
    }

    /// Flip rules over this state.
    pub fn protocol(&mut self) -> FlipProtocol<'_> {
        FlipProtocol::new(
            &mut self.grid,
            &mut self.sessions,
            &mut self.waits,
            &mut self.changes,
        )
    }

    /// The grid.
    #[must_use]
    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    /// A player's session, idle if they never flipped.
    #[must_use]
    pub fn session(&self, player: &PlayerId) -> PlayerSession {
        self.sessions.get(player).cloned().unwrap_or_default()
    }

    /// Panic if any cell or session invariant is broken.
    ///
    /// - every empty cell is face down and uncontrolled
    /// - every controlled cell is face up
    /// - a player controls only cells recorded in their session
    /// - a session's recorded cells are controlled as its phase says
    pub fn check_invariants(&self) {
        for (pos, cell) in self.grid.iter() {
            assert!(
                cell.is_consistent(),
                "invariant violated: cell {} is inconsistent: {:?}",
                pos,
                cell
            );
            if let Some(controller) = &cell.controller {
                let recorded = self.sessions.get(controller).is_some_and(|s| s.records(pos));
                assert!(
                    recorded,
                    "invariant violated: {} controls {} outside its session",
                    controller, pos
                );
            }
        }

        for (player, session) in self.sessions.iter() {
            let controls = |pos| {
                self.grid
                    .read_cell(pos)
                    .is_ok_and(|cell| cell.is_controlled_by(player))
            };
            let held: Vec<_> = session.first.into_iter().chain(session.second).collect();
            let expected = match session.phase() {
                TurnPhase::Idle => continue,
                TurnPhase::HoldingFirst | TurnPhase::HoldingPair => true,
                TurnPhase::Unmatched => false,
            };
            for pos in held {
                assert_eq!(
                    controls(pos),
                    expected,
                    "invariant violated: {} in phase {:?} has wrong control of {}",
                    player,
                    session.phase(),
                    pos
                );
            }
        }
    }
}
