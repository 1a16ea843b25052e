//! The flip state machine.
//!
//! `FlipProtocol` borrows the pieces of a locked board and applies one
//! flip step to them. It never blocks: when a first card is controlled by
//! another player it reports [`FlipStep::MustWait`] and the caller decides
//! how to suspend (see `Board::flip`). After waking, the caller simply runs
//! the step again from the top.
//!
//! ## Rules
//!
//! 1. A player's previous turn is resolved first: a matched pair is
//!    removed, an unmatched pair is turned back down unless someone else
//!    has taken a card over since.
//! 2. A first card on an empty cell fails; on a cell controlled by someone
//!    else, the player must wait.
//! 3. A second card never waits. Empty or controlled targets fail and the
//!    first card is given up. Otherwise the card turns up and either
//!    matches (both stay controlled) or not (the first is released).

use tracing::{debug, trace};

use crate::core::error::{FlipError, Result};
use crate::core::{PlayerId, Position};
use crate::grid::GridStore;
use crate::watch::{ChangeBroadcaster, WaitRegistry};

use super::session::{SessionTable, TurnPhase};

/// Outcome of one flip step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipStep {
    /// The flip took effect.
    Done,
    /// The first card is controlled by another player; wait for its
    /// release and step again.
    MustWait,
}

/// Flip rules over the borrowed parts of a locked board.
pub struct FlipProtocol<'a> {
    grid: &'a mut GridStore,
    sessions: &'a mut SessionTable,
    waits: &'a mut WaitRegistry,
    changes: &'a mut ChangeBroadcaster,
}

impl<'a> FlipProtocol<'a> {
    /// Borrow the board parts a flip touches.
    pub fn new(
        grid: &'a mut GridStore,
        sessions: &'a mut SessionTable,
        waits: &'a mut WaitRegistry,
        changes: &'a mut ChangeBroadcaster,
    ) -> Self {
        Self {
            grid,
            sessions,
            waits,
            changes,
        }
    }

    /// Run one flip step for `player` at `pos`.
    ///
    /// Out-of-bounds positions fail before anything is touched.
    pub fn step(&mut self, player: &PlayerId, pos: Position) -> Result<FlipStep> {
        self.grid.check_bounds(pos)?;
        self.finish_previous_turn(player)?;

        match self.sessions.phase(player) {
            TurnPhase::HoldingFirst => self.take_second(player, pos).map(|()| FlipStep::Done),
            _ => self.take_first(player, pos),
        }
    }

    /// Resolve a completed pair from the player's previous turn.
    ///
    /// No-op unless the player has turned two cards.
    pub fn finish_previous_turn(&mut self, player: &PlayerId) -> Result<()> {
        let Some(session) = self.sessions.get(player).cloned() else {
            return Ok(());
        };
        let (Some(first), Some(second)) = (session.first, session.second) else {
            return Ok(());
        };

        let mut changed = false;
        if session.matched {
            for pos in [first, second] {
                let held = self.grid.mutate_cell(pos, |cell| {
                    let held = cell.is_controlled_by(player);
                    if held {
                        cell.remove();
                    }
                    held
                })?;
                assert!(
                    held,
                    "invariant violated: {} no longer controls matched card at {}",
                    player, pos
                );
                let woken = self.waits.release_all(pos);
                trace!("Removed card at {} for {}, woke {} waiters", pos, player, woken);
            }
            debug!("{} cleared matched pair {} and {}", player, first, second);
            changed = true;
        } else {
            for pos in [first, second] {
                // Cards another player has taken over stay as they are.
                changed |= self.grid.mutate_cell(pos, |cell| {
                    let turn = cell.has_card() && cell.face_up && !cell.is_controlled();
                    if turn {
                        cell.turn_face_down();
                    }
                    turn
                })?;
            }
            debug!("{} turned back unmatched pair {} and {}", player, first, second);
        }

        self.sessions.session_mut(player).reset();
        if changed {
            self.changes.announce();
        }
        Ok(())
    }

    fn take_first(&mut self, player: &PlayerId, pos: Position) -> Result<FlipStep> {
        let cell = self.grid.read_cell(pos)?;
        if !cell.has_card() {
            debug!("{} found no first card at {}", player, pos);
            return Err(FlipError::NoCardAtPosition(pos));
        }
        if cell.is_controlled_by_other(player) {
            trace!("{} must wait for card at {}", player, pos);
            return Ok(FlipStep::MustWait);
        }

        self.grid.mutate_cell(pos, |cell| cell.take_control(player))?;
        let session = self.sessions.session_mut(player);
        session.reset();
        session.first = Some(pos);

        debug!("{} took first card at {}", player, pos);
        self.changes.announce();
        Ok(FlipStep::Done)
    }

    fn take_second(&mut self, player: &PlayerId, pos: Position) -> Result<()> {
        let Some(first) = self.sessions.get(player).and_then(|s| s.first) else {
            panic!("invariant violated: {} is holding a first card it never recorded", player);
        };

        let cell = self.grid.read_cell(pos)?;
        if !cell.has_card() {
            self.give_up_first(player, first)?;
            debug!("{} found no second card at {}", player, pos);
            return Err(FlipError::NoCardAtPosition(pos));
        }
        // Never wait here: two players each holding the card the other
        // wants would wait forever.
        if cell.is_controlled() {
            self.give_up_first(player, first)?;
            debug!("{} hit controlled second card at {}", player, pos);
            return Err(FlipError::CardControlledByAnother(pos));
        }

        let first_card = self.grid.read_cell(first)?.card;
        let matched = cell.card == first_card;
        self.grid.mutate_cell(pos, |cell| {
            cell.turn_face_up();
            if matched {
                cell.take_control(player);
            }
        })?;
        if !matched {
            self.release(first)?;
        }

        let session = self.sessions.session_mut(player);
        session.second = Some(pos);
        session.matched = matched;

        debug!(
            "{} turned second card at {}: {}",
            player,
            pos,
            if matched { "match" } else { "no match" }
        );
        self.changes.announce();
        Ok(())
    }

    /// Release the first card after a failed second flip.
    fn give_up_first(&mut self, player: &PlayerId, first: Position) -> Result<()> {
        self.release(first)?;
        self.sessions.session_mut(player).first = None;
        self.changes.announce();
        Ok(())
    }

    /// Drop control of `pos` and wake anyone waiting for it.
    fn release(&mut self, pos: Position) -> Result<()> {
        self.grid.mutate_cell(pos, |cell| cell.release())?;
        let woken = self.waits.release_all(pos);
        trace!("Released {}, woke {} waiters", pos, woken);
        Ok(())
    }
}
