//! The shared, thread-safe board.
//!
//! `Board` wraps all board state in one `parking_lot::Mutex`, so every
//! cell mutation in the system is serialized through the same lock. Two
//! condition variables park callers while the lock is released:
//!
//! - `released`: first-card flips waiting for a contested card
//! - `changed`: watchers waiting for the next change
//!
//! Whether a parked caller may proceed is decided by its ticket in the
//! corresponding registry, never by the wakeup itself.

use std::path::Path;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, trace, warn};

use crate::cards::{Card, Cell, CellView};
use crate::core::error::{FlipError, ParseError, Result};
use crate::core::{BoardConfig, PlayerId, Position};
use crate::flip::{FlipStep, PlayerSession};
use crate::grid::{render, BoardSpec};
use crate::mapper::ConsistentMapper;
use crate::watch::Ticket;

use super::state::BoardState;

/// A memory board shared by any number of concurrent players.
///
/// ## Usage
///
/// ```
/// use memory_grid::board::Board;
/// use memory_grid::core::{PlayerId, Position};
///
/// let board = Board::parse("2x2\nA\nB\nA\nB\n").unwrap();
/// let alice = PlayerId::new("alice");
///
/// board.flip(&alice, Position::new(0, 0)).unwrap();
/// board.flip(&alice, Position::new(1, 0)).unwrap();
/// assert_eq!(board.look(&alice), "2x2\nmy A\ndown\nmy A\ndown\n");
///
/// // The next flip removes the matched pair first.
/// board.flip(&alice, Position::new(0, 1)).unwrap();
/// assert_eq!(board.look(&alice), "2x2\nnone\nmy B\nnone\ndown\n");
/// ```
pub struct Board {
    state: Mutex<BoardState>,
    released: Condvar,
    changed: Condvar,
    config: BoardConfig,
}

impl Board {
    /// Create a board from a parsed board file with the default configuration.
    #[must_use]
    pub fn new(spec: BoardSpec) -> Self {
        Self::with_config(spec, BoardConfig::default())
    }

    /// Create a board from a parsed board file.
    #[must_use]
    pub fn with_config(spec: BoardSpec, config: BoardConfig) -> Self {
        debug!("Creating {}x{} board", spec.rows(), spec.cols());
        Self {
            state: Mutex::new(BoardState::new(spec.into_grid())),
            released: Condvar::new(),
            changed: Condvar::new(),
            config,
        }
    }

    /// Parse board-file text into a board.
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        BoardSpec::parse(text).map(Self::new)
    }

    /// Load a board file.
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ParseError> {
        let path = path.as_ref();
        debug!("Loading board from {}", path.display());
        BoardSpec::from_file(path).map(Self::new)
    }

    /// The configuration this board runs with.
    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        self.state.lock().grid.dimensions()
    }

    // === Operations ===

    /// The board as `player` sees it, in the text encoding.
    #[must_use]
    pub fn look(&self, player: &PlayerId) -> String {
        render(&self.state.lock().grid, player)
    }

    /// Flip the card at `pos` for `player`.
    ///
    /// A first card controlled by another player suspends the caller until
    /// it is released, bounded by `config.flip_timeout` when set. Second
    /// cards never suspend.
    pub fn flip(&self, player: &PlayerId, pos: Position) -> Result<()> {
        let deadline = self.config.flip_timeout.and_then(deadline_after);
        self.flip_until(player, pos, deadline)
    }

    /// Like [`Board::flip`], giving up after `timeout` of waiting.
    pub fn flip_timeout(&self, player: &PlayerId, pos: Position, timeout: Duration) -> Result<()> {
        self.flip_until(player, pos, deadline_after(timeout))
    }

    /// Replace every card `c` with `f(c)`.
    ///
    /// `f` must be pure. It runs once per distinct card, without the board
    /// lock held, so other players keep flipping while it computes. Cards
    /// that matched before never appear mismatched in between. Returns the
    /// number of cells rewritten.
    pub fn map<F>(&self, f: F) -> usize
    where
        F: Fn(&Card) -> Card,
    {
        let groups = ConsistentMapper::partition(&self.state.lock().grid);
        debug!("Mapping {} value groups", groups.len());

        let mut updated = 0;
        for group in &groups {
            let replacement = f(&group.card);

            let mut guard = self.state.lock();
            let state = &mut *guard;
            updated += ConsistentMapper::apply_group(
                &mut state.grid,
                &mut state.changes,
                group,
                &replacement,
            );
            self.wake_parked(state);
            self.verify(state);
        }
        updated
    }

    /// Block until the board next changes.
    ///
    /// Bounded by `config.watch_timeout` when set.
    pub fn watch(&self) -> Result<()> {
        let deadline = self.config.watch_timeout.and_then(deadline_after);
        self.watch_until(deadline)
    }

    /// Like [`Board::watch`], giving up after `timeout`.
    pub fn watch_timeout(&self, timeout: Duration) -> Result<()> {
        self.watch_until(deadline_after(timeout))
    }

    // === Read-outs ===

    /// Copy of one cell.
    pub fn cell(&self, pos: Position) -> Result<Cell> {
        self.state.lock().grid.read_cell(pos)
    }

    /// Copy of every cell, row-major, taken under one lock.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        self.state.lock().grid.cells()
    }

    /// Every cell as `player` sees it, row-major.
    #[must_use]
    pub fn view(&self, player: &PlayerId) -> Vec<CellView> {
        self.cells().iter().map(|cell| cell.view(player)).collect()
    }

    /// A player's current turn record.
    #[must_use]
    pub fn session(&self, player: &PlayerId) -> PlayerSession {
        self.state.lock().session(player)
    }

    /// Flips parked on the card at `pos`.
    #[must_use]
    pub fn waiting_on(&self, pos: Position) -> usize {
        self.state.lock().waits.waiting_on(pos)
    }

    /// Watchers parked for the next change.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.state.lock().changes.listener_count()
    }

    /// Panic if any invariant is broken, regardless of configuration.
    pub fn check_invariants(&self) {
        self.state.lock().check_invariants();
    }

    // === Internals ===

    fn flip_until(&self, player: &PlayerId, pos: Position, deadline: Option<Instant>) -> Result<()> {
        let mut state = self.state.lock();

        let result = loop {
            match state.protocol().step(player, pos) {
                Ok(FlipStep::Done) => break Ok(()),
                Ok(FlipStep::MustWait) => {
                    // Cleanup may already have released cards; let their
                    // waiters go before parking ourselves.
                    self.wake_parked(&state);
                    let ticket = state.waits.enqueue(pos);
                    trace!("{} parked on {} with {}", player, pos, ticket);
                    if let Err(err) = self.wait_for_release(&mut state, pos, ticket, deadline) {
                        break Err(err);
                    }
                    trace!("{} woke for {}", player, pos);
                }
                Err(err) => break Err(err),
            }
        };

        self.wake_parked(&state);
        self.verify(&state);
        match &result {
            Ok(()) => debug!("{} flipped {}", player, pos),
            Err(err) => debug!("{} failed to flip {}: {}", player, pos, err),
        }
        result
    }

    fn wait_for_release(
        &self,
        state: &mut MutexGuard<'_, BoardState>,
        pos: Position,
        ticket: Ticket,
        deadline: Option<Instant>,
    ) -> Result<()> {
        loop {
            if state.waits.consume(ticket) {
                return Ok(());
            }
            match deadline {
                None => self.released.wait(state),
                Some(deadline) => {
                    if self.released.wait_until(state, deadline).timed_out() {
                        if state.waits.consume(ticket) {
                            return Ok(());
                        }
                        state.waits.abandon(pos, ticket);
                        warn!("Gave up waiting for card at {}", pos);
                        return Err(FlipError::TimedOut(pos));
                    }
                }
            }
        }
    }

    fn watch_until(&self, deadline: Option<Instant>) -> Result<()> {
        let mut state = self.state.lock();
        let ticket = state.changes.subscribe();

        loop {
            if state.changes.consume(ticket) {
                return Ok(());
            }
            match deadline {
                None => self.changed.wait(&mut state),
                Some(deadline) => {
                    if self.changed.wait_until(&mut state, deadline).timed_out() {
                        if state.changes.consume(ticket) {
                            return Ok(());
                        }
                        state.changes.unsubscribe(ticket);
                        warn!("Watch timed out with no board change");
                        return Err(FlipError::WatchTimedOut);
                    }
                }
            }
        }
    }

    /// Signal the condition variables if any ticket was woken.
    fn wake_parked(&self, state: &BoardState) {
        if state.waits.has_woken() {
            self.released.notify_all();
        }
        if state.changes.has_fired() {
            self.changed.notify_all();
        }
    }

    fn verify(&self, state: &BoardState) {
        if self.config.check_invariants {
            state.check_invariants();
        }
    }
}

/// The instant `timeout` from now, or `None` if that is beyond what
/// `Instant` can represent, in which case the wait is unbounded.
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (rows, cols) = self.dimensions();
        f.debug_struct("Board")
            .field("rows", &rows)
            .field("cols", &cols)
            .field("config", &self.config)
            .finish()
    }
}
