//! # memory-grid
//!
//! A concurrent engine for a shared-grid card-matching game.
//!
//! Any number of players flip cards on one rows x cols grid at the same
//! time. Each turn a player flips a first card, then a second; a matching
//! pair is removed at the start of their next turn, a mismatched pair is
//! turned back down.
//!
//! ## Design Principles
//!
//! 1. **One Lock**: All cells, sessions and registries sit behind a single
//!    mutex. Every mutation is serialized; blocking happens only while the
//!    lock is released.
//!
//! 2. **Tickets, Not Wakeups**: Suspended callers hold a ticket in a
//!    registry. A condition-variable wakeup only means "re-check your
//!    ticket".
//!
//! 3. **Only First Cards Wait**: A second card never waits for another
//!    player, so two players can never wait on each other.
//!
//! ## Modules
//!
//! - `core`: Players, positions, configuration, errors
//! - `cards`: Card values and grid cells
//! - `grid`: Cell storage and the board text formats
//! - `watch`: Wait queues and change notification
//! - `flip`: The turn state machine
//! - `mapper`: Consistent bulk card transforms
//! - `board`: The thread-safe board tying it all together

pub mod core;
pub mod cards;
pub mod grid;
pub mod watch;
pub mod flip;
pub mod mapper;
pub mod board;

// Re-export commonly used types
pub use crate::core::{BoardConfig, FlipError, ParseError, PlayerId, Position, Result};

pub use crate::cards::{Card, Cell, CellView};

pub use crate::grid::{render, BoardSpec, GridStore};

pub use crate::watch::{ChangeBroadcaster, Ticket, WaitRegistry};

pub use crate::flip::{FlipProtocol, FlipStep, PlayerSession, TurnPhase};

pub use crate::mapper::{ConsistentMapper, ValueGroup};

pub use crate::board::{Board, BoardState};
