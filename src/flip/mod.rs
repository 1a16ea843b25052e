//! Turn-based flip protocol.
//!
//! Each player's turn moves through
//! `Idle → HoldingFirst → (HoldingPair | Unmatched) → Idle`.
//!
//! - [`FlipProtocol`]: applies one flip step to a locked board
//! - [`SessionTable`]: per-player record of the cards turned this turn
//!
//! Only the first card of a turn may wait for another player. The second
//! card fails instead of waiting, which rules out two players each waiting
//! on a card the other holds.

mod protocol;
mod session;

pub use protocol::{FlipProtocol, FlipStep};
pub use session::{PlayerSession, SessionTable, TurnPhase};
