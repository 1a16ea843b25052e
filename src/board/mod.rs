//! The shared board.
//!
//! `Board` is the only type callers need: it owns all state behind one
//! lock and exposes `look`, `flip`, `map` and `watch`. `BoardState` is
//! what that lock protects.

pub mod engine;
pub mod state;

pub use engine::Board;
pub use state::BoardState;
