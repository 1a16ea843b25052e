//! Card system: tokens and per-position cell state.
//!
//! ## Key Types
//!
//! - `Card`: A printable token; equal cards match
//! - `Cell`: Card, face flag and controller at one position
//! - `CellView`: What one player sees of a cell

pub mod card;
pub mod cell;

pub use card::Card;
pub use cell::{Cell, CellView};
