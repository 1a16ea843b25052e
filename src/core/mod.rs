//! Core types: players, positions, configuration, errors.
//!
//! These are the leaf types every other module builds on. None of them
//! carries board state.

pub mod player;
pub mod position;
pub mod config;
pub mod error;

pub use player::PlayerId;
pub use position::Position;
pub use config::BoardConfig;
pub use error::{FlipError, ParseError, Result};
