//! Grid storage and its text encodings.
//!
//! ## Key Types
//!
//! - `GridStore`: Owns every cell; bounds-checked read and single-cell mutate
//! - `BoardSpec`: Parsed board file (dimensions plus row-major cards)
//! - `render`: The `look` encoding of a grid for one viewer

pub mod store;
pub mod format;

pub use store::{GridStore, PositionList};
pub use format::{render, BoardSpec};
