//! Grid coordinates.
//!
//! Every cell on the board lives at a fixed `Position`. Rows and columns are
//! 0-based; `(0, 0)` is the top-left cell and cells are stored row-major.
//!
//! ```
//! use memory_grid::core::Position;
//!
//! let pos = Position::new(1, 2);
//! assert_eq!(pos.row, 1);
//! assert_eq!(pos.col, 2);
//! assert_eq!(pos.index(4), 6);
//! assert_eq!(Position::from_index(6, 4), pos);
//! ```

use serde::{Deserialize, Serialize};

/// A `(row, col)` cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row, counted from the top.
    pub row: usize,
    /// Column, counted from the left.
    pub col: usize,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index in a grid with `cols` columns.
    ///
    /// Does not check bounds.
    #[must_use]
    pub const fn index(self, cols: usize) -> usize {
        self.row * cols + self.col
    }

    /// Inverse of [`Position::index`].
    #[must_use]
    pub const fn from_index(index: usize, cols: usize) -> Self {
        Self {
            row: index / cols,
            col: index % cols,
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
