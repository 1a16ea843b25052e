//! Grid store for cell state.
//!
//! The `GridStore` owns every `Cell` on the board. It is a plain data
//! structure: mutual exclusion comes from the board-wide lock that owns it,
//! so every `mutate_cell` is serialized with every other cell mutation.
//!
//! Accessors hand out copies or derived summaries; the backing storage is
//! never exposed outside the crate.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::cards::{Card, Cell};
use crate::core::error::{FlipError, Result};
use crate::core::player::PlayerId;
use crate::core::position::Position;

/// Positions sharing a card. Most boards hold pairs.
pub type PositionList = SmallVec<[Position; 4]>;

/// Row-major matrix of cells, fixed size for its lifetime.
///
/// ## Usage
///
/// ```
/// use memory_grid::cards::Card;
/// use memory_grid::core::{PlayerId, Position};
/// use memory_grid::grid::GridStore;
///
/// let cards = ["A", "B", "A", "B"].map(Card::new);
/// let mut grid = GridStore::new(2, 2, cards);
///
/// let alice = PlayerId::new("alice");
/// grid.mutate_cell(Position::new(0, 0), |cell| cell.take_control(&alice)).unwrap();
///
/// let cell = grid.read_cell(Position::new(0, 0)).unwrap();
/// assert!(cell.is_controlled_by(&alice));
/// assert!(grid.read_cell(Position::new(2, 0)).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct GridStore {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl GridStore {
    /// Create a grid of face-down cards, row-major.
    ///
    /// Panics if the dimensions are zero or the card count is not
    /// `rows * cols`.
    pub fn new(rows: usize, cols: usize, cards: impl IntoIterator<Item = Card>) -> Self {
        assert!(rows > 0 && cols > 0, "Grid must be at least 1x1");

        let cells: Vec<Cell> = cards.into_iter().map(Cell::face_down).collect();
        assert_eq!(
            cells.len(),
            rows * cols,
            "Grid of {}x{} needs {} cards",
            rows,
            cols,
            rows * cols
        );

        Self { rows, cols, cells }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Is `pos` on the board?
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Fail with `OutOfBounds` if `pos` is off the board.
    pub fn check_bounds(&self, pos: Position) -> Result<()> {
        self.index(pos).map(|_| ())
    }

    fn index(&self, pos: Position) -> Result<usize> {
        if self.contains(pos) {
            Ok(pos.index(self.cols))
        } else {
            Err(FlipError::OutOfBounds {
                pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Snapshot of one cell.
    pub fn read_cell(&self, pos: Position) -> Result<Cell> {
        let index = self.index(pos)?;
        Ok(self.cells[index].clone())
    }

    /// Apply `f` to exactly one cell and return its result.
    pub fn mutate_cell<R>(&mut self, pos: Position, f: impl FnOnce(&mut Cell) -> R) -> Result<R> {
        let index = self.index(pos)?;
        Ok(f(&mut self.cells[index]))
    }

    /// Copy of every cell, row-major.
    #[must_use]
    pub fn cells(&self) -> Vec<Cell> {
        self.cells.clone()
    }

    /// Iterate over `(position, cell)` pairs, row-major.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::from_index(i, cols), cell))
    }

    /// Partition all card-holding positions by card.
    ///
    /// Groups are ordered by card so callers walk them deterministically.
    #[must_use]
    pub fn value_groups(&self) -> BTreeMap<Card, PositionList> {
        let mut groups: BTreeMap<Card, PositionList> = BTreeMap::new();
        for (pos, cell) in self.iter() {
            if let Some(card) = &cell.card {
                groups.entry(card.clone()).or_default().push(pos);
            }
        }
        groups
    }

    /// Positions currently controlled by `player`.
    #[must_use]
    pub fn controlled_by(&self, player: &PlayerId) -> PositionList {
        self.iter()
            .filter(|(_, cell)| cell.is_controlled_by(player))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of positions still holding a card.
    #[must_use]
    pub fn remaining_cards(&self) -> usize {
        self.cells.iter().filter(|c| c.has_card()).count()
    }
}
