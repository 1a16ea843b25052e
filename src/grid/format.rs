//! Board text encodings.
//!
//! ## Board files
//!
//! ```text
//! 2x2
//! A
//! B
//! A
//! B
//! ```
//!
//! A `<rows>x<cols>` header followed by `rows * cols` card tokens, one per
//! line, row-major. Blank lines are ignored.
//!
//! ## Board views
//!
//! What `look` returns: the same header, then one line per cell
//! (`none`, `down`, `up <card>`, `my <card>`), each terminated by `\n`.

use std::path::Path;
use std::str::FromStr;

use crate::cards::Card;
use crate::core::error::ParseError;
use crate::core::player::PlayerId;

use super::store::GridStore;

/// Parsed contents of a board file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSpec {
    rows: usize,
    cols: usize,
    /// Row-major. Always `rows * cols` long.
    cards: Vec<Card>,
}

impl BoardSpec {
    /// Build a spec from in-memory cards.
    ///
    /// Fails if the dimensions are zero or the count does not match.
    pub fn new(rows: usize, cols: usize, cards: Vec<Card>) -> Result<Self, ParseError> {
        if rows == 0 || cols == 0 {
            return Err(ParseError::ZeroDimension);
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or(ParseError::TooLarge { rows, cols })?;
        if cards.len() != expected {
            return Err(ParseError::WrongCardCount {
                expected,
                found: cards.len(),
            });
        }
        Ok(Self { rows, cols, cards })
    }

    /// Parse board-file text.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = text.lines().enumerate();
        let (_, header) = lines.next().ok_or(ParseError::Empty)?;
        let (rows, cols) = parse_header(header.trim()).ok_or_else(|| ParseError::BadHeader {
            line: 1,
            text: header.to_string(),
        })?;

        let mut cards = Vec::new();
        for (index, line) in lines {
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            let card = Card::parse(token).ok_or_else(|| ParseError::BadCard {
                line: index + 1,
                text: line.to_string(),
            })?;
            cards.push(card);
        }

        Self::new(rows, cols, cards)
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

    /// Cards, row-major.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Read and parse a board file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Build the grid this spec describes, every card face down.
    #[must_use]
    pub fn into_grid(self) -> GridStore {
        GridStore::new(self.rows, self.cols, self.cards)
    }
}

fn parse_header(header: &str) -> Option<(usize, usize)> {
    let (rows, cols) = header.split_once('x')?;
    let rows: usize = rows.parse().ok()?;
    let cols: usize = cols.parse().ok()?;
    // Reject sizes whose cell count would overflow.
    rows.checked_mul(cols)?;
    Some((rows, cols))
}

impl FromStr for BoardSpec {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl std::fmt::Display for BoardSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}x{}", self.rows, self.cols)?;
        for card in &self.cards {
            writeln!(f, "{}", card)?;
        }
        Ok(())
    }
}

/// Render the grid as seen by `viewer`.
#[must_use]
pub fn render(grid: &GridStore, viewer: &PlayerId) -> String {
    let (rows, cols) = grid.dimensions();
    let mut out = format!("{}x{}\n", rows, cols);
    for (_, cell) in grid.iter() {
        out.push_str(&cell.view(viewer).to_string());
        out.push('\n');
    }
    out
}
