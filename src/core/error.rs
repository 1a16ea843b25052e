//! Error types.
//!
//! `FlipError` covers every documented way a board operation can fail.
//! All of them are local to the call: the board is left satisfying its
//! invariants. Broken invariants are bugs and panic instead.
//!
//! `ParseError` covers the board-file loader.

use thiserror::Error;

use super::Position;

/// Failures of `look`/`flip`/`watch` style operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlipError {
    /// Row or column outside the grid. State unchanged.
    #[error("position {pos} is outside the {rows}x{cols} board")]
    OutOfBounds {
        /// Requested position.
        pos: Position,
        /// Board rows.
        rows: usize,
        /// Board columns.
        cols: usize,
    },

    /// Target cell holds no card.
    #[error("no card at {0}")]
    NoCardAtPosition(Position),

    /// Second-card target is held by a player.
    #[error("card at {0} is controlled by another player")]
    CardControlledByAnother(Position),

    /// A bounded first-card wait expired before the card was released.
    #[error("timed out waiting for card at {0}")]
    TimedOut(Position),

    /// A bounded watch expired before any change.
    #[error("timed out waiting for a board change")]
    WatchTimedOut,
}

/// Result alias for board operations.
pub type Result<T> = std::result::Result<T, FlipError>;

/// Board-file loader errors.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input has no header line.
    #[error("board text is empty")]
    Empty,

    /// First line is not `<rows>x<cols>`.
    #[error("line {line}: expected `<rows>x<cols>`, got {text:?}")]
    BadHeader {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },

    /// Zero rows or columns.
    #[error("board dimensions must be at least 1x1")]
    ZeroDimension,

    /// `rows * cols` does not fit in memory addressing.
    #[error("board of {rows}x{cols} is too large")]
    TooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// A card line is not a single whitespace-free token.
    #[error("line {line}: invalid card {text:?}")]
    BadCard {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },

    /// Card count does not equal `rows * cols`.
    #[error("expected {expected} cards, found {found}")]
    WrongCardCount {
        /// `rows * cols`.
        expected: usize,
        /// Cards actually present.
        found: usize,
    },

    /// Reading the board file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_error_messages() {
        let err = FlipError::OutOfBounds {
            pos: Position::new(5, 0),
            rows: 3,
            cols: 3,
        };
        assert_eq!(err.to_string(), "position (5, 0) is outside the 3x3 board");

        let err = FlipError::NoCardAtPosition(Position::new(1, 1));
        assert_eq!(err.to_string(), "no card at (1, 1)");

        let err = FlipError::CardControlledByAnother(Position::new(0, 2));
        assert_eq!(err.to_string(), "card at (0, 2) is controlled by another player");
    }

    #[test]
    fn test_parse_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ParseError = io.into();
        assert!(matches!(err, ParseError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
