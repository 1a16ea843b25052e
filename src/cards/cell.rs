//! Cells - runtime per-position card state.
//!
//! A `Cell` tracks whether a position still holds a card, whether that
//! card is face up, and which player (if any) currently controls it.
//!
//! ## Invariants
//!
//! - no card ⇒ face down and uncontrolled
//! - controlled ⇒ face up
//!
//! `CellView` is what one particular player sees of a cell.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::core::player::PlayerId;

/// State of one grid position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The card, or `None` once the pair has been removed.
    pub card: Option<Card>,

    /// Is the card face up?
    pub face_up: bool,

    /// Controller. `None` for uncontrolled cards.
    pub controller: Option<PlayerId>,
}

impl Cell {
    /// A face-down, uncontrolled card.
    #[must_use]
    pub fn face_down(card: Card) -> Self {
        Self {
            card: Some(card),
            face_up: false,
            controller: None,
        }
    }

    /// An empty position.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Does this position still hold a card?
    #[must_use]
    pub fn has_card(&self) -> bool {
        self.card.is_some()
    }

    /// Is the card controlled by anyone?
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.controller.is_some()
    }

    /// Is the card controlled by `player`?
    #[must_use]
    pub fn is_controlled_by(&self, player: &PlayerId) -> bool {
        self.controller.as_ref() == Some(player)
    }

    /// Is the card controlled by someone other than `player`?
    #[must_use]
    pub fn is_controlled_by_other(&self, player: &PlayerId) -> bool {
        self.controller.as_ref().is_some_and(|c| c != player)
    }

    /// Turn face up and take control.
    pub fn take_control(&mut self, player: &PlayerId) {
        self.face_up = true;
        self.controller = Some(player.clone());
    }

    /// Turn face up without taking control.
    pub fn turn_face_up(&mut self) {
        debug_assert!(self.card.is_some(), "turning an empty cell face up");
        self.face_up = true;
    }

    /// Give up control, leaving the card face up.
    pub fn release(&mut self) {
        self.controller = None;
    }

    /// Turn the card face down. Only valid for uncontrolled cards.
    pub fn turn_face_down(&mut self) {
        debug_assert!(self.controller.is_none(), "turning a controlled card face down");
        self.face_up = false;
    }

    /// Remove the card entirely.
    pub fn remove(&mut self) {
        *self = Self::empty();
    }

    /// Check the per-cell invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let empty_ok = self.card.is_some() || (!self.face_up && self.controller.is_none());
        let control_ok = self.controller.is_none() || self.face_up;
        empty_ok && control_ok
    }

    /// What `viewer` sees of this cell.
    #[must_use]
    pub fn view(&self, viewer: &PlayerId) -> CellView {
        match &self.card {
            None => CellView::Empty,
            Some(_) if !self.face_up => CellView::Down,
            Some(card) if self.is_controlled_by(viewer) => CellView::Mine(card.clone()),
            Some(card) => CellView::Up(card.clone()),
        }
    }
}

/// A cell as seen by one player.
///
/// Renders as one line of the board text encoding: `none`, `down`,
/// `up <card>` or `my <card>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellView {
    /// No card.
    Empty,
    /// Face down.
    Down,
    /// Face up, not controlled by the viewer.
    Up(Card),
    /// Face up, controlled by the viewer.
    Mine(Card),
}

impl CellView {
    /// The visible card, if any.
    #[must_use]
    pub fn card(&self) -> Option<&Card> {
        match self {
            CellView::Up(card) | CellView::Mine(card) => Some(card),
            CellView::Empty | CellView::Down => None,
        }
    }
}

impl std::fmt::Display for CellView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellView::Empty => f.write_str("none"),
            CellView::Down => f.write_str("down"),
            CellView::Up(card) => write!(f, "up {}", card),
            CellView::Mine(card) => write!(f, "my {}", card),
        }
    }
}

impl FromStr for CellView {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split(' ');
        let view = match (parts.next(), parts.next(), parts.next()) {
            (Some("none"), None, None) => CellView::Empty,
            (Some("down"), None, None) => CellView::Down,
            (Some("up"), Some(token), None) => CellView::Up(card_from(token, line)?),
            (Some("my"), Some(token), None) => CellView::Mine(card_from(token, line)?),
            _ => return Err(format!("unrecognized cell line {:?}", line)),
        };
        Ok(view)
    }
}

fn card_from(token: &str, line: &str) -> Result<Card, String> {
    Card::parse(token).ok_or_else(|| format!("invalid card in cell line {:?}", line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PlayerId {
        PlayerId::new("alice")
    }

    fn bob() -> PlayerId {
        PlayerId::new("bob")
    }

    #[test]
    fn test_face_down_cell() {
        let cell = Cell::face_down(Card::new("A"));
        assert!(cell.has_card());
        assert!(!cell.face_up);
        assert!(!cell.is_controlled());
        assert!(cell.is_consistent());
        assert_eq!(cell.view(&alice()), CellView::Down);
    }

    #[test]
    fn test_take_and_release_control() {
        let mut cell = Cell::face_down(Card::new("A"));
        cell.take_control(&alice());

        assert!(cell.face_up);
        assert!(cell.is_controlled_by(&alice()));
        assert!(!cell.is_controlled_by_other(&alice()));
        assert!(cell.is_controlled_by_other(&bob()));
        assert_eq!(cell.view(&alice()), CellView::Mine(Card::new("A")));
        assert_eq!(cell.view(&bob()), CellView::Up(Card::new("A")));

        cell.release();
        assert!(cell.face_up);
        assert!(!cell.is_controlled());
        assert_eq!(cell.view(&alice()), CellView::Up(Card::new("A")));

        cell.turn_face_down();
        assert_eq!(cell.view(&alice()), CellView::Down);
    }

    #[test]
    fn test_remove() {
        let mut cell = Cell::face_down(Card::new("A"));
        cell.take_control(&alice());
        cell.remove();

        assert_eq!(cell, Cell::empty());
        assert!(cell.is_consistent());
        assert_eq!(cell.view(&alice()), CellView::Empty);
    }

    #[test]
    fn test_inconsistent_cells() {
        let face_up_empty = Cell {
            card: None,
            face_up: true,
            controller: None,
        };
        assert!(!face_up_empty.is_consistent());

        let controlled_down = Cell {
            card: Some(Card::new("A")),
            face_up: false,
            controller: Some(alice()),
        };
        assert!(!controlled_down.is_consistent());
    }

    #[test]
    fn test_view_display_and_parse() {
        let views = [
            (CellView::Empty, "none"),
            (CellView::Down, "down"),
            (CellView::Up(Card::new("B")), "up B"),
            (CellView::Mine(Card::new("🦄")), "my 🦄"),
        ];

        for (view, text) in views {
            assert_eq!(view.to_string(), text);
            assert_eq!(text.parse::<CellView>().unwrap(), view);
        }

        assert!("sideways".parse::<CellView>().is_err());
        assert!("up".parse::<CellView>().is_err());
        assert!("my A B".parse::<CellView>().is_err());
    }

    #[test]
    fn test_view_card() {
        assert_eq!(CellView::Up(Card::new("C")).card(), Some(&Card::new("C")));
        assert_eq!(CellView::Down.card(), None);
    }
}
