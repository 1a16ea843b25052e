//! Card tokens.
//!
//! A card is a printable, non-empty token without whitespace. Two cells
//! match when their cards are equal.

use serde::{Deserialize, Serialize};

/// A card token such as `A`, `🦄` or `unicorn`.
///
/// ```
/// use memory_grid::cards::Card;
///
/// assert_eq!(Card::new("A").as_str(), "A");
/// assert!(Card::parse("two words").is_none());
/// assert!(Card::parse("").is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card(String);

impl Card {
    /// Create a card.
    ///
    /// Panics if `token` is empty or contains whitespace.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        assert!(Self::is_valid_token(&token), "Invalid card token: {:?}", token);
        Self(token)
    }

    /// Create a card if `token` is valid.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::is_valid_token(token).then(|| Self(token.to_string()))
    }

    /// Check whether `token` can be a card.
    #[must_use]
    pub fn is_valid_token(token: &str) -> bool {
        !token.is_empty() && !token.chars().any(char::is_whitespace)
    }

    /// Get the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Card {
    type Error = String;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        if Self::is_valid_token(&token) {
            Ok(Self(token))
        } else {
            Err(format!("invalid card token {:?}", token))
        }
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.0
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
