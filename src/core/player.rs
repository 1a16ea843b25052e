//! Player identification.
//!
//! ## PlayerId
//!
//! Opaque, non-empty identifier chosen by whoever calls into the board.
//! The core never interprets it beyond equality and hashing; validating
//! the character set is the request layer's job.

use serde::{Deserialize, Serialize};

/// Opaque player identifier.
///
/// ```
/// use memory_grid::core::PlayerId;
///
/// let alice = PlayerId::new("alice");
/// assert_eq!(alice.as_str(), "alice");
/// assert_eq!(alice, PlayerId::from("alice"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new player ID.
    ///
    /// Panics if `id` is empty.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        assert!(!id.is_empty(), "Player id must be non-empty");
        Self(id)
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = &'static str;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        if id.is_empty() {
            Err("player id must be non-empty")
        } else {
            Ok(Self(id))
        }
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id() {
        let id = PlayerId::new("bob");
        assert_eq!(id.as_str(), "bob");
        assert_eq!(format!("{}", id), "Player bob");
    }

    #[test]
    fn test_player_id_from() {
        assert_eq!(PlayerId::from("carol"), PlayerId::new("carol"));
        assert_eq!(PlayerId::try_from(String::from("carol")), Ok(PlayerId::new("carol")));
        assert!(PlayerId::try_from(String::new()).is_err());
    }

    #[test]
    fn test_player_id_any_characters() {
        // Only emptiness is rejected; the request layer owns the character set.
        let id = PlayerId::new("weird id/with:stuff");
        assert_eq!(id.as_str(), "weird id/with:stuff");
    }

    #[test]
    #[should_panic(expected = "Player id must be non-empty")]
    fn test_player_id_empty() {
        let _ = PlayerId::new("");
    }

    #[test]
    fn test_serialization() {
        let id = PlayerId::new("dave");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"dave\"");
        let deserialized: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let err = serde_json::from_str::<PlayerId>("\"\"").unwrap_err();
        assert!(err.to_string().contains("non-empty"), "{}", err);
        // Any other character set passes through untouched.
        let id: PlayerId = serde_json::from_str("\"a b\"").unwrap();
        assert_eq!(id.as_str(), "a b");
    }
}
