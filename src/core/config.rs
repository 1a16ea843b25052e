//! Board configuration.
//!
//! Boards are configured at construction by providing a `BoardConfig`.
//! Nothing here changes the flip rules; it only controls how long callers
//! may be suspended and whether invariants are re-validated after every
//! mutating call.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime configuration for a [`Board`](crate::board::Board).
///
/// ```
/// use std::time::Duration;
/// use memory_grid::core::BoardConfig;
///
/// let config = BoardConfig::new()
///     .with_invariant_checks(true)
///     .with_flip_timeout(Duration::from_secs(5));
///
/// assert!(config.check_invariants);
/// assert_eq!(config.flip_timeout, Some(Duration::from_secs(5)));
/// assert_eq!(config.watch_timeout, None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Re-validate the cell and session invariants after every mutating
    /// call. A violation panics.
    ///
    /// Defaults to on in debug builds.
    pub check_invariants: bool,

    /// Default bound on how long `Board::flip` may wait for a contested
    /// first card. `None` waits until the card is released.
    pub flip_timeout: Option<Duration>,

    /// Default bound on how long `Board::watch` may wait for a change.
    /// `None` waits for the next change however long it takes.
    pub watch_timeout: Option<Duration>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            check_invariants: cfg!(debug_assertions),
            flip_timeout: None,
            watch_timeout: None,
        }
    }
}

impl BoardConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable invariant re-validation.
    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Bound first-card waits by default.
    #[must_use]
    pub fn with_flip_timeout(mut self, timeout: Duration) -> Self {
        self.flip_timeout = Some(timeout);
        self
    }

    /// Bound watches by default.
    #[must_use]
    pub fn with_watch_timeout(mut self, timeout: Duration) -> Self {
        self.watch_timeout = Some(timeout);
        self
    }
}
