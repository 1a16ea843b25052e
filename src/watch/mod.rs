//! Wait and notify registries.
//!
//! Both registries hand out opaque [`Ticket`]s and record which tickets
//! have been woken. They never block on their own: the board owns the
//! lock and condition variables, parks callers, and asks the registry
//! whether a caller's ticket has been woken. Spurious condition-variable
//! wakeups therefore cost a re-check and nothing else.
//!
//! - [`WaitRegistry`]: per-position queues of suspended first-card flips
//! - [`ChangeBroadcaster`]: one-shot listeners for the next board change
//!
//! Registries live inside a board and die with it; separate boards never
//! share tickets.

mod waits;
mod changes;

pub use waits::WaitRegistry;
pub use changes::ChangeBroadcaster;

/// Opaque resumption token.
///
/// Unique within the registry that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ticket({})", self.0)
    }
}
