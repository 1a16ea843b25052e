//! Wait registry for contested cells.
//!
//! A player whose first card is controlled by someone else parks a
//! [`Ticket`] under that card's position. Releasing the position moves
//! every parked ticket to the woken set at once; each owner then consumes
//! its own ticket exactly once and re-checks the cell itself. There is no
//! FIFO order between tickets woken together.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::core::Position;

use super::Ticket;

/// Per-position queues of suspended first-card flips.
#[derive(Clone, Debug, Default)]
pub struct WaitRegistry {
    /// Parked tickets by position.
    queues: FxHashMap<Position, SmallVec<[Ticket; 4]>>,

    /// Released but not yet consumed.
    woken: FxHashSet<Ticket>,

    /// Next ticket to hand out.
    next_ticket: u64,
}

impl WaitRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a new ticket under `pos`.
    pub fn enqueue(&mut self, pos: Position) -> Ticket {
        let ticket = Ticket::new(self.next_ticket);
        self.next_ticket += 1;
        self.queues.entry(pos).or_default().push(ticket);
        ticket
    }

    /// Wake every ticket parked under `pos` and clear its queue.
    ///
    /// Returns how many tickets were woken.
    pub fn release_all(&mut self, pos: Position) -> usize {
        let Some(queue) = self.queues.remove(&pos) else {
            return 0;
        };
        let count = queue.len();
        self.woken.extend(queue);
        count
    }

    /// Consume a woken ticket. True exactly once per release.
    pub fn consume(&mut self, ticket: Ticket) -> bool {
        self.woken.remove(&ticket)
    }

    /// Forget a ticket whose owner stopped waiting.
    pub fn abandon(&mut self, pos: Position, ticket: Ticket) {
        self.woken.remove(&ticket);
        if let Some(queue) = self.queues.get_mut(&pos) {
            queue.retain(|t| *t != ticket);
            if queue.is_empty() {
                self.queues.remove(&pos);
            }
        }
    }

    /// Number of tickets parked under `pos`.
    #[must_use]
    pub fn waiting_on(&self, pos: Position) -> usize {
        self.queues.get(&pos).map_or(0, |q| q.len())
    }

    /// Are there released tickets nobody has consumed yet?
    #[must_use]
    pub fn has_woken(&self) -> bool {
        !self.woken.is_empty()
    }

    /// No parked and no woken tickets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty() && self.woken.is_empty()
    }
}
