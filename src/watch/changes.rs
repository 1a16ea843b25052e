//! Change broadcaster for passive watchers.
//!
//! A watcher subscribes and receives a [`Ticket`]. The next `announce`
//! fires every ticket registered at that moment (copy-and-clear), so a
//! watcher that subscribes after an announcement is only woken by a later
//! one. Tickets carry no payload; watchers re-read the board.
//!
//! An observable change is a face-up/face-down transition, a removal, or a
//! card changing to a different value. Control-only transitions are
//! announced too; watchers tolerate the extra wakeup.

use rustc_hash::FxHashSet;

use super::Ticket;

/// One-shot listeners for the next board change.
#[derive(Clone, Debug, Default)]
pub struct ChangeBroadcaster {
    /// Waiting for the next announcement.
    listeners: Vec<Ticket>,

    /// Fired but not yet consumed.
    fired: FxHashSet<Ticket>,

    /// Next ticket to hand out.
    next_ticket: u64,

    /// Announcements made so far.
    announcements: u64,
}

impl ChangeBroadcaster {
    /// Create a broadcaster with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for the next announcement.
    pub fn subscribe(&mut self) -> Ticket {
        let ticket = Ticket::new(self.next_ticket);
        self.next_ticket += 1;
        self.listeners.push(ticket);
        ticket
    }

    /// Fire every currently registered listener.
    ///
    /// Returns how many listeners were fired.
    pub fn announce(&mut self) -> usize {
        self.announcements += 1;
        let listeners = std::mem::take(&mut self.listeners);
        let count = listeners.len();
        self.fired.extend(listeners);
        count
    }

    /// Consume a fired ticket. True exactly once per announcement.
    pub fn consume(&mut self, ticket: Ticket) -> bool {
        self.fired.remove(&ticket)
    }

    /// Forget a ticket whose owner stopped watching.
    pub fn unsubscribe(&mut self, ticket: Ticket) {
        self.listeners.retain(|t| *t != ticket);
        self.fired.remove(&ticket);
    }

    /// Listeners waiting for the next announcement.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Are there fired tickets nobody has consumed yet?
    #[must_use]
    pub fn has_fired(&self) -> bool {
        !self.fired.is_empty()
    }

    /// Total announcements, including ones nobody was listening to.
    #[must_use]
    pub fn announcements(&self) -> u64 {
        self.announcements
    }
}
