// SPDX-License-Identifier: MIT

//! Fan-out of parser events to observers (spec.md §5): append-only,
//! buffered, slow observers dropped rather than allowed to block the
//! producer.

use tokio::sync::mpsc;

use detent_parser::Event;

/// Backlog depth per observer before it is considered slow and dropped.
const DEFAULT_BACKLOG: usize = 256;

/// A single observer's inbox. Dropping the receiver unsubscribes it.
pub type Subscription = mpsc::Receiver<Event>;

/// Fans `Event`s out to every subscriber registered at publish time.
/// Subscribing after a publish misses that event, matching an append-only
/// log: there is no replay.
pub struct EventBus {
    backlog: usize,
    subscribers: Vec<mpsc::Sender<Event>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_backlog(DEFAULT_BACKLOG)
    }

    pub fn with_backlog(backlog: usize) -> Self {
        Self {
            backlog,
            subscribers: Vec::new(),
        }
    }

    /// Registers a new observer and returns its receiving half.
    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.backlog);
        self.subscribers.push(tx);
        rx
    }

    /// Delivers `event` to every live subscriber. A subscriber whose
    /// backlog is full, or whose receiver has been dropped, is removed —
    /// the producer never blocks on a slow observer (spec.md §5).
    pub fn publish(&mut self, event: Event) {
        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => false,
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
