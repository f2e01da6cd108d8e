//! Change-notification fan-out owned by a single controller

use std::sync::Arc;

use super::TimerState;

/// Handle returned by [`Observers::subscribe`], used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&TimerState) + Send + Sync>;

/// Ordered list of change observers
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it is invoked on every subsequent notification
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&TimerState) + Send + Sync + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy out the current callbacks so they can be invoked without holding a lock
    pub fn snapshot(&self) -> Vec<Callback> {
        self.entries.iter().map(|(_, cb)| Arc::clone(cb)).collect()
    }

    /// Invoke every callback in subscription order
    pub fn notify_all(&self, state: &TimerState) {
        for callback in self.snapshot() {
            callback(state);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
