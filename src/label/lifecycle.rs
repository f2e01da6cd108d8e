//! Host lifecycle signals and the bus that distributes them

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Lifecycle transitions a host reports to its components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleSignal {
    /// The host is going to the background or being stopped
    AboutToSuspend,
    /// The host is back in the foreground
    Resumed,
    /// The host is being torn down
    Detached,
    /// Any transition components do not react to
    Other,
}

/// Fan-out of lifecycle signals to registered listeners
#[derive(Debug, Clone)]
pub struct LifecycleBus {
    tx: broadcast::Sender<LifecycleSignal>,
}

impl LifecycleBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Deliver a signal to every current listener. Returns how many received it.
    pub fn publish(&self, signal: LifecycleSignal) -> usize {
        match self.tx.send(signal) {
            Ok(listeners) => listeners,
            Err(_) => {
                debug!("No lifecycle listeners for {:?}", signal);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleSignal> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LifecycleBus {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn publish_without_listeners_is_dropped() {
        let bus = LifecycleBus::default();
        assert_eq!(bus.publish(LifecycleSignal::Resumed), 0);
    }

    #[test]
    fn every_listener_receives_each_signal() {
        let bus = LifecycleBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.listener_count(), 2);

        assert_eq!(bus.publish(LifecycleSignal::Detached), 2);
        assert_eq!(first.try_recv().unwrap(), LifecycleSignal::Detached);
        assert_eq!(second.try_recv().unwrap(), LifecycleSignal::Detached);
    }
}
