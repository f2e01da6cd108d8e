//! Lifecycle listener background task

use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::label::LifecycleSignal;

/// Spawn a task that hands every signal from `rx` to `handler` until the bus closes.
/// Aborting the returned handle deregisters the listener.
pub fn spawn_lifecycle_listener<F>(
    mut rx: broadcast::Receiver<LifecycleSignal>,
    handler: F,
) -> JoinHandle<()>
where
    F: Fn(LifecycleSignal) + Send + 'static,
{
    tokio::spawn(async move {
        info!("Starting lifecycle listener");

        loop {
            match rx.recv().await {
                Ok(signal) => {
                    debug!("Lifecycle listener received {:?}", signal);
                    handler(signal);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Lifecycle listener lagged, {} signals dropped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Lifecycle bus closed, stopping listener");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn forwards_signals_until_bus_closes() {
        let (tx, rx) = broadcast::channel(8);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let task = spawn_lifecycle_listener(rx, move |signal| sink.lock().unwrap().push(signal));

        tx.send(LifecycleSignal::AboutToSuspend).unwrap();
        tx.send(LifecycleSignal::Resumed).unwrap();
        drop(tx);

        task.await.expect("listener exits cleanly");
        assert_eq!(
            *seen.lock().unwrap(),
            vec![LifecycleSignal::AboutToSuspend, LifecycleSignal::Resumed]
        );
    }

    #[tokio::test]
    async fn survives_lag() {
        let (tx, rx) = broadcast::channel(1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        tx.send(LifecycleSignal::Other).unwrap();
        tx.send(LifecycleSignal::Detached).unwrap();
        let task = spawn_lifecycle_listener(rx, move |signal| sink.lock().unwrap().push(signal));
        drop(tx);

        task.await.expect("listener exits cleanly");
        assert_eq!(*seen.lock().unwrap(), vec![LifecycleSignal::Detached]);
    }
}
