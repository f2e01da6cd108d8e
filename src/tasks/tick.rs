//! One-second tick task backing a running countdown

use std::{ops::ControlFlow, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Cadence of a running countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Ownership of one spawned periodic tick task.
///
/// Dropping the handle aborts the task, so whoever holds the handle decides
/// whether ticks keep arriving.
#[derive(Debug)]
pub struct TickHandle {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    /// Spawn a task calling `on_tick` every `period`, first firing one period from now.
    /// The task ends when `on_tick` returns `ControlFlow::Break`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(generation: u64, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }
            debug!("Tick task for run {} finished", generation);
        });

        Self {
            generation,
            task: Some(task),
        }
    }

    /// Run number this handle was spawned for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the task; no further ticks are delivered
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Give up ownership without aborting. Used by the tick itself when it is
    /// about to return `Break`.
    pub fn detach(mut self) {
        self.task.take();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use pretty_assertions::assert_eq;
    use tokio::time::sleep;

    use super::*;

    fn counting(limit: u32) -> (Arc<AtomicU32>, impl FnMut() -> ControlFlow<()> + Send + 'static) {
        let count = Arc::new(AtomicU32::new(0));
        let inner = Arc::clone(&count);
        let on_tick = move || {
            let n = inner.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        (count, on_tick)
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_fires_after_one_period() {
        let (count, on_tick) = counting(u32::MAX);
        let _handle = TickHandle::spawn(1, TICK_PERIOD, on_tick);

        sleep(Duration::from_millis(999)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn break_stops_the_task() {
        let (count, on_tick) = counting(3);
        let handle = TickHandle::spawn(1, TICK_PERIOD, on_tick);

        sleep(Duration::from_millis(10_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        drop(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_pending_ticks() {
        let (count, on_tick) = counting(u32::MAX);
        let handle = TickHandle::spawn(7, TICK_PERIOD, on_tick);
        assert_eq!(handle.generation(), 7);

        sleep(Duration::from_millis(1_500)).await;
        handle.cancel();

        sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels() {
        let (count, on_tick) = counting(u32::MAX);
        drop(TickHandle::spawn(1, TICK_PERIOD, on_tick));

        sleep(Duration::from_secs(3)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
