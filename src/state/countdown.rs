//! Countdown controller: owns the remaining time, the tick and the observers

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::watch;
use tracing::{debug, info};

use super::{observers::SubscriptionId, Observers, TimerState};
use crate::{
    config::{CountdownConfig, ExpireCallback},
    tasks::{TickHandle, TICK_PERIOD},
};

/// Mutable part of the countdown, guarded by a single lock
#[derive(Debug)]
struct Core {
    remaining_seconds: u64,
    /// Bumped on every new run; ticks from older runs are ignored
    generation: u64,
    tick: Option<TickHandle>,
}

impl Core {
    fn cancel_tick(&mut self) {
        if let Some(tick) = self.tick.take() {
            debug!("Cancelling tick for run {}", tick.generation());
            tick.cancel();
        }
    }
}

struct Inner {
    total_seconds: u64,
    always_show_hours: bool,
    on_expire: Option<ExpireCallback>,
    core: Mutex<Core>,
    observers: Mutex<Observers>,
    updates: watch::Sender<TimerState>,
}

impl Inner {
    fn core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn observers(&self) -> MutexGuard<'_, Observers> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_of(&self, core: &Core) -> TimerState {
        TimerState {
            remaining_seconds: core.remaining_seconds,
            total_seconds: self.total_seconds,
            running: core.tick.is_some(),
            always_show_hours: self.always_show_hours,
        }
    }

    /// Fan a state out to observers and watchers. Never called with `core` locked.
    fn notify(&self, state: TimerState) {
        let callbacks = self.observers().snapshot();
        for callback in callbacks {
            callback(&state);
        }
        self.updates.send_replace(state);
    }

    fn expire(&self) {
        info!("Countdown expired");
        if let Some(on_expire) = &self.on_expire {
            on_expire();
        }
    }

    /// Cancel any current tick and spawn a fresh one for a new run
    fn begin_run(self: &Arc<Self>, core: &mut Core) {
        core.cancel_tick();
        core.generation += 1;

        let generation = core.generation;
        let weak = Arc::downgrade(self);
        core.tick = Some(TickHandle::spawn(generation, TICK_PERIOD, move || {
            match weak.upgrade() {
                Some(inner) => inner.on_tick(generation),
                None => ControlFlow::Break(()),
            }
        }));
    }

    fn on_tick(&self, generation: u64) -> ControlFlow<()> {
        let (state, expired) = {
            let mut core = self.core();
            if core.generation != generation || core.tick.is_none() {
                return ControlFlow::Break(());
            }

            if core.remaining_seconds == 0 {
                if let Some(tick) = core.tick.take() {
                    tick.detach();
                }
                return ControlFlow::Break(());
            }

            core.remaining_seconds -= 1;
            let expired = core.remaining_seconds == 0;
            if expired {
                if let Some(tick) = core.tick.take() {
                    tick.detach();
                }
            }
            debug!("Tick: {} seconds remaining", core.remaining_seconds);
            (self.state_of(&core), expired)
        };

        self.notify(state);

        if expired {
            self.expire();
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Countdown state manager for a single timer.
///
/// Cloning yields another handle to the same countdown. Ticking requires a
/// tokio runtime; every command is synchronous and observers are notified
/// before the command returns.
#[derive(Clone)]
pub struct CountdownController {
    inner: Arc<Inner>,
}

impl CountdownController {
    /// Create an idle controller holding the full duration
    pub fn new(config: CountdownConfig) -> Self {
        let total_seconds = config.total_seconds();
        let initial = TimerState::new(total_seconds, config.always_show_hours);
        let (updates, _) = watch::channel(initial);

        Self {
            inner: Arc::new(Inner {
                total_seconds,
                always_show_hours: config.always_show_hours,
                on_expire: config.on_expire,
                core: Mutex::new(Core {
                    remaining_seconds: total_seconds,
                    generation: 0,
                    tick: None,
                }),
                observers: Mutex::new(Observers::new()),
                updates,
            }),
        }
    }

    /// Start counting down, optionally from `from_seconds` instead of the
    /// current remaining time. Any running tick is replaced.
    ///
    /// Overrides above the total duration are clamped to it.
    pub fn start(&self, from_seconds: Option<u64>) {
        let state = {
            let mut core = self.inner.core();
            if let Some(seconds) = from_seconds {
                core.remaining_seconds = seconds.min(self.inner.total_seconds);
            }
            self.inner.begin_run(&mut core);
            info!("Countdown started at {} seconds", core.remaining_seconds);
            self.inner.state_of(&core)
        };
        self.inner.notify(state);
    }

    /// Stop ticking and keep the remaining time. Always notifies.
    pub fn pause(&self) {
        let state = {
            let mut core = self.inner.core();
            core.cancel_tick();
            debug!("Countdown paused at {} seconds", core.remaining_seconds);
            self.inner.state_of(&core)
        };
        self.inner.notify(state);
    }

    /// Continue from the remaining time. Does nothing once expired.
    pub fn resume(&self) {
        let state = {
            let mut core = self.inner.core();
            if core.remaining_seconds == 0 {
                debug!("Resume ignored, countdown already expired");
                return;
            }
            self.inner.begin_run(&mut core);
            info!("Countdown resumed at {} seconds", core.remaining_seconds);
            self.inner.state_of(&core)
        };
        self.inner.notify(state);
    }

    /// Stop ticking and restore the full duration without firing the expire callback
    pub fn reset(&self) {
        let state = {
            let mut core = self.inner.core();
            core.cancel_tick();
            core.remaining_seconds = self.inner.total_seconds;
            info!("Countdown reset to {} seconds", core.remaining_seconds);
            self.inner.state_of(&core)
        };
        self.inner.notify(state);
    }

    /// Reset, then start counting from the full duration
    pub fn restart(&self) {
        self.reset();
        self.start(None);
    }

    /// Subtract time that passed without ticks, clamping at zero.
    ///
    /// Does not start ticking. Reaching zero from a positive value cancels
    /// the tick and fires the expire callback.
    pub fn update_by_seconds(&self, elapsed: u64) {
        let (state, expired) = {
            let mut core = self.inner.core();
            let before = core.remaining_seconds;
            core.remaining_seconds = before
                .saturating_sub(elapsed)
                .min(self.inner.total_seconds);

            let expired = core.remaining_seconds == 0;
            if expired {
                core.cancel_tick();
            }
            debug!(
                "Corrected countdown by {} seconds: {} -> {}",
                elapsed, before, core.remaining_seconds
            );
            (self.inner.state_of(&core), expired && before > 0)
        };

        self.inner.notify(state);

        if expired {
            self.inner.expire();
        }
    }

    /// Cancel ticking and drop every observer. Safe to call repeatedly.
    pub fn dispose(&self) {
        self.inner.core().cancel_tick();
        self.inner.observers().clear();
        debug!("Countdown disposed");
    }

    /// Register a change observer
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&TimerState) + Send + Sync + 'static,
    {
        self.inner.observers().subscribe(callback)
    }

    /// Remove a change observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers().unsubscribe(id)
    }

    /// Receiver that always holds the latest notified state
    pub fn watch(&self) -> watch::Receiver<TimerState> {
        self.inner.updates.subscribe()
    }

    pub fn snapshot(&self) -> TimerState {
        let core = self.inner.core();
        self.inner.state_of(&core)
    }

    pub fn formatted_time(&self) -> String {
        self.snapshot().formatted()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.inner.core().remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.inner.total_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.inner.core().remaining_seconds == 0
    }

    pub fn is_running(&self) -> bool {
        self.inner.core().tick.is_some()
    }
}

impl std::fmt::Debug for CountdownController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownController")
            .field("state", &self.snapshot())
            .finish()
    }
}
