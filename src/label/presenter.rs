//! Label presenter: renders a countdown and reconciles it across host suspension

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{
    clock::{elapsed_whole_seconds, WallClock},
    LifecycleBus, LifecycleSignal,
};
use crate::{
    state::{CountdownController, SubscriptionId, TimerState},
    tasks::spawn_lifecycle_listener,
};

struct PresenterInner {
    controller: CountdownController,
    clock: Arc<dyn WallClock>,
    text: Mutex<String>,
    suspended_at: Mutex<Option<DateTime<Utc>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PresenterInner {
    fn render(&self, state: &TimerState) {
        let text = state.formatted();
        debug!("Rendering label: {}", text);
        *locked(&self.text) = text;
    }

    fn handle_signal(&self, signal: LifecycleSignal) {
        match signal {
            LifecycleSignal::AboutToSuspend => {
                let now = self.clock.now();
                *locked(&self.suspended_at) = Some(now);
                info!("Host suspending at {}, pausing countdown", now);
                self.controller.pause();
            }
            LifecycleSignal::Resumed => {
                let suspended_at = locked(&self.suspended_at).take();
                if let Some(since) = suspended_at {
                    let elapsed = elapsed_whole_seconds(since, self.clock.now());
                    info!("Host resumed after {} seconds, reconciling countdown", elapsed);
                    self.controller.update_by_seconds(elapsed);
                }
                if !self.controller.is_expired() {
                    self.controller.resume();
                }
            }
            LifecycleSignal::Detached => {
                info!("Host detached, resetting countdown");
                self.controller.reset();
            }
            LifecycleSignal::Other => {}
        }
    }
}

/// Presentation side of a countdown label.
///
/// Holds a handle to the controller, keeps the rendered text current and
/// translates host lifecycle signals into controller commands. Unmounting
/// (explicitly or on drop) releases both registrations.
pub struct LabelPresenter {
    inner: Arc<PresenterInner>,
    subscription: Option<SubscriptionId>,
    listener: Option<JoinHandle<()>>,
}

impl LabelPresenter {
    /// Subscribe to `controller` and render its current state. No lifecycle
    /// listener is registered; feed signals through [`handle_signal`](Self::handle_signal)
    /// or call [`listen`](Self::listen).
    pub fn new(controller: CountdownController, clock: Arc<dyn WallClock>) -> Self {
        let inner = Arc::new(PresenterInner {
            controller,
            clock,
            text: Mutex::new(String::new()),
            suspended_at: Mutex::new(None),
        });

        let weak: Weak<PresenterInner> = Arc::downgrade(&inner);
        let subscription = inner.controller.subscribe(move |state| {
            if let Some(inner) = weak.upgrade() {
                inner.render(state);
            }
        });
        inner.render(&inner.controller.snapshot());

        Self {
            inner,
            subscription: Some(subscription),
            listener: None,
        }
    }

    /// Subscribe to `controller` and register on `bus`. Must be called within a tokio runtime.
    pub fn mount(controller: CountdownController, bus: &LifecycleBus, clock: Arc<dyn WallClock>) -> Self {
        let mut presenter = Self::new(controller, clock);
        presenter.listen(bus);
        presenter
    }

    /// Register as a lifecycle listener on `bus`, replacing any previous registration
    pub fn listen(&mut self, bus: &LifecycleBus) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
        let weak = Arc::downgrade(&self.inner);
        self.listener = Some(spawn_lifecycle_listener(bus.subscribe(), move |signal| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_signal(signal);
            }
        }));
    }

    /// React to one host lifecycle signal
    pub fn handle_signal(&self, signal: LifecycleSignal) {
        self.inner.handle_signal(signal);
    }

    /// Currently displayed label text
    pub fn text(&self) -> String {
        locked(&self.inner.text).clone()
    }

    pub fn controller(&self) -> &CountdownController {
        &self.inner.controller
    }

    /// Whether a suspend timestamp is waiting to be consumed by a resume
    pub fn is_suspended(&self) -> bool {
        locked(&self.inner.suspended_at).is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some() || self.listener.is_some()
    }

    /// Stop rendering and stop listening for lifecycle signals. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.inner.controller.unsubscribe(subscription);
        }
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

impl Drop for LabelPresenter {
    fn drop(&mut self) {
        self.unmount();
    }
}
