//! Countdown Label - a countdown timer state manager for display labels
//!
//! This library tracks a whole-second countdown, ticks it once per second,
//! exposes the formatted remaining time and corrects it for time spent while
//! the host application was suspended.

pub mod config;
pub mod label;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, CountdownConfig};
pub use label::{LabelPresenter, LifecycleBus, LifecycleSignal, SystemClock, WallClock};
pub use state::{format_time, CountdownController, SubscriptionId, TimerState};
pub use utils::signals::forward_process_signals;
