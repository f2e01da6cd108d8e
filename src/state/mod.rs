//! State management module
//!
//! This module contains the countdown state machine and its observable snapshot.

pub mod countdown;
pub mod observers;
pub mod timer_state;

// Re-export main types
pub use countdown::CountdownController;
pub use observers::{Observers, SubscriptionId};
pub use timer_state::{format_time, TimerState};
