//! Timer state snapshot and the time formatting rule

use serde::{Deserialize, Serialize};

/// Point-in-time view of a countdown, handed to observers on every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    /// Whether a tick is currently scheduled
    pub running: bool,
    pub always_show_hours: bool,
}

impl TimerState {
    /// Create an idle timer state with the full duration remaining
    pub fn new(total_seconds: u64, always_show_hours: bool) -> Self {
        Self {
            remaining_seconds: total_seconds,
            total_seconds,
            running: false,
            always_show_hours,
        }
    }

    /// Check if the countdown reached zero
    pub fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Check if the timer is ticking
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining time rendered for display
    pub fn formatted(&self) -> String {
        format_time(self.remaining_seconds, self.always_show_hours)
    }
}

/// Render whole seconds as `MM:SS`, or `HH:MM:SS` when hours are forced or non-zero.
pub fn format_time(total_seconds: u64, always_show_hours: bool) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if always_show_hours || hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
