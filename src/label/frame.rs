//! Serializable output record for one rendered label state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerState;

/// What a label showed at a given moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelFrame {
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub state: TimerState,
}

impl LabelFrame {
    /// Create a frame stamped with the current time
    pub fn new(label: String, state: TimerState) -> Self {
        Self {
            timestamp: Utc::now(),
            label,
            state,
        }
    }
}
