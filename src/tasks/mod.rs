//! Background tasks module
//!
//! This module contains the tasks that drive a countdown: the periodic tick
//! and the lifecycle listener.

pub mod lifecycle;
pub mod tick;

// Re-export main items
pub use lifecycle::spawn_lifecycle_listener;
pub use tick::{TickHandle, TICK_PERIOD};
