//! Utility functions module
//!
//! This module contains utility functions used by the demo label.

pub mod signals;

// Re-export main functions
pub use signals::forward_process_signals;
