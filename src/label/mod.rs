//! Label presentation module
//!
//! The consumer side of a countdown: the presenter that renders it, and the
//! host lifecycle plumbing it reacts to.

pub mod clock;
pub mod frame;
pub mod lifecycle;
pub mod presenter;

// Re-export main types
pub use clock::{ManualClock, SystemClock, WallClock};
pub use frame::LabelFrame;
pub use lifecycle::{LifecycleBus, LifecycleSignal};
pub use presenter::LabelPresenter;
