//! Frame timing: render-duration measurement and a smoothed frame rate.
//!
//! # Invariants
//! - The timing window never holds more than its capacity.
//! - The smoothed rate is `1 / mean(window)` and is never computed on an
//!   empty window.
//! - A time source that goes backwards or yields NaN is an error, never
//!   averaged in.

mod clock;
mod timer;
mod window;

pub use clock::{ManualClock, MonotonicClock, TimeSource};
pub use timer::{FrameSample, FrameTimer, MIN_FRAME_DURATION, TimingError};
pub use window::{DEFAULT_WINDOW_CAPACITY, FrameTimingWindow};
