use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of monotonic timestamps, in seconds from an arbitrary origin.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall-clock time source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven time source for deterministic replay and tests.
///
/// Clones share the same timeline, so a loop can own one handle while the
/// driver advances another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }

    /// Sets the absolute time. Going backwards is allowed so callers can
    /// simulate a broken source.
    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
