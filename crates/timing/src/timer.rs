use crate::clock::TimeSource;
use crate::window::FrameTimingWindow;

/// Shortest duration recorded (one microsecond). Anything shorter, zero
/// included, is raised to it so the rolling mean never divides by zero.
pub const MIN_FRAME_DURATION: f64 = 1e-6;

/// Errors from frame timing.
///
/// All of these mean the loop or its time source is broken; callers treat
/// them as fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimingError {
    #[error("begin_frame called while a frame is already being timed")]
    FrameInProgress,
    #[error("end_frame called without a matching begin_frame")]
    NoFrameInProgress,
    #[error("time source went backwards: frame elapsed {0}s")]
    NegativeElapsed(f64),
    #[error("time source produced a non-finite reading: {0}")]
    NonFinite(f64),
}

/// Result of a completed frame measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// This frame's duration in seconds (after the zero floor).
    pub elapsed: f64,
    /// `1 / mean(window)` including this frame.
    pub smoothed_rate: f64,
}

impl FrameSample {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed * 1000.0
    }
}

/// Measures render duration per frame and keeps the rolling average.
///
/// `begin_frame` and `end_frame` must alternate. A frame that will not be
/// displayed can be dropped with `abandon_frame` so it never enters the
/// window.
#[derive(Debug)]
pub struct FrameTimer<T: TimeSource> {
    clock: T,
    window: FrameTimingWindow,
    started_at: Option<f64>,
}

impl<T: TimeSource> FrameTimer<T> {
    pub fn new(clock: T, capacity: usize) -> Self {
        Self {
            clock,
            window: FrameTimingWindow::new(capacity),
            started_at: None,
        }
    }

    pub fn window(&self) -> &FrameTimingWindow {
        &self.window
    }

    pub fn is_timing(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn begin_frame(&mut self) -> Result<(), TimingError> {
        if self.started_at.is_some() {
            return Err(TimingError::FrameInProgress);
        }
        let now = finite(self.clock.now())?;
        self.started_at = Some(now);
        Ok(())
    }

    pub fn end_frame(&mut self) -> Result<FrameSample, TimingError> {
        let start = self
            .started_at
            .take()
            .ok_or(TimingError::NoFrameInProgress)?;
        let elapsed = finite(self.clock.now())? - start;
        if elapsed < 0.0 {
            return Err(TimingError::NegativeElapsed(elapsed));
        }

        let elapsed = elapsed.max(MIN_FRAME_DURATION);
        self.window.push(elapsed);

        // Non-empty after the push.
        let smoothed_rate = self.window.smoothed_rate().unwrap_or(1.0 / elapsed);
        Ok(FrameSample {
            elapsed,
            smoothed_rate,
        })
    }

    /// Drops the pending measurement, if any.
    pub fn abandon_frame(&mut self) {
        if self.started_at.take().is_some() {
            tracing::trace!("frame measurement abandoned");
        }
    }
}

fn finite(reading: f64) -> Result<f64, TimingError> {
    if reading.is_finite() {
        Ok(reading)
    } else {
        Err(TimingError::NonFinite(reading))
    }
}
