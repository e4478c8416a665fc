use std::collections::VecDeque;

/// Default number of frames averaged for the smoothed rate.
pub const DEFAULT_WINDOW_CAPACITY: usize = 100;

/// Fixed-capacity FIFO of recent frame durations (seconds).
///
/// Pushing past capacity evicts from the head, so the window always holds
/// the most recent `capacity` samples, oldest first.
#[derive(Debug, Clone)]
pub struct FrameTimingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Default for FrameTimingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

impl FrameTimingWindow {
    /// Creates an empty window. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn push(&mut self, duration: f64) {
        self.samples.push_back(duration);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Mean duration, or `None` for an empty window.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Frames per second over the window: `1 / mean`.
    pub fn smoothed_rate(&self) -> Option<f64> {
        self.mean().map(|mean| 1.0 / mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_has_no_mean() {
        let window = FrameTimingWindow::new(4);
        assert!(window.is_empty());
        assert_eq!(window.mean(), None);
        assert_eq!(window.smoothed_rate(), None);
    }

    #[test]
    fn single_sample_rate_is_reciprocal() {
        let mut window = FrameTimingWindow::new(4);
        window.push(0.004);
        assert_eq!(window.smoothed_rate(), Some(1.0 / 0.004));
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut window = FrameTimingWindow::new(3);
        for d in [0.01, 0.02, 0.03, 0.04] {
            window.push(d);
        }
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![0.02, 0.03, 0.04]);

        let mean = window.mean().unwrap();
        assert!((mean - 0.03).abs() < 1e-12);
        let rate = window.smoothed_rate().unwrap();
        assert!((rate - 33.333_333).abs() < 1e-3);
    }

    #[test]
    fn never_exceeds_capacity() {
        let capacity = 5;
        let mut window = FrameTimingWindow::new(capacity);
        for k in 0..(capacity + 37) {
            window.push(k as f64);
            assert!(window.len() <= capacity);
        }
        let expected: Vec<f64> = (37..(capacity + 37)).map(|k| k as f64).collect();
        assert_eq!(window.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn rate_matches_mean_for_any_state() {
        let mut window = FrameTimingWindow::new(7);
        for k in 1..20 {
            window.push(0.001 * k as f64);
            let mean = window.iter().sum::<f64>() / window.len() as f64;
            assert_eq!(window.smoothed_rate(), Some(1.0 / mean));
        }
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut window = FrameTimingWindow::new(0);
        window.push(0.5);
        window.push(0.25);
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![0.25]);
    }
}
