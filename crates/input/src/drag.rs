use glam::DVec2;

/// Mouse-drag gesture tracking.
///
/// While `armed` is set the next cursor sample only establishes a baseline;
/// no delta is produced for it. Every drag start re-arms, so resuming a drag
/// after the cursor wandered never jumps the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    active: bool,
    armed: bool,
    last: Option<DVec2>,
}

impl DragState {
    pub fn begin(&mut self) {
        self.active = true;
        self.armed = true;
        self.last = None;
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_position(&self) -> Option<DVec2> {
        self.last
    }

    /// Feeds a cursor sample and returns the delta from the previous one.
    ///
    /// Returns `None` when no drag is active or the sample is the baseline.
    pub fn sample(&mut self, position: DVec2) -> Option<DVec2> {
        if !self.active {
            return None;
        }

        let delta = match (self.armed, self.last) {
            (false, Some(prev)) => Some(position - prev),
            _ => None,
        };
        self.armed = false;
        self.last = Some(position);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_drag_ignores_samples() {
        let mut drag = DragState::default();
        assert_eq!(drag.sample(DVec2::new(5.0, 5.0)), None);
        assert_eq!(drag.last_position(), None);
    }

    #[test]
    fn first_sample_is_baseline() {
        let mut drag = DragState::default();
        drag.begin();
        assert_eq!(drag.sample(DVec2::new(100.0, 50.0)), None);
        assert_eq!(
            drag.sample(DVec2::new(110.0, 45.0)),
            Some(DVec2::new(10.0, -5.0))
        );
        assert_eq!(drag.last_position(), Some(DVec2::new(110.0, 45.0)));
    }

    #[test]
    fn restart_rearms_baseline() {
        let mut drag = DragState::default();
        drag.begin();
        drag.sample(DVec2::new(0.0, 0.0));
        drag.sample(DVec2::new(1.0, 1.0));
        drag.end();
        assert!(!drag.is_active());

        drag.begin();
        assert_eq!(drag.last_position(), None);
        assert_eq!(drag.sample(DVec2::new(900.0, 900.0)), None);
    }
}
