use glam::DVec2;
use winit::window::{CursorGrabMode, Window};

/// Cursor position fed to the camera while the pointer is grabbed.
///
/// A locked cursor stops producing window `CursorMoved` events, so during a
/// grab the position is advanced from raw mouse motion instead. When the
/// platform refuses the grab, window positions keep flowing through.
#[derive(Debug, Default)]
pub struct VirtualCursor {
    grabbed: bool,
    position: DVec2,
}

impl VirtualCursor {
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Starts a grab at the last known window position.
    pub fn engage(&mut self, grabbed: bool) {
        self.grabbed = grabbed;
    }

    pub fn release(&mut self) {
        self.grabbed = false;
    }

    /// Window cursor event. Returns the position to forward, if any.
    pub fn on_cursor_moved(&mut self, position: DVec2) -> Option<DVec2> {
        if self.grabbed {
            return None;
        }
        self.position = position;
        Some(position)
    }

    /// Raw device motion. Only produces a position during a grab.
    pub fn on_motion(&mut self, delta: DVec2) -> Option<DVec2> {
        if !self.grabbed {
            return None;
        }
        self.position += delta;
        Some(self.position)
    }
}

/// Hides the cursor and grabs it, preferring `Locked`. Returns whether any
/// grab mode was accepted.
pub fn grab(window: &Window) -> bool {
    window.set_cursor_visible(false);
    let result = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("cursor grab unavailable, using window positions: {e}");
            false
        }
    }
}

pub fn ungrab(window: &Window) {
    if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        tracing::warn!("failed to release cursor grab: {e}");
    }
    window.set_cursor_visible(true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_positions_pass_through_without_grab() {
        let mut cursor = VirtualCursor::default();
        assert_eq!(
            cursor.on_cursor_moved(DVec2::new(5.0, 6.0)),
            Some(DVec2::new(5.0, 6.0))
        );
        assert_eq!(cursor.on_motion(DVec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn grab_accumulates_motion_from_last_position() {
        let mut cursor = VirtualCursor::default();
        cursor.on_cursor_moved(DVec2::new(100.0, 100.0));
        cursor.engage(true);

        assert_eq!(cursor.on_cursor_moved(DVec2::new(0.0, 0.0)), None);
        assert_eq!(
            cursor.on_motion(DVec2::new(10.0, -5.0)),
            Some(DVec2::new(110.0, 95.0))
        );
        assert_eq!(
            cursor.on_motion(DVec2::new(1.0, 1.0)),
            Some(DVec2::new(111.0, 96.0))
        );

        cursor.release();
        assert!(!cursor.is_grabbed());
        assert_eq!(cursor.on_motion(DVec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn refused_grab_keeps_window_positions() {
        let mut cursor = VirtualCursor::default();
        cursor.engage(false);
        assert!(cursor.on_cursor_moved(DVec2::new(3.0, 4.0)).is_some());
    }
}
