use glam::{DVec2, Vec3};

use crate::camera::CameraState;
use crate::drag::DragState;
use crate::event::{HeldKeys, InputEvent, MoveKey};

/// Tuning for camera response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputConfig {
    /// Degrees of rotation per pixel of drag.
    pub sensitivity: f32,
    /// Units per second while a movement key is held.
    pub speed: f32,
    pub initial_camera: CameraState,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            speed: 2.5,
            initial_camera: CameraState::default(),
        }
    }
}

/// Camera + drag + key-hold state, advanced only by the render loop.
///
/// Rotation comes from cursor deltas during a drag and is independent of
/// frame timing; translation is integrated once per frame from the held
/// keys and the frame's delta time.
#[derive(Debug, Clone)]
pub struct InputState {
    config: InputConfig,
    camera: CameraState,
    drag: DragState,
    held: HeldKeys,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl InputState {
    pub fn new(config: InputConfig) -> Self {
        Self {
            camera: config.initial_camera,
            config,
            drag: DragState::default(),
            held: HeldKeys::default(),
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn held_keys(&self) -> HeldKeys {
        self.held
    }

    pub fn on_drag_start(&mut self) {
        self.drag.begin();
        tracing::debug!("drag engaged");
    }

    pub fn on_drag_end(&mut self) {
        self.drag.end();
        tracing::debug!(
            yaw = self.camera.yaw(),
            pitch = self.camera.pitch(),
            "drag released"
        );
    }

    /// Rotates the camera by the scaled cursor delta while a drag is active.
    ///
    /// `yaw -= dx * sensitivity`, `pitch += dy * sensitivity`.
    pub fn on_cursor_move(&mut self, x: f64, y: f64) {
        let Some(delta) = self.drag.sample(DVec2::new(x, y)) else {
            return;
        };
        let scaled = delta.as_vec2() * self.config.sensitivity;
        self.camera.rotate(-scaled.x, scaled.y);
    }

    /// Moves the camera for every key in `held`, `speed * dt` each.
    ///
    /// Simultaneous keys add up, so forward + strafe moves diagonally.
    pub fn on_key_hold(&mut self, held: HeldKeys, dt: f32) {
        let velocity = self.config.speed * dt;
        let forward = self.camera.forward();
        let right = self.camera.right();

        let mut displacement = Vec3::ZERO;
        for key in held.iter() {
            displacement += match key {
                MoveKey::Forward => forward,
                MoveKey::Back => -forward,
                MoveKey::StrafeLeft => -right,
                MoveKey::StrafeRight => right,
            } * velocity;
        }
        self.camera.position += displacement;
    }

    /// Integrates the currently held keys over `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        self.on_key_hold(self.held, dt);
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::CursorMoved { x, y } => self.on_cursor_move(x, y),
            InputEvent::DragStarted => self.on_drag_start(),
            InputEvent::DragEnded => self.on_drag_end(),
            InputEvent::Key { key, pressed: true } => self.held.press(key),
            InputEvent::Key { key, pressed: false } => self.held.release(key),
            InputEvent::FocusLost => {
                self.held.clear();
                if self.drag.is_active() {
                    self.on_drag_end();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PITCH_LIMIT;

    const EPS: f32 = 1e-5;

    fn state_at(yaw: f32, pitch: f32) -> InputState {
        InputState::new(InputConfig {
            initial_camera: CameraState::new(Vec3::ZERO, yaw, pitch),
            ..InputConfig::default()
        })
    }

    #[test]
    fn cursor_move_without_drag_is_noop() {
        let mut input = InputState::default();
        let before = *input.camera();
        input.on_cursor_move(10.0, 10.0);
        input.on_cursor_move(200.0, -40.0);
        assert_eq!(*input.camera(), before);
    }

    #[test]
    fn drag_delta_scaled_by_sensitivity() {
        let mut input = state_at(0.0, 0.0);
        input.on_drag_start();
        input.on_cursor_move(100.0, 100.0);
        input.on_cursor_move(110.0, 95.0);

        assert!((input.camera().yaw() - -1.0).abs() < EPS);
        assert!((input.camera().pitch() - -0.5).abs() < EPS);
    }

    #[test]
    fn resumed_drag_does_not_jump() {
        let mut input = state_at(0.0, 0.0);
        input.on_drag_start();
        input.on_cursor_move(0.0, 0.0);
        input.on_cursor_move(20.0, 0.0);
        input.on_drag_end();
        let yaw_after_first_drag = input.camera().yaw();

        // Cursor moves far away while released.
        input.on_cursor_move(5000.0, -5000.0);
        input.on_drag_start();
        input.on_cursor_move(5000.0, -5000.0);

        assert_eq!(input.camera().yaw(), yaw_after_first_drag);
        assert_eq!(input.camera().pitch(), 0.0);
    }

    #[test]
    fn pitch_stays_clamped_under_long_drags() {
        let mut input = state_at(0.0, 0.0);
        input.on_drag_start();
        input.on_cursor_move(0.0, 0.0);
        for i in 1..100 {
            input.on_cursor_move(0.0, i as f64 * 50.0);
            assert!(input.camera().pitch() <= PITCH_LIMIT);
            assert!((input.camera().forward().length() - 1.0).abs() < EPS);
        }
        assert_eq!(input.camera().pitch(), PITCH_LIMIT);

        for i in (-100..100).rev() {
            input.on_cursor_move(0.0, i as f64 * 50.0);
            assert!(input.camera().pitch() >= -PITCH_LIMIT);
        }
        assert_eq!(input.camera().pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn forward_and_strafe_compose_additively() {
        let mut combined = InputState::default();
        let forward = combined.camera().forward();
        let right = combined.camera().right();
        let start = combined.camera().position;

        let held: HeldKeys = [MoveKey::Forward, MoveKey::StrafeRight].into_iter().collect();
        combined.on_key_hold(held, 0.1);

        let expected = start + forward * 0.25 + right * 0.25;
        assert!((combined.camera().position - expected).length() < EPS);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = InputState::default();
        let start = input.camera().position;
        let held: HeldKeys = MoveKey::ALL.into_iter().collect();
        input.on_key_hold(held, 0.5);
        assert!((input.camera().position - start).length() < EPS);
    }

    #[test]
    fn strafe_left_mirrors_strafe_right() {
        let mut left = InputState::default();
        let mut right = InputState::default();
        let start = left.camera().position;

        left.on_key_hold([MoveKey::StrafeLeft].into_iter().collect(), 1.0);
        right.on_key_hold([MoveKey::StrafeRight].into_iter().collect(), 1.0);

        let l = left.camera().position - start;
        let r = right.camera().position - start;
        assert!((l + r).length() < EPS);
        assert!((r.length() - 2.5).abs() < EPS);
    }

    #[test]
    fn key_events_drive_integration() {
        let mut input = InputState::default();
        let start = input.camera().position;
        input.apply(InputEvent::Key {
            key: MoveKey::Forward,
            pressed: true,
        });
        input.integrate(1.0);
        let moved = input.camera().position;
        assert!((moved - (start + Vec3::NEG_Z * 2.5)).length() < EPS);

        input.apply(InputEvent::Key {
            key: MoveKey::Forward,
            pressed: false,
        });
        input.integrate(1.0);
        assert_eq!(input.camera().position, moved);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut input = InputState::default();
        input.apply(InputEvent::DragStarted);
        input.apply(InputEvent::Key {
            key: MoveKey::Back,
            pressed: true,
        });
        input.apply(InputEvent::FocusLost);
        assert!(input.held_keys().is_empty());
        assert!(!input.drag().is_active());
    }
}
