use glam::Vec3;

/// Pitch is clamped to this many degrees either side of the horizon.
pub const PITCH_LIMIT: f32 = 89.0;

/// Fly camera pose: position plus yaw/pitch in degrees.
///
/// `forward` is derived state. It is recomputed every time yaw or pitch
/// changes, so it is always unit length and matches the current angles:
///
/// `forward = normalize(cos(yaw)cos(pitch), sin(pitch), sin(yaw)cos(pitch))`
///
/// With this convention yaw = -90°, pitch = 0° looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    forward: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 3.0, -3.0), -90.0, 0.0)
    }
}

impl CameraState {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            forward: Vec3::NEG_Z,
        };
        camera.set_orientation(yaw, pitch);
        camera
    }

    /// Yaw in degrees. Unbounded; wraps freely.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees, always within `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Strafe axis: `normalize(forward × world_up)`.
    pub fn right(&self) -> Vec3 {
        self.forward.cross(Vec3::Y).normalize_or_zero()
    }

    /// Sets yaw and pitch (degrees), clamping pitch and refreshing `forward`.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.forward = forward_from_angles(self.yaw, self.pitch);
    }

    /// Applies an angular delta in degrees.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.set_orientation(self.yaw + yaw_delta, self.pitch + pitch_delta);
    }
}

fn forward_from_angles(yaw_deg: f32, pitch_deg: f32) -> Vec3 {
    let (yaw, pitch) = (yaw_deg.to_radians(), pitch_deg.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}
