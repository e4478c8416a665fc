use std::fmt;
use std::str::FromStr;

use crate::uniform::{UniformKind, UniformLayout};

pub const INPUT_RESOLUTION: &str = "iResolution";
pub const INPUT_TIME: &str = "iTime";
pub const INPUT_YAW: &str = "yaw";
pub const INPUT_PITCH: &str = "pitch";
pub const INPUT_CAMERA_POS: &str = "cameraPos";

/// Vertex stage shared by every variant.
pub const VERTEX_FILE: &str = "fullscreen.vert.wgsl";

/// Which fragment shader is bound, and so which inputs it expects.
///
/// The input list is the contract with the fragment source: the render loop
/// pushes exactly these names, and the shader's uniform struct declares
/// exactly these members in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderVariant {
    /// Camera orbits the scene; only the view angles are supplied.
    Orientation,
    /// Ray origin is supplied; the shader aims at the scene centre.
    WorldOrigin,
    /// Position and view angles both supplied.
    #[default]
    FreeFlight,
}

impl ShaderVariant {
    pub const ALL: [ShaderVariant; 3] = [
        ShaderVariant::Orientation,
        ShaderVariant::WorldOrigin,
        ShaderVariant::FreeFlight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShaderVariant::Orientation => "orientation",
            ShaderVariant::WorldOrigin => "world-origin",
            ShaderVariant::FreeFlight => "free-flight",
        }
    }

    pub fn fragment_file(self) -> &'static str {
        match self {
            ShaderVariant::Orientation => "raymarch_orbit.frag.wgsl",
            ShaderVariant::WorldOrigin => "raymarch_origin.frag.wgsl",
            ShaderVariant::FreeFlight => "raymarch.frag.wgsl",
        }
    }

    /// Uniform members in declaration order.
    pub fn inputs(self) -> &'static [(&'static str, UniformKind)] {
        const ORIENTATION: &[(&str, UniformKind)] = &[
            (INPUT_RESOLUTION, UniformKind::Vec2),
            (INPUT_TIME, UniformKind::F32),
            (INPUT_YAW, UniformKind::F32),
            (INPUT_PITCH, UniformKind::F32),
        ];
        const WORLD_ORIGIN: &[(&str, UniformKind)] = &[
            (INPUT_RESOLUTION, UniformKind::Vec2),
            (INPUT_TIME, UniformKind::F32),
            (INPUT_CAMERA_POS, UniformKind::Vec3),
        ];
        const FREE_FLIGHT: &[(&str, UniformKind)] = &[
            (INPUT_RESOLUTION, UniformKind::Vec2),
            (INPUT_TIME, UniformKind::F32),
            (INPUT_YAW, UniformKind::F32),
            (INPUT_PITCH, UniformKind::F32),
            (INPUT_CAMERA_POS, UniformKind::Vec3),
        ];

        match self {
            ShaderVariant::Orientation => ORIENTATION,
            ShaderVariant::WorldOrigin => WORLD_ORIGIN,
            ShaderVariant::FreeFlight => FREE_FLIGHT,
        }
    }

    pub fn uniform_layout(self) -> UniformLayout {
        UniformLayout::new(self.inputs())
    }

    pub fn uses_angles(self) -> bool {
        matches!(self, ShaderVariant::Orientation | ShaderVariant::FreeFlight)
    }

    pub fn uses_position(self) -> bool {
        matches!(self, ShaderVariant::WorldOrigin | ShaderVariant::FreeFlight)
    }
}

impl fmt::Display for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shader variant `{0}` (expected orientation, world-origin or free-flight)")]
pub struct ParseVariantError(pub String);

impl FromStr for ShaderVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseVariantError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_and_position_sets_follow_variant() {
        let names = |v: ShaderVariant| v.inputs().iter().map(|(n, _)| *n).collect::<Vec<_>>();

        assert_eq!(
            names(ShaderVariant::Orientation),
            vec!["iResolution", "iTime", "yaw", "pitch"]
        );
        assert_eq!(
            names(ShaderVariant::WorldOrigin),
            vec!["iResolution", "iTime", "cameraPos"]
        );
        assert!(!ShaderVariant::Orientation.uses_position());
        assert!(!ShaderVariant::WorldOrigin.uses_angles());
        assert!(ShaderVariant::FreeFlight.uses_angles());
        assert!(ShaderVariant::FreeFlight.uses_position());
    }

    #[test]
    fn layouts_match_wgsl_structs() {
        assert_eq!(ShaderVariant::Orientation.uniform_layout().size(), 32);
        assert_eq!(ShaderVariant::WorldOrigin.uniform_layout().size(), 32);
        assert_eq!(ShaderVariant::FreeFlight.uniform_layout().size(), 48);
        let origin = ShaderVariant::WorldOrigin.uniform_layout();
        assert_eq!(origin.field(INPUT_CAMERA_POS).map(|f| f.offset), Some(16));
    }

    #[test]
    fn parses_names() {
        for v in ShaderVariant::ALL {
            assert_eq!(v.name().parse::<ShaderVariant>(), Ok(v));
        }
        assert_eq!(
            "Free-Flight".parse::<ShaderVariant>(),
            Ok(ShaderVariant::FreeFlight)
        );
        assert!("pinhole".parse::<ShaderVariant>().is_err());
        assert_eq!(ShaderVariant::default(), ShaderVariant::FreeFlight);
    }
}
