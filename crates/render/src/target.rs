use glam::UVec2;

use crate::uniform::{ShaderInputs, UniformError};

/// Clip-space corners of the full-screen quad, in triangle-strip order.
pub const FULLSCREEN_QUAD: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];

/// Per-frame numbers handed to the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Render duration of this frame in seconds.
    pub render_time: f64,
    /// Frames per second averaged over the timing window.
    pub smoothed_rate: f64,
    pub frame_index: u64,
}

impl FrameStats {
    pub fn render_time_ms(&self) -> f64 {
        self.render_time * 1000.0
    }

    pub fn fps_label(&self) -> String {
        format!("Average FPS: {:.1}", self.smoothed_rate)
    }

    pub fn render_time_label(&self) -> String {
        format!("Current Render Time: {:.3} ms", self.render_time_ms())
    }
}

/// Whether the target has an image to draw into this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Ready,
    /// No image could be acquired this frame (surface lost, outdated or
    /// timed out). The target has already recovered as far as it can.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("GPU out of memory")]
    OutOfMemory,
    #[error("surface error: {0}")]
    Surface(String),
    #[error("render target used after release")]
    Released,
    #[error(transparent)]
    Uniform(#[from] UniformError),
}

/// A window-backed surface the render loop draws into.
///
/// Call order per frame: `acquire_frame`, then if it is ready
/// `framebuffer_size`, `bind_program` and the input writes,
/// `draw_fullscreen_quad` and `present`. `release` is called once when the
/// loop exits.
///
/// Waiting for a presentable image belongs in `acquire_frame`, which runs
/// before the frame timer starts.
pub trait FrameTarget {
    /// Current drawable size in physical pixels.
    fn framebuffer_size(&self) -> UVec2;

    /// Makes the shader program current and returns its input setter.
    fn bind_program(&mut self) -> Result<&mut dyn ShaderInputs, RenderError>;

    /// Obtains the image this frame draws into. May block on vsync.
    fn acquire_frame(&mut self) -> Result<DrawOutcome, RenderError>;

    /// Clears the acquired image and draws the four-vertex strip with the
    /// inputs written since `bind_program`.
    fn draw_fullscreen_quad(&mut self) -> Result<(), RenderError>;

    /// Draws the overlay over the submitted frame and shows it.
    fn present(&mut self, stats: &FrameStats) -> Result<(), RenderError>;

    /// Frees the program, quad geometry and any per-surface resources.
    fn release(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_use_fixed_precision() {
        let stats = FrameStats {
            render_time: 0.016_666_7,
            smoothed_rate: 59.94,
            frame_index: 7,
        };
        assert_eq!(stats.fps_label(), "Average FPS: 59.9");
        assert_eq!(stats.render_time_label(), "Current Render Time: 16.667 ms");
    }

    #[test]
    fn quad_covers_clip_space() {
        let (min, max) = FULLSCREEN_QUAD.iter().fold(
            ([f32::MAX; 2], [f32::MIN; 2]),
            |(lo, hi), p| {
                (
                    [lo[0].min(p[0]), lo[1].min(p[1])],
                    [hi[0].max(p[0]), hi[1].max(p[1])],
                )
            },
        );
        assert_eq!(min, [-1.0, -1.0]);
        assert_eq!(max, [1.0, 1.0]);
        // Strip order: the two triangles share the middle edge.
        assert_ne!(FULLSCREEN_QUAD[1], FULLSCREEN_QUAD[2]);
    }
}
