//! Renderer-agnostic side of the viewer: named shader inputs, shader
//! variants, source loading and the per-frame target contract.
//!
//! # Invariants
//! - Uniform layouts follow WGSL alignment; a `vec3<f32>` member starts on
//!   a 16-byte boundary and every block is padded to a multiple of 16 bytes.
//! - The render loop writes shader inputs only through [`ShaderInputs`],
//!   by name, and an unknown name is an error rather than a silent no-op.
//! - A variant's input list and its fragment source's uniform struct agree.

mod source;
mod target;
mod uniform;
mod variant;

pub use source::{ShaderError, ShaderFile, ShaderSources, ShaderStage};
pub use target::{DrawOutcome, FULLSCREEN_QUAD, FrameStats, FrameTarget, RenderError};
pub use uniform::{
    ShaderInputs, UniformBlock, UniformError, UniformField, UniformKind, UniformLayout,
    UniformValue,
};
pub use variant::{
    INPUT_CAMERA_POS, INPUT_PITCH, INPUT_RESOLUTION, INPUT_TIME, INPUT_YAW, ParseVariantError,
    ShaderVariant, VERTEX_FILE,
};
