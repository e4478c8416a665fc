//! wgpu render backend for the raymarch viewer.
//!
//! Draws one full-screen quad through a fragment shader loaded from disk.
//! The shader's inputs live in a single uniform block at group 0,
//! binding 0, laid out by the variant's input list.
//!
//! # Invariants
//! - The uniform buffer is exactly the variant's layout size.
//! - Shader compile and link failures are returned, never panicked on.

mod gpu;

pub use gpu::QuadRenderer;
