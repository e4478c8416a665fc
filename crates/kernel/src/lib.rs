//! Render loop: one [`Viewer::step`] per displayed frame.
//!
//! # Invariants
//! - Each step completes input, uniform update, draw, timing and present
//!   before the next begins.
//! - Input events reach camera state only when a step drains the queue.
//! - A close request is honoured at the top of a step; the target is
//!   released exactly once.

pub mod viewer;

pub use viewer::{FrameReport, Step, Viewer, ViewerConfig, ViewerError};
