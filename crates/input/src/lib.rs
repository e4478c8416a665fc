//! Desktop input mapped onto a fly camera.
//!
//! # Invariants
//! - Pitch stays within ±89°; the forward vector is unit length and always
//!   derived from the current yaw/pitch.
//! - Raw events are queued and applied by the render loop once per frame;
//!   no state is touched from callback context.
//! - The first cursor sample of every drag only sets a baseline.

mod camera;
mod drag;
mod event;
mod state;

pub use camera::{CameraState, PITCH_LIMIT};
pub use drag::DragState;
pub use event::{EventQueue, HeldKeys, InputEvent, MoveKey};
pub use state::{InputConfig, InputState};
