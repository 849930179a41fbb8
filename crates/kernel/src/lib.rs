//! Controller kernel: everything that happens between an input snapshot and
//! the transforms handed to a renderer.
//!
//! # Invariants
//! - A move is committed only when the floor under both the current and the
//!   proposed position is known; a rejected move leaves the avatar untouched.
//! - After a committed move the avatar stands exactly half its height above
//!   the floor it moved onto.
//! - The jump window never grows except on a jump press and never goes below 0.
//! - Pitch stays inside the configured clamp; yaw is unbounded.
//! - The camera is recomputed every frame and feeds nothing back except its
//!   forward direction, which orients the next frame's movement.

pub mod avatar;
pub mod camera;
pub mod jump;
pub mod movement;
pub mod query;
pub mod state;
pub mod view;

#[cfg(test)]
mod testing;

pub use avatar::Avatar;
pub use camera::CameraPose;
pub use jump::JumpWindow;
pub use movement::{BlockReason, MoveOutcome};
pub use query::{QueryEngine, QueryStats};
pub use state::{FrameReport, GameState, SpawnOutcome};
pub use view::{LookControl, ViewState, ViewTransition};
