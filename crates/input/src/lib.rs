//! Input: device events folded into one polled snapshot per frame.
//!
//! # Invariants
//! - Movement keys are level-triggered; jump and view toggles are pulses that
//!   appear in exactly one frame snapshot.
//! - The controller reads [`InputFrame`]s only, never raw device events.
//! - Nothing here knows about a windowing library; keys are bound by name.

pub mod action;
mod collector;
mod frame;

pub use action::{Action, KeyBindings};
pub use collector::InputCollector;
pub use frame::InputFrame;

pub fn crate_info() -> &'static str {
    "promenade-input v0.1.0"
}
