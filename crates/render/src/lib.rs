//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read a [`FrameOutput`] and never write back into the
//!   controller.
//! - Everything a renderer draws for the avatar and camera comes from the
//!   frame output of the same frame.

mod renderer;

pub use renderer::{DebugTextRenderer, FrameOutput, Renderer};

pub fn crate_info() -> &'static str {
    "promenade-render v0.1.0"
}
