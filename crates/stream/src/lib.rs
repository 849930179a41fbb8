//! Streaming: environment meshes load off the frame thread.
//!
//! # Invariants
//! - The frame loop never blocks on a load; it drains finished jobs each frame.
//! - Surfaces are built on the loader thread but only registered on the
//!   frame thread.
//! - Spawn fires once, after both meshes have loaded, in whichever order
//!   they finish. A failed load leaves the join open forever.

mod loader;
mod timing;
mod tracker;

pub use loader::{EnvironmentLoader, LoadError, LoadEvent, LoadedMesh, MeshSource};
pub use timing::FrameTimer;
pub use tracker::{LoadStatus, LoadTracker};

pub fn crate_info() -> &'static str {
    "promenade-stream v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("stream"));
    }
}
