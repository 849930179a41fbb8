//! wgpu render backend for the controller.
//!
//! Draws the render-role environment mesh, the avatar as a lit box and,
//! on request, the collision mesh as a wireframe overlay.
//!
//! # Invariants
//! - Renderer never mutates controller state; it reads a `FrameOutput`.
//! - The collision mesh is only ever drawn as lines, never shaded.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::WgpuRenderer;
pub use mesh::{LineVertex, Vertex, cube_mesh, environment_vertices, wireframe_lines};
