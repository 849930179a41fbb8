//! Environment assets: the two meshes a scene is built from.
//!
//! A scene has a low-fidelity collision mesh, queried by the controller,
//! and a high-fidelity render mesh, only drawn. Both load through
//! [`load_mesh`] and are identified by a content hash, never by path.

mod demo;
mod import;
mod mesh;

pub use demo::{DemoAuditorium, demo_auditorium};
pub use import::{load_mesh, save_json_mesh};
pub use mesh::{AssetId, EnvironmentMesh};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF import error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no triangles found in {0}")]
    EmptyMesh(PathBuf),
    #[error("unsupported mesh format: {0} (expected .glb, .gltf or .json)")]
    UnsupportedExtension(PathBuf),
}

pub fn crate_info() -> &'static str {
    "promenade-assets v0.1.0"
}
