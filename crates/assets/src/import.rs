//! Mesh file import: glTF/GLB through the `gltf` crate, plus a plain JSON
//! triangle soup for hand-authored collision meshes.

use glam::{Mat4, Vec3};
use gltf::mesh::util::ReadIndices;
use promenade_surface::MeshRole;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::AssetError;
use crate::mesh::EnvironmentMesh;

/// On-disk JSON triangle soup.
#[derive(Debug, Serialize, Deserialize)]
struct TriangleSoup {
    #[serde(default)]
    name: String,
    triangles: Vec<[[f32; 3]; 3]>,
}

/// Load an environment mesh, choosing the importer by file extension.
pub fn load_mesh(path: impl AsRef<Path>, role: MeshRole) -> Result<EnvironmentMesh, AssetError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mesh = match extension.as_deref() {
        Some("glb" | "gltf") => import_gltf(path, role)?,
        Some("json") => import_json(path, role)?,
        _ => return Err(AssetError::UnsupportedExtension(path.to_path_buf())),
    };
    if mesh.is_empty() {
        return Err(AssetError::EmptyMesh(path.to_path_buf()));
    }
    tracing::info!(
        path = %path.display(),
        %role,
        id = %mesh.id,
        triangles = mesh.triangle_count(),
        "mesh loaded"
    );
    Ok(mesh)
}

/// Write `mesh` as a JSON triangle soup readable by [`load_mesh`].
pub fn save_json_mesh(mesh: &EnvironmentMesh, path: impl AsRef<Path>) -> Result<(), AssetError> {
    let soup = TriangleSoup {
        name: mesh.name.clone(),
        triangles: mesh
            .triangles()
            .map(|t| [t.a.to_array(), t.b.to_array(), t.c.to_array()])
            .collect(),
    };
    let file = std::fs::File::create(path)?;
    serde_json::to_writer(file, &soup)?;
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn import_json(path: &Path, role: MeshRole) -> Result<EnvironmentMesh, AssetError> {
    let file = std::fs::File::open(path)?;
    let soup: TriangleSoup = serde_json::from_reader(std::io::BufReader::new(file))?;
    let name = if soup.name.is_empty() {
        file_stem(path)
    } else {
        soup.name
    };
    let positions: Vec<Vec3> = soup
        .triangles
        .iter()
        .flat_map(|tri| tri.iter().map(|p| Vec3::from_array(*p)))
        .collect();
    let indices = (0..positions.len() as u32).collect();
    Ok(EnvironmentMesh::new(name, role, positions, indices))
}

/// Every triangle primitive of every node in the default scene, baked into
/// world space. Files without scenes fall back to their bare meshes.
fn import_gltf(path: &Path, role: MeshRole) -> Result<EnvironmentMesh, AssetError> {
    let (doc, buffers, _images) = gltf::import(path)?;
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    match doc.default_scene().or_else(|| doc.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&node, Mat4::IDENTITY, &buffers, &mut positions, &mut indices);
            }
        }
        None => {
            for mesh in doc.meshes() {
                collect_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut positions, &mut indices);
            }
        }
    }

    Ok(EnvironmentMesh::new(file_stem(path), role, positions, indices))
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    positions: &mut Vec<Vec3>,
    indices: &mut Vec<u32>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        collect_mesh(&mesh, world, buffers, positions, indices);
    }
    for child in node.children() {
        collect_node(&child, world, buffers, positions, indices);
    }
}

fn collect_mesh(
    mesh: &gltf::Mesh<'_>,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    positions: &mut Vec<Vec3>,
    indices: &mut Vec<u32>,
) {
    for prim in mesh.primitives() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            tracing::debug!(mode = ?prim.mode(), "skipping non-triangle primitive");
            continue;
        }
        let reader = prim.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));
        let Some(read_positions) = reader.read_positions() else {
            continue;
        };
        let base = positions.len() as u32;
        positions.extend(read_positions.map(|p| world.transform_point3(Vec3::from_array(p))));
        let count = positions.len() as u32 - base;
        match reader.read_indices() {
            Some(ReadIndices::U8(it)) => indices.extend(it.map(|i| base + i as u32)),
            Some(ReadIndices::U16(it)) => indices.extend(it.map(|i| base + i as u32)),
            Some(ReadIndices::U32(it)) => indices.extend(it.map(|i| base + i)),
            None => indices.extend(base..base + count),
        }
    }
}
