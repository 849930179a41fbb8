//! CPU-side vertex data for the GPU buffers.

use bytemuck::{Pod, Zeroable};
use promenade_assets::EnvironmentMesh;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Unit cube centred on the origin, with per-face normals.
pub fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-p, -p, p], [p, -p, p], [p, p, p], [-p, p, p]]),
        ([0.0, 0.0, -1.0], [[p, -p, -p], [-p, -p, -p], [-p, p, -p], [p, p, -p]]),
        ([1.0, 0.0, 0.0], [[p, -p, p], [p, -p, -p], [p, p, -p], [p, p, p]]),
        ([-1.0, 0.0, 0.0], [[-p, -p, -p], [-p, -p, p], [-p, p, p], [-p, p, -p]]),
        ([0.0, 1.0, 0.0], [[-p, p, p], [p, p, p], [p, p, -p], [-p, p, -p]]),
        ([0.0, -1.0, 0.0], [[-p, -p, -p], [p, -p, -p], [p, -p, p], [-p, -p, p]]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u16;
        vertices.extend(corners.map(|position| Vertex { position, normal }));
        indices.extend([0, 1, 2, 2, 3, 0].map(|i| base + i));
    }
    (vertices, indices)
}

/// Flat-shaded, unindexed triangles of an environment mesh.
pub fn environment_vertices(mesh: &EnvironmentMesh) -> Vec<Vertex> {
    mesh.triangles()
        .flat_map(|tri| {
            let normal = tri.normal().to_array();
            [tri.a, tri.b, tri.c].map(|p| Vertex {
                position: p.to_array(),
                normal,
            })
        })
        .collect()
}

/// Every triangle edge as a line segment. Shared edges are drawn twice.
pub fn wireframe_lines(mesh: &EnvironmentMesh, color: [f32; 4]) -> Vec<LineVertex> {
    mesh.triangles()
        .flat_map(|tri| [(tri.a, tri.b), (tri.b, tri.c), (tri.c, tri.a)])
        .flat_map(|(from, to)| {
            [from, to].map(|p| LineVertex {
                position: p.to_array(),
                color,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use promenade_surface::{MeshRole, shapes};

    fn slab() -> EnvironmentMesh {
        EnvironmentMesh::from_triangles(
            "slab",
            MeshRole::Render,
            &shapes::horizontal_rect(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)),
        )
    }

    #[test]
    fn cube_has_six_quads() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|i| (*i as usize) < vertices.len()));
    }

    #[test]
    fn environment_vertices_carry_face_normals() {
        let verts = environment_vertices(&slab());
        assert_eq!(verts.len(), 6);
        for v in verts {
            let n = Vec3::from_array(v.normal);
            assert!((n - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn wireframe_has_three_segments_per_triangle() {
        let lines = wireframe_lines(&slab(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(lines.len(), 2 * 3 * 2);
        assert_eq!(lines[0].color, [1.0, 0.0, 0.0, 1.0]);
    }
}
