use glam::Vec3;
use promenade_surface::{Aabb, MeshRole, Surface, Triangle};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content-addressed asset ID computed from the mesh data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// An indexed triangle mesh in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMesh {
    pub name: String,
    pub role: MeshRole,
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub id: AssetId,
}

impl EnvironmentMesh {
    pub fn new(
        name: impl Into<String>,
        role: MeshRole,
        positions: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Self {
        let id = content_hash(role, &positions, &indices);
        Self {
            name: name.into(),
            role,
            positions,
            indices,
            id,
        }
    }

    /// Unindexed mesh, three vertices per triangle.
    pub fn from_triangles(name: impl Into<String>, role: MeshRole, triangles: &[Triangle]) -> Self {
        let positions: Vec<Vec3> = triangles.iter().flat_map(|t| [t.a, t.b, t.c]).collect();
        let indices = (0..positions.len() as u32).collect();
        Self::new(name, role, positions, indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Triangles with in-range indices, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).filter_map(|idx| {
            let a = *self.positions.get(idx[0] as usize)?;
            let b = *self.positions.get(idx[1] as usize)?;
            let c = *self.positions.get(idx[2] as usize)?;
            Some(Triangle::new(a, b, c))
        })
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Aabb::new(min, max))
    }

    /// The mesh as one queryable surface carrying the same role.
    pub fn to_surface(&self) -> Surface {
        Surface::from_indexed(self.name.clone(), self.role, &self.positions, &self.indices)
    }
}

fn content_hash(role: MeshRole, positions: &[Vec3], indices: &[u32]) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(role.to_string().as_bytes());
    for p in positions {
        for c in p.to_array() {
            hasher.update(c.to_le_bytes());
        }
    }
    for i in indices {
        hasher.update(i.to_le_bytes());
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}
