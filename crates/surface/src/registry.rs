use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ray::{Aabb, Ray, Triangle};

/// Which environment mesh a surface came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshRole {
    /// Low-fidelity mesh used for floor, wall and camera queries.
    Collision,
    /// High-fidelity mesh that is only drawn.
    Render,
}

impl std::fmt::Display for MeshRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collision => f.write_str("collision"),
            Self::Render => f.write_str("render"),
        }
    }
}

/// Index of a surface in its registry, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub usize);

/// An immutable triangle soup.
#[derive(Debug, Clone)]
pub struct Surface {
    name: String,
    role: MeshRole,
    triangles: Vec<Triangle>,
    bounds: Option<Aabb>,
}

impl Surface {
    pub fn new(name: impl Into<String>, role: MeshRole, triangles: Vec<Triangle>) -> Self {
        let bounds = Aabb::from_triangles(&triangles);
        Self {
            name: name.into(),
            role,
            triangles,
            bounds,
        }
    }

    /// Build from an indexed triangle list. Triangles referencing
    /// out-of-range vertices and a trailing partial triangle are skipped.
    pub fn from_indexed(
        name: impl Into<String>,
        role: MeshRole,
        positions: &[Vec3],
        indices: &[u32],
    ) -> Self {
        let triangles = indices
            .chunks_exact(3)
            .filter_map(|idx| {
                let a = *positions.get(idx[0] as usize)?;
                let b = *positions.get(idx[1] as usize)?;
                let c = *positions.get(idx[2] as usize)?;
                Some(Triangle::new(a, b, c))
            })
            .collect();
        Self::new(name, role, triangles)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> MeshRole {
        self.role
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Distances of every hit within `max_distance`, unsorted.
    fn hit_distances<'a>(
        &'a self,
        ray: &'a Ray,
        max_distance: f32,
    ) -> impl Iterator<Item = f32> + 'a {
        let candidates: &[Triangle] = if self.bounds.is_some_and(|b| b.hit_by(ray, max_distance)) {
            &self.triangles
        } else {
            &[]
        };
        candidates
            .iter()
            .filter_map(move |tri| tri.intersect(ray))
            .filter(move |t| *t <= max_distance)
    }
}

/// One ray/surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub surface: SurfaceId,
}

/// Append-only set of queryable surfaces.
#[derive(Debug, Clone, Default)]
pub struct SurfaceRegistry {
    surfaces: Vec<Surface>,
    triangle_count: usize,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a collision surface. Render-role surfaces are not queryable and
    /// are turned away.
    pub fn register(&mut self, surface: Surface) -> Option<SurfaceId> {
        if surface.role != MeshRole::Collision {
            tracing::debug!(name = surface.name(), "skipping non-collision surface");
            return None;
        }
        let id = SurfaceId(self.surfaces.len());
        self.triangle_count += surface.triangles.len();
        tracing::trace!(
            name = surface.name(),
            triangles = surface.triangles.len(),
            "registered surface"
        );
        self.surfaces.push(surface);
        Some(id)
    }

    /// Register every surface in `surfaces`, returning how many were accepted.
    pub fn extend(&mut self, surfaces: impl IntoIterator<Item = Surface>) -> usize {
        surfaces
            .into_iter()
            .filter_map(|s| self.register(s))
            .count()
    }

    /// The current snapshot of registered surfaces.
    pub fn all(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Union of all surface bounds.
    pub fn bounds(&self) -> Option<Aabb> {
        self.surfaces
            .iter()
            .filter_map(Surface::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Every hit within `max_distance`, nearest first. Equal distances are
    /// ordered by surface id so the result is stable.
    pub fn intersect(&self, ray: &Ray, max_distance: f32) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .surfaces
            .iter()
            .enumerate()
            .flat_map(|(i, surface)| {
                surface
                    .hit_distances(ray, max_distance)
                    .map(move |distance| RayHit {
                        distance,
                        point: ray.at(distance),
                        surface: SurfaceId(i),
                    })
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.surface.cmp(&b.surface))
        });
        hits
    }

    /// Nearest hit within `max_distance`.
    pub fn cast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        self.surfaces
            .iter()
            .enumerate()
            .filter_map(|(i, surface)| {
                surface
                    .hit_distances(ray, max_distance)
                    .min_by(f32::total_cmp)
                    .map(|distance| RayHit {
                        distance,
                        point: ray.at(distance),
                        surface: SurfaceId(i),
                    })
            })
            .min_by(|a, b| {
                a.distance
                    .total_cmp(&b.distance)
                    .then(a.surface.cmp(&b.surface))
            })
    }

    /// Whether anything lies within `max_distance` along the ray.
    pub fn any_hit(&self, ray: &Ray, max_distance: f32) -> bool {
        self.surfaces
            .iter()
            .any(|surface| surface.hit_distances(ray, max_distance).next().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    fn floor(name: &str, y: f32) -> Surface {
        Surface::new(
            name,
            MeshRole::Collision,
            shapes::horizontal_rect(Vec3::new(-5.0, y, -5.0), Vec3::new(5.0, y, 5.0)).to_vec(),
        )
    }

    #[test]
    fn empty_registry_reports_no_hits() {
        let reg = SurfaceRegistry::new();
        let ray = Ray::down(Vec3::new(0.0, 3.0, 0.0));
        assert!(reg.cast(&ray, f32::INFINITY).is_none());
        assert!(reg.intersect(&ray, f32::INFINITY).is_empty());
        assert!(!reg.any_hit(&ray, f32::INFINITY));
        assert!(reg.bounds().is_none());
    }

    #[test]
    fn render_surfaces_are_not_registered() {
        let mut reg = SurfaceRegistry::new();
        let render = Surface::new("seats", MeshRole::Render, floor("x", 0.0).triangles().to_vec());
        assert!(reg.register(render).is_none());
        assert!(reg.is_empty());
        assert_eq!(reg.register(floor("floor", 0.0)), Some(SurfaceId(0)));
        assert_eq!(reg.triangle_count(), 2);
    }

    #[test]
    fn hits_sorted_nearest_first() {
        let mut reg = SurfaceRegistry::new();
        reg.register(floor("low", 0.0));
        reg.register(floor("high", 1.0));
        let hits = reg.intersect(&Ray::down(Vec3::new(0.3, 3.0, 0.2)), f32::INFINITY);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].point.y - 1.0).abs() < 1e-6);
        assert!((hits[1].point.y - 0.0).abs() < 1e-6);
        assert_eq!(hits[0].surface, SurfaceId(1));
    }

    #[test]
    fn cast_independent_of_registration_order() {
        let mut a = SurfaceRegistry::new();
        a.register(floor("low", 0.0));
        a.register(floor("high", 1.5));
        let mut b = SurfaceRegistry::new();
        b.register(floor("high", 1.5));
        b.register(floor("low", 0.0));

        let ray = Ray::down(Vec3::new(0.3, 3.0, 0.2));
        let ha = a.cast(&ray, f32::INFINITY).unwrap();
        let hb = b.cast(&ray, f32::INFINITY).unwrap();
        assert_eq!(ha.point.y, hb.point.y);
        assert!((ha.point.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn max_distance_limits_hits() {
        let mut reg = SurfaceRegistry::new();
        reg.register(floor("floor", 0.0));
        let ray = Ray::down(Vec3::new(0.3, 3.0, 0.2));
        assert!(reg.cast(&ray, 2.9).is_none());
        assert!(!reg.any_hit(&ray, 2.9));
        assert!(reg.any_hit(&ray, 3.1));
    }

    #[test]
    fn from_indexed_skips_bad_indices() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let s = Surface::from_indexed("s", MeshRole::Collision, &positions, &[0, 1, 2, 0, 1, 9, 2]);
        assert_eq!(s.triangles().len(), 1);
    }
}
