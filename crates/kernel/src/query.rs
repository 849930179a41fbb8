use glam::Vec3;
use promenade_common::ControllerConfig;
use promenade_surface::{Ray, RayHit, SurfaceRegistry};
use serde::{Deserialize, Serialize};

/// Rays cast during one frame, by purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStats {
    pub floor_rays: u32,
    pub wall_rays: u32,
    pub camera_rays: u32,
}

impl QueryStats {
    pub fn total(&self) -> u32 {
        self.floor_rays + self.wall_rays + self.camera_rays
    }
}

/// Ground and wall questions answered by casting rays into the registry.
///
/// Borrowed for one frame; counts every ray it casts.
pub struct QueryEngine<'a> {
    surfaces: &'a SurfaceRegistry,
    floor_probe_offset: f32,
    wall_probe_height: f32,
    wall_range_factor: f32,
    radius: f32,
    stats: QueryStats,
}

impl<'a> QueryEngine<'a> {
    pub fn new(surfaces: &'a SurfaceRegistry, config: &ControllerConfig) -> Self {
        let m = &config.movement;
        Self {
            surfaces,
            floor_probe_offset: m.floor_probe_offset,
            wall_probe_height: m.step_allowance + m.wall_probe_clearance,
            wall_range_factor: m.wall_probe_range_factor,
            radius: config.avatar.radius,
            stats: QueryStats::default(),
        }
    }

    pub fn surfaces(&self) -> &'a SurfaceRegistry {
        self.surfaces
    }

    pub fn stats(&self) -> QueryStats {
        self.stats
    }

    /// Height of the nearest surface under `position`, probing from
    /// `floor_probe_offset` above it so a slightly sunken avatar still finds
    /// the ledge it stands on.
    pub fn floor_height_at(&mut self, position: Vec3) -> Option<f32> {
        self.stats.floor_rays += 1;
        let origin = position + Vec3::Y * self.floor_probe_offset;
        self.surfaces
            .cast(&Ray::down(origin), f32::INFINITY)
            .map(|hit| hit.point.y)
    }

    /// Is something in the way of moving by `move_vector` from `from`?
    ///
    /// The probe runs horizontally just above step height, so stairs pass and
    /// only obstacles taller than a step block. A move with no horizontal
    /// component never hits a wall and casts nothing.
    pub fn wall_ahead(&mut self, from: Vec3, move_vector: Vec3) -> bool {
        let direction = Vec3::new(move_vector.x, 0.0, move_vector.z).normalize_or_zero();
        if direction == Vec3::ZERO {
            return false;
        }
        self.stats.wall_rays += 1;
        let origin = from + Vec3::Y * self.wall_probe_height;
        let range = self.radius + move_vector.length() * self.wall_range_factor;
        self.surfaces.any_hit(&Ray::new(origin, direction), range)
    }

    /// Nearest obstruction between `from` and `from + direction * max_distance`.
    pub fn occlusion(&mut self, from: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.stats.camera_rays += 1;
        self.surfaces.cast(&Ray::new(from, direction), max_distance)
    }

    /// Downward probe straight from `origin`, with no offset. Used to place
    /// the avatar at spawn.
    pub fn drop_point(&mut self, origin: Vec3) -> Option<Vec3> {
        self.stats.floor_rays += 1;
        self.surfaces
            .cast(&Ray::down(origin), f32::INFINITY)
            .map(|hit| hit.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ledge_registry, wall_registry};

    #[test]
    fn floor_on_empty_registry_is_none() {
        let reg = SurfaceRegistry::new();
        let config = ControllerConfig::default();
        let mut q = QueryEngine::new(&reg, &config);
        assert_eq!(q.floor_height_at(Vec3::new(0.0, 0.5, 0.0)), None);
    }

    #[test]
    fn floor_sees_ledge_slightly_above_feet() {
        let reg = ledge_registry(0.3);
        let config = ControllerConfig::default();
        let mut q = QueryEngine::new(&reg, &config);
        // Standing at height 0.5 over the base floor.
        let base = q.floor_height_at(Vec3::new(-1.0, 0.5, 0.2)).unwrap();
        assert!(base.abs() < 1e-5);
        // Over the ledge the nearest hit below the probe origin is the ledge.
        let ledge = q.floor_height_at(Vec3::new(1.0, 0.5, 0.2)).unwrap();
        assert!((ledge - 0.3).abs() < 1e-5);
        // Off the edge of the world.
        assert_eq!(q.floor_height_at(Vec3::new(50.0, 0.5, 0.2)), None);
        assert_eq!(q.stats().floor_rays, 3);
    }

    #[test]
    fn zero_move_short_circuits_wall_query() {
        let reg = wall_registry(2.0);
        let config = ControllerConfig::default();
        let mut q = QueryEngine::new(&reg, &config);
        assert!(!q.wall_ahead(Vec3::new(1.9, 0.5, 0.0), Vec3::ZERO));
        assert!(!q.wall_ahead(Vec3::new(1.9, 0.5, 0.0), Vec3::new(0.0, 0.4, 0.0)));
        assert_eq!(q.stats().wall_rays, 0);
    }

    #[test]
    fn wall_detected_within_range_only() {
        let reg = wall_registry(2.0);
        let config = ControllerConfig::default();
        let mut q = QueryEngine::new(&reg, &config);
        let step = Vec3::new(0.1, 0.0, 0.0);
        // range = 0.25 + 0.1 * 1.2 = 0.37
        assert!(q.wall_ahead(Vec3::new(1.7, 0.5, 0.0), step));
        assert!(!q.wall_ahead(Vec3::new(1.5, 0.5, 0.0), step));
        // Walking away from the wall.
        assert!(!q.wall_ahead(Vec3::new(1.7, 0.5, 0.0), -step));
        assert_eq!(q.stats().wall_rays, 3);
    }

    #[test]
    fn low_step_passes_under_wall_probe() {
        // The probe starts 0.45 above the given position, clear of a 0.3
        // ledge, so the ledge never counts as a wall.
        let reg = ledge_registry(0.3);
        let config = ControllerConfig::default();
        let mut q = QueryEngine::new(&reg, &config);
        assert!(!q.wall_ahead(Vec3::new(-0.1, 0.0, 0.2), Vec3::new(0.1, 0.0, 0.0)));
    }
}
