use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Hits closer than this to the ray origin are ignored.
const EPSILON: f32 = 1e-7;

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero direction yields a ray
    /// that intersects nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Straight down from `origin`.
    pub fn down(origin: Vec3) -> Self {
        Self {
            origin,
            direction: Vec3::NEG_Y,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One triangle of a surface, wound either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Two-sided Möller-Trumbore test. Returns the distance along the ray.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;
        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            // Parallel to the plane, or a degenerate ray/triangle.
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.a;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }

    pub fn transformed(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        Self::new(f(self.a), f(self.b), f(self.c))
    }

    /// Face normal following the `a, b, c` winding (not normalized for
    /// degenerate triangles).
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every triangle vertex. `None` when empty.
    pub fn from_triangles(triangles: &[Triangle]) -> Option<Self> {
        let mut iter = triangles.iter().flat_map(|t| [t.a, t.b, t.c]);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Slab test: does the ray enter the box within `[0, max_t]`?
    pub fn hit_by(&self, ray: &Ray, max_t: f32) -> bool {
        let mut t_min = 0.0f32;
        let mut t_max = max_t;

        for i in 0..3 {
            let o = ray.origin[i];
            let d = ray.direction[i];
            if d.abs() < 1e-10 {
                if o < self.min[i] || o > self.max[i] {
                    return false;
                }
                continue;
            }
            let inv_d = 1.0 / d;
            let mut t1 = (self.min[i] - o) * inv_d;
            let mut t2 = (self.max[i] - o) * inv_d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_triangle(y: f32) -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, y, -1.0),
            Vec3::new(3.0, y, -1.0),
            Vec3::new(-1.0, y, 3.0),
        )
    }

    #[test]
    fn downward_ray_hits_floor() {
        let tri = floor_triangle(0.5);
        let t = tri.intersect(&Ray::down(Vec3::new(0.0, 3.0, 0.0))).unwrap();
        assert!((t - 2.5).abs() < 1e-6);
    }

    #[test]
    fn hits_from_either_side() {
        let tri = floor_triangle(0.0);
        let below = Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::Y);
        assert!(tri.intersect(&below).is_some());
        // Flipped winding behaves the same.
        let flipped = Triangle::new(tri.a, tri.c, tri.b);
        assert!(flipped.intersect(&Ray::down(Vec3::new(0.0, 1.0, 0.0))).is_some());
    }

    #[test]
    fn misses_outside_and_behind() {
        let tri = floor_triangle(0.0);
        assert!(tri.intersect(&Ray::down(Vec3::new(5.0, 1.0, 5.0))).is_none());
        // Surface is above the origin of a downward ray.
        assert!(tri.intersect(&Ray::down(Vec3::new(0.0, -1.0, 0.0))).is_none());
    }

    #[test]
    fn parallel_and_zero_rays_miss() {
        let tri = floor_triangle(0.0);
        let parallel = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(tri.intersect(&parallel).is_none());
        let zero = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO);
        assert!(tri.intersect(&zero).is_none());
    }

    #[test]
    fn aabb_slab_test() {
        let bounds = Aabb::from_triangles(&[floor_triangle(0.0)]).unwrap();
        assert!(bounds.hit_by(&Ray::down(Vec3::new(0.0, 3.0, 0.0)), f32::INFINITY));
        assert!(!bounds.hit_by(&Ray::down(Vec3::new(0.0, 3.0, 0.0)), 1.0));
        assert!(!bounds.hit_by(&Ray::down(Vec3::new(9.0, 3.0, 0.0)), f32::INFINITY));
        assert!(Aabb::from_triangles(&[]).is_none());
    }
}
