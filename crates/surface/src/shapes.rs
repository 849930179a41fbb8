//! Triangle builders for simple boxes and slabs.
//!
//! Used by the procedural demo environment and by tests that need a floor,
//! a ledge or a wall without loading a mesh file.

use glam::Vec3;

use crate::ray::Triangle;

/// Two triangles covering the quad `a b c d` (in order around the edge).
pub fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> [Triangle; 2] {
    [Triangle::new(a, b, c), Triangle::new(a, c, d)]
}

/// A horizontal rectangle spanning the x/z extent of `min`..`max` at
/// height `min.y`. Wound so the normal points up.
pub fn horizontal_rect(min: Vec3, max: Vec3) -> [Triangle; 2] {
    let y = min.y;
    quad(
        Vec3::new(min.x, y, min.z),
        Vec3::new(min.x, y, max.z),
        Vec3::new(max.x, y, max.z),
        Vec3::new(max.x, y, min.z),
    )
}

/// A vertical wall from `from` to `to` (x/z only, using `from.y` as the base)
/// rising `height` units.
pub fn vertical_wall(from: Vec3, to: Vec3, height: f32) -> [Triangle; 2] {
    let base = from.y;
    let top = base + height;
    quad(
        Vec3::new(from.x, base, from.z),
        Vec3::new(to.x, base, to.z),
        Vec3::new(to.x, top, to.z),
        Vec3::new(from.x, top, from.z),
    )
}

/// The 12 triangles of the box spanning `min`..`max`, normals outward.
pub fn cuboid(min: Vec3, max: Vec3) -> Vec<Triangle> {
    let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let faces = [
        // +Y
        quad(p(x0, y1, z0), p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0)),
        // -Y
        quad(p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)),
        // +X
        quad(p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), p(x1, y0, z1)),
        // -X
        quad(p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0)),
        // +Z
        quad(p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)),
        // -Z
        quad(p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0), p(x1, y0, z0)),
    ];
    faces.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_rect_faces_up() {
        for tri in horizontal_rect(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 2.0)) {
            assert!((tri.normal() - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn cuboid_normals_point_outward() {
        let min = Vec3::new(-1.0, 0.0, -1.0);
        let max = Vec3::new(1.0, 2.0, 1.0);
        let centre = (min + max) * 0.5;
        let tris = cuboid(min, max);
        assert_eq!(tris.len(), 12);
        for tri in &tris {
            let face_centre = (tri.a + tri.b + tri.c) / 3.0;
            assert!(tri.normal().dot(face_centre - centre) > 0.0);
        }
    }

    #[test]
    fn wall_spans_height() {
        let [t0, t1] = vertical_wall(Vec3::new(0.0, 0.5, 0.0), Vec3::new(4.0, 0.5, 0.0), 2.0);
        let top = t0.a.y.max(t0.b.y).max(t0.c.y).max(t1.c.y);
        assert_eq!(top, 2.5);
    }
}
