//! Procedural auditorium used when no mesh files are given.
//!
//! Layout, looking from the stage (-Z) toward the back (+Z):
//! - stage platform across the front, 0.7 high
//! - flat orchestra floor
//! - seven raked tiers, 0.3 rise each, every one holding two seat blocks
//!   split by a centre aisle, with side aisles along the walls
//! - four walls and a ceiling
//!
//! The default spawn point lands on the fourth tier, behind a seat row.

use glam::Vec3;
use promenade_surface::{MeshRole, Triangle, shapes};

use crate::mesh::EnvironmentMesh;

const HALF_WIDTH: f32 = 16.0;
const FRONT: f32 = -12.0;
const STAGE_EDGE: f32 = -6.0;
const STAGE_HEIGHT: f32 = 0.7;
const TIER_START: f32 = 0.0;
const TIER_DEPTH: f32 = 2.0;
const TIER_RISE: f32 = 0.3;
const TIER_COUNT: usize = 7;
const CEILING: f32 = 8.0;
const SEAT_HEIGHT: f32 = 0.45;
const SEAT_BACK_HEIGHT: f32 = 0.9;
const AISLE_HALF_WIDTH: f32 = 1.5;
const SIDE_AISLE: f32 = 4.0;

/// Matching collision and render meshes of the demo hall.
#[derive(Debug, Clone)]
pub struct DemoAuditorium {
    pub collision: EnvironmentMesh,
    pub render: EnvironmentMesh,
}

fn back() -> f32 {
    TIER_START + TIER_DEPTH * TIER_COUNT as f32
}

fn shell() -> Vec<Triangle> {
    let back = back();
    let w = HALF_WIDTH;
    let mut tris = Vec::new();
    // Orchestra floor under everything, stage and tiers sit on top of it.
    tris.extend(shapes::horizontal_rect(
        Vec3::new(-w, 0.0, FRONT),
        Vec3::new(w, 0.0, back),
    ));
    tris.extend(shapes::cuboid(
        Vec3::new(-w, 0.0, FRONT),
        Vec3::new(w, STAGE_HEIGHT, STAGE_EDGE),
    ));
    for i in 0..TIER_COUNT {
        let z0 = TIER_START + TIER_DEPTH * i as f32;
        let height = TIER_RISE * (i + 1) as f32;
        tris.extend(shapes::cuboid(
            Vec3::new(-w, 0.0, z0),
            Vec3::new(w, height, back),
        ));
    }
    tris.extend(shapes::vertical_wall(
        Vec3::new(-w, 0.0, FRONT),
        Vec3::new(w, 0.0, FRONT),
        CEILING,
    ));
    tris.extend(shapes::vertical_wall(
        Vec3::new(-w, 0.0, back),
        Vec3::new(w, 0.0, back),
        CEILING,
    ));
    tris.extend(shapes::vertical_wall(
        Vec3::new(-w, 0.0, FRONT),
        Vec3::new(-w, 0.0, back),
        CEILING,
    ));
    tris.extend(shapes::vertical_wall(
        Vec3::new(w, 0.0, FRONT),
        Vec3::new(w, 0.0, back),
        CEILING,
    ));
    tris.extend(shapes::horizontal_rect(
        Vec3::new(-w, CEILING, FRONT),
        Vec3::new(w, CEILING, back),
    ));
    tris
}

/// Seat blocks at the back of each tier, `(min, max)` of the seat cushion.
fn seat_blocks() -> Vec<(Vec3, Vec3)> {
    let inner = AISLE_HALF_WIDTH;
    let outer = HALF_WIDTH - SIDE_AISLE;
    (0..TIER_COUNT)
        .flat_map(|i| {
            let floor = TIER_RISE * (i + 1) as f32;
            let z1 = TIER_START + TIER_DEPTH * (i + 1) as f32 - 0.2;
            let z0 = z1 - 0.5;
            [(-outer, -inner), (inner, outer)].map(|(x0, x1)| {
                (
                    Vec3::new(x0, floor, z0),
                    Vec3::new(x1, floor + SEAT_HEIGHT, z1),
                )
            })
        })
        .collect()
}

/// Build the demo hall. Seats collide as low boxes; the render mesh adds
/// seat backs and a proscenium frame that the controller never queries.
pub fn demo_auditorium() -> DemoAuditorium {
    let mut collision = shell();
    let mut render = shell();
    for (min, max) in seat_blocks() {
        collision.extend(shapes::cuboid(min, max));
        render.extend(shapes::cuboid(min, max));
        render.extend(shapes::cuboid(
            Vec3::new(min.x, max.y, max.z - 0.1),
            Vec3::new(max.x, min.y + SEAT_BACK_HEIGHT, max.z),
        ));
    }
    let w = HALF_WIDTH;
    let frame_z = STAGE_EDGE - 0.1;
    render.extend(shapes::cuboid(
        Vec3::new(-w, STAGE_HEIGHT, frame_z),
        Vec3::new(-w + 1.0, CEILING, STAGE_EDGE),
    ));
    render.extend(shapes::cuboid(
        Vec3::new(w - 1.0, STAGE_HEIGHT, frame_z),
        Vec3::new(w, CEILING, STAGE_EDGE),
    ));
    render.extend(shapes::cuboid(
        Vec3::new(-w, CEILING - 1.5, frame_z),
        Vec3::new(w, CEILING, STAGE_EDGE),
    ));

    DemoAuditorium {
        collision: EnvironmentMesh::from_triangles(
            "demo_auditorium_collision",
            MeshRole::Collision,
            &collision,
        ),
        render: EnvironmentMesh::from_triangles("demo_auditorium", MeshRole::Render, &render),
    }
}
