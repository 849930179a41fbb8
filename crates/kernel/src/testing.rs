//! Small environments shared by the kernel tests.

use glam::Vec3;
use promenade_surface::{MeshRole, Surface, SurfaceRegistry, Triangle, shapes};

fn collision(name: &str, triangles: Vec<Triangle>) -> Surface {
    Surface::new(name, MeshRole::Collision, triangles)
}

fn base_floor() -> Surface {
    collision(
        "floor",
        shapes::horizontal_rect(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, 5.0)).to_vec(),
    )
}

/// Flat 10x10 floor at y = 0 centred on the origin.
pub fn flat_registry() -> SurfaceRegistry {
    let mut reg = SurfaceRegistry::new();
    reg.register(base_floor());
    reg
}

/// Base floor plus a raised block of height `height` covering x >= 0.
pub fn ledge_registry(height: f32) -> SurfaceRegistry {
    let mut reg = flat_registry();
    reg.register(collision(
        "ledge",
        shapes::cuboid(Vec3::new(0.0, 0.0, -5.0), Vec3::new(5.0, height, 5.0)),
    ));
    reg
}

/// Base floor plus a 3-unit-tall wall across the floor at `x`.
pub fn wall_registry(x: f32) -> SurfaceRegistry {
    let mut reg = flat_registry();
    reg.register(collision(
        "wall",
        shapes::vertical_wall(Vec3::new(x, 0.0, -5.0), Vec3::new(x, 0.0, 5.0), 3.0).to_vec(),
    ));
    reg
}

