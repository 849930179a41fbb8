use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use promenade_common::ControllerConfig;
use promenade_input::InputFrame;
use promenade_kernel::{GameState, QueryEngine};
use promenade_surface::{MeshRole, Surface, SurfaceRegistry, shapes};

/// A floor of `side * side` unit tiles with a step every fourth row.
fn tiled_registry(side: usize) -> SurfaceRegistry {
    let mut reg = SurfaceRegistry::new();
    for row in 0..side {
        let height = (row / 4) as f32 * 0.2;
        let mut triangles = Vec::with_capacity(side * 2);
        for col in 0..side {
            let min = Vec3::new(col as f32, height, row as f32);
            let max = Vec3::new(col as f32 + 1.0, height, row as f32 + 1.0);
            triangles.extend(shapes::horizontal_rect(min, max));
        }
        reg.register(Surface::new(format!("row{row}"), MeshRole::Collision, triangles));
    }
    reg
}

fn bench_floor_height(side: usize, iterations: usize) {
    let reg = tiled_registry(side);
    let config = ControllerConfig::default();
    let mut query = QueryEngine::new(&reg, &config);
    let extent = side as f32;

    let start = Instant::now();
    for i in 0..iterations {
        let x = (i as f32 * 0.37) % extent;
        let z = (i as f32 * 0.61) % extent;
        let _ = black_box(query.floor_height_at(black_box(Vec3::new(x, 1.0, z))));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  floor_height_at ({} triangles, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        reg.triangle_count()
    );
}

fn bench_frame_step(side: usize, iterations: usize) {
    let mut config = ControllerConfig::default();
    config.spawn.point = Vec3::new(side as f32 * 0.5, 10.0, 1.0);
    let mut state = GameState::new(config);
    state.register_surfaces(tiled_registry(side).all().to_vec());
    state.spawn();

    let input = InputFrame {
        forward: true,
        jump: true,
        ..Default::default()
    };
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(state.step(black_box(&input), 1.0 / 60.0));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  frame step ({} surfaces, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        state.surfaces().len()
    );
}

fn main() {
    println!("=== Floor Query Benchmarks ===\n");

    println!("Floor height:");
    bench_floor_height(16, 10000);
    bench_floor_height(64, 1000);
    bench_floor_height(256, 100);

    println!("\nFull frame step (walking, jump held):");
    bench_frame_step(16, 10000);
    bench_frame_step(64, 1000);

    println!("\n=== Done ===");
}
