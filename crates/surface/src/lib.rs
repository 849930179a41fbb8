//! Surface Registry: static triangle surfaces used only for ray queries.
//!
//! # Invariants
//! - Surfaces are appended during load and never removed or mutated.
//! - Only collision-role surfaces are queryable; render geometry never blocks rays.
//! - An empty or partially filled registry answers "no hit", never an error.
//! - Query results do not depend on the order surfaces were registered in.

mod ray;
mod registry;
pub mod shapes;

pub use ray::{Aabb, Ray, Triangle};
pub use registry::{MeshRole, RayHit, Surface, SurfaceId, SurfaceRegistry};

pub fn crate_info() -> &'static str {
    "promenade-surface v0.1.0"
}
