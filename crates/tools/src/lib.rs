//! Developer tooling: HUD text and a read-only controller inspector.
//!
//! # Invariants
//! - Tools only read controller state; nothing here mutates a `GameState`.

mod hud;
mod inspector;

pub use hud::{HELP_LINES, Hud};
pub use inspector::{ControllerInspector, ControllerSummary, SurfaceInfo};

pub fn crate_info() -> &'static str {
    "promenade-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
