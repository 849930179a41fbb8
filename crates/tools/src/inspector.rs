use std::fmt;

use glam::Vec3;
use promenade_common::ViewMode;
use promenade_kernel::{GameState, MoveOutcome, QueryStats};
use promenade_surface::{MeshRole, SurfaceRegistry};

/// Read-only views of controller state for debugging.
pub struct ControllerInspector;

impl ControllerInspector {
    /// Snapshot of the avatar, view and last frame.
    pub fn summary(state: &GameState) -> ControllerSummary {
        let avatar = state.avatar();
        let view = state.view();
        let report = state.last_report();
        ControllerSummary {
            frame: state.frame(),
            spawned: avatar.is_spawned(),
            visible: avatar.is_visible(),
            position: avatar.position,
            yaw: avatar.yaw,
            view_mode: view.mode(),
            look_yaw: view.yaw(),
            look_pitch: view.pitch(),
            camera_distance: view.camera_distance(),
            camera_position: state.camera().position,
            jump_remaining: state.jump().remaining(),
            surfaces: state.surfaces().len(),
            triangles: state.surfaces().triangle_count(),
            last_outcome: report.map(|r| r.outcome),
            last_stats: report.map(|r| r.stats).unwrap_or_default(),
        }
    }

    /// One entry per registered surface, in registration order.
    pub fn surfaces(registry: &SurfaceRegistry) -> Vec<SurfaceInfo> {
        registry
            .all()
            .iter()
            .map(|s| {
                let bounds = s.bounds();
                SurfaceInfo {
                    name: s.name().to_string(),
                    role: s.role(),
                    triangles: s.triangles().len(),
                    min: bounds.map(|b| b.min),
                    max: bounds.map(|b| b.max),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSummary {
    pub frame: u64,
    pub spawned: bool,
    pub visible: bool,
    pub position: Vec3,
    pub yaw: f32,
    pub view_mode: ViewMode,
    pub look_yaw: f32,
    pub look_pitch: f32,
    pub camera_distance: f32,
    pub camera_position: Vec3,
    pub jump_remaining: f32,
    pub surfaces: usize,
    pub triangles: usize,
    pub last_outcome: Option<MoveOutcome>,
    pub last_stats: QueryStats,
}

impl fmt::Display for ControllerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position;
        write!(
            f,
            "Controller: frame={} spawned={} visible={} pos=({:.2}, {:.2}, {:.2}) yaw={:.2} view={} pitch={:.2} distance={:.2} jump={:.2} surfaces={} triangles={} last={} rays={}",
            self.frame,
            self.spawned,
            self.visible,
            p.x,
            p.y,
            p.z,
            self.yaw,
            self.view_mode.label(),
            self.look_pitch,
            self.camera_distance,
            self.jump_remaining,
            self.surfaces,
            self.triangles,
            self.last_outcome.map_or("-", |o| o.label()),
            self.last_stats.total(),
        )
    }
}

/// A registered surface as listed by the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceInfo {
    pub name: String,
    pub role: MeshRole,
    pub triangles: usize,
    pub min: Option<Vec3>,
    pub max: Option<Vec3>,
}

impl fmt::Display for SurfaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] triangles={}", self.name, self.role, self.triangles)?;
        if let (Some(min), Some(max)) = (self.min, self.max) {
            write!(
                f,
                " bounds=({:.2}, {:.2}, {:.2})..({:.2}, {:.2}, {:.2})",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }
        Ok(())
    }
}
