use glam::{Mat4, Vec3};
use promenade_common::{CameraConfig, Transform, ViewMode};
use promenade_kernel::{CameraPose, GameState, MoveOutcome};
use serde::{Deserialize, Serialize};

/// What a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub frame: u64,
    /// Avatar world transform, scaled for a unit cube.
    pub avatar: Transform,
    pub avatar_visible: bool,
    pub camera: CameraPose,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub view_mode: ViewMode,
    /// Movement result of the frame that produced this output, if any.
    pub outcome: Option<MoveOutcome>,
}

impl FrameOutput {
    pub fn from_state(state: &GameState) -> Self {
        let CameraConfig { fov_degrees, near, far, .. } = state.config().camera;
        Self {
            frame: state.frame(),
            avatar: state.avatar().transform(),
            avatar_visible: state.avatar().is_visible(),
            camera: *state.camera(),
            fov_degrees,
            near,
            far,
            view_mode: state.view().mode(),
            outcome: state.last_report().map(|r| r.outcome),
        }
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far);
        proj * self.camera.view_matrix()
    }

    /// Model matrix for the avatar's unit cube.
    pub fn avatar_model(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.avatar.scale,
            self.avatar.rotation,
            self.avatar.position,
        )
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads one frame of controller output and produces its own
/// output. It has no way to feed anything back.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, frame: &FrameOutput) -> Self::Output;
}

/// One line of text per frame. Used by the CLI walk log and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameOutput) -> String {
        let (yaw, _, _) = frame.avatar.rotation.to_euler(glam::EulerRot::YXZ);
        let outcome = frame.outcome.map(|o| o.label()).unwrap_or("-");
        tracing::trace!(frame = frame.frame, outcome, "debug text frame");
        format!(
            "[{:>5}] {:<12} avatar={} yaw={:.2}{} camera={} fwd={} move={}",
            frame.frame,
            frame.view_mode.label(),
            fmt_vec(frame.avatar.position),
            yaw,
            if frame.avatar_visible { "" } else { " (hidden)" },
            fmt_vec(frame.camera.position),
            fmt_vec(frame.camera.forward()),
            outcome
        )
    }
}
