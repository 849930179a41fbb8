use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use promenade_common::{CameraConfig, ViewMode};
use serde::{Deserialize, Serialize};

use crate::avatar::Avatar;
use crate::query::QueryEngine;
use crate::view::ViewState;

/// Camera world transform. Looks down its local -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    /// Pose from look angles, yaw about world up then pitch about local right.
    pub fn from_angles(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0),
        }
    }

    /// Pose at `eye` facing `target` with world up. `None` when the two
    /// coincide or the view is vertical.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Option<Self> {
        let forward = (target - eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        if right == Vec3::ZERO {
            return None;
        }
        let up = right.cross(forward);
        Some(Self {
            position: eye,
            rotation: Quat::from_mat3(&Mat3::from_cols(right, up, -forward)),
        })
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }
}

/// First person: at eye height inside the avatar, no occlusion test.
pub fn first_person(avatar: &Avatar, view: &ViewState, config: &CameraConfig) -> CameraPose {
    let eye = avatar.position + Vec3::Y * config.eye_height;
    CameraPose::from_angles(eye, view.yaw(), view.pitch())
}

/// Third person: orbit the raised avatar point at the view's distance,
/// pulled in front of anything between the camera and the avatar.
pub fn third_person(
    avatar: &Avatar,
    view: &ViewState,
    query: &mut QueryEngine<'_>,
    config: &CameraConfig,
) -> CameraPose {
    let target = avatar.position + Vec3::Y * config.look_at_height;
    let distance = view.camera_distance();
    let offset = Quat::from_rotation_y(view.yaw())
        * Quat::from_rotation_x(view.pitch())
        * Vec3::new(0.0, 0.0, distance);
    let direction = offset.normalize_or_zero();

    let position = match query.occlusion(target, direction, distance) {
        Some(hit) => hit.point - direction * config.occlusion_pull_in,
        None => target + offset,
    };

    CameraPose::looking_at(position, target).unwrap_or(CameraPose::from_angles(
        position,
        view.yaw(),
        view.pitch(),
    ))
}

/// Camera for the active view mode.
pub fn resolve(
    avatar: &Avatar,
    view: &ViewState,
    query: &mut QueryEngine<'_>,
    config: &CameraConfig,
) -> CameraPose {
    match view.mode() {
        ViewMode::FirstPerson => first_person(avatar, view, config),
        ViewMode::ThirdPerson => third_person(avatar, view, query, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{flat_registry, wall_registry};
    use promenade_common::ControllerConfig;
    use std::f32::consts::FRAC_PI_2;

    fn standing_avatar(config: &ControllerConfig) -> Avatar {
        let mut avatar = Avatar::new(&config.avatar, true);
        avatar.place(Vec3::ZERO);
        avatar
    }

    #[test]
    fn identity_pose_looks_down_negative_z() {
        assert_eq!(CameraPose::default().forward(), Vec3::NEG_Z);
        let view = CameraPose::default().view_matrix();
        assert_eq!(view, Mat4::IDENTITY);
    }

    #[test]
    fn looking_at_faces_target() {
        let pose = CameraPose::looking_at(Vec3::new(0.0, 2.0, 6.0), Vec3::new(0.0, 1.0, 0.0))
            .unwrap();
        let expected = Vec3::new(0.0, -1.0, -6.0).normalize();
        assert!((pose.forward() - expected).length() < 1e-5);
        assert!(CameraPose::looking_at(Vec3::ZERO, Vec3::NEG_Y).is_none());
        assert!(CameraPose::looking_at(Vec3::ONE, Vec3::ONE).is_none());
    }

    #[test]
    fn first_person_sits_at_eye_height() {
        let config = ControllerConfig::default();
        let avatar = standing_avatar(&config);
        let mut view = ViewState::new(&config);
        view.toggle();
        view.set_angles(FRAC_PI_2, 0.0, &config);
        let reg = wall_registry(1.0);
        let mut query = QueryEngine::new(&reg, &config);
        let pose = resolve(&avatar, &view, &mut query, &config.camera);
        assert!((pose.position - Vec3::new(0.0, 0.9, 0.0)).length() < 1e-6);
        // yaw +90 degrees turns -Z toward -X
        assert!((pose.forward() - Vec3::NEG_X).length() < 1e-5);
        assert_eq!(query.stats().camera_rays, 0);
    }

    #[test]
    fn unobstructed_third_person_sits_behind_avatar() {
        let config = ControllerConfig::default();
        let avatar = standing_avatar(&config);
        let view = ViewState::new(&config);
        let reg = flat_registry();
        let mut query = QueryEngine::new(&reg, &config);
        let pose = resolve(&avatar, &view, &mut query, &config.camera);
        assert!((pose.position - Vec3::new(0.0, 1.0, 6.0)).length() < 1e-5);
        assert!((pose.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(query.stats().camera_rays, 1);
    }

    #[test]
    fn occluded_third_person_pulls_in_front_of_hit() {
        let config = ControllerConfig::default();
        let avatar = standing_avatar(&config);
        let mut view = ViewState::new(&config);
        // Orbit so the camera offset points along +X, into a wall 3 units away.
        view.set_angles(FRAC_PI_2, 0.0, &config);
        let reg = wall_registry(3.0);
        let mut query = QueryEngine::new(&reg, &config);
        let pose = resolve(&avatar, &view, &mut query, &config.camera);

        let target = Vec3::new(0.0, 1.0, 0.0);
        let hit = query.occlusion(target, Vec3::X, 6.0).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-4);
        let expected = hit.point - Vec3::X * 0.2;
        assert!((pose.position - expected).length() < 1e-4);
        assert!((pose.forward() - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn camera_resolves_before_spawn() {
        let config = ControllerConfig::default();
        let avatar = Avatar::new(&config.avatar, true);
        let view = ViewState::new(&config);
        let reg = promenade_surface::SurfaceRegistry::new();
        let mut query = QueryEngine::new(&reg, &config);
        let pose = resolve(&avatar, &view, &mut query, &config.camera);
        assert!((pose.position - Vec3::new(0.0, 1.0, 6.0)).length() < 1e-5);
    }
}
