use glam::Vec3;
use promenade_common::{AvatarConfig, Transform};
use serde::{Deserialize, Serialize};

/// The walking character: a box of fixed size positioned by its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub position: Vec3,
    /// Heading in radians about world up; 0 faces +Z.
    pub yaw: f32,
    height: f32,
    radius: f32,
    spawned: bool,
    shown: bool,
}

impl Avatar {
    /// An unspawned avatar standing on the origin.
    pub fn new(config: &AvatarConfig, shown: bool) -> Self {
        Self {
            position: Vec3::new(0.0, config.half_height(), 0.0),
            yaw: 0.0,
            height: config.height,
            radius: config.radius,
            spawned: false,
            shown,
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Height of the avatar's feet.
    pub fn feet(&self) -> f32 {
        self.position.y - self.half_height()
    }

    /// Stand the avatar on `floor` and enable it.
    pub fn place(&mut self, floor: Vec3) {
        self.position = floor + Vec3::Y * self.half_height();
        self.spawned = true;
    }

    pub fn is_spawned(&self) -> bool {
        self.spawned
    }

    /// Hidden in first person, where the camera sits inside the avatar.
    pub fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Whether the renderer should draw it this frame.
    pub fn is_visible(&self) -> bool {
        self.spawned && self.shown
    }

    /// World transform scaled to the avatar's box, for a unit-cube mesh.
    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.position, self.yaw).with_scale(Vec3::new(
            self.radius * 2.0,
            self.height,
            self.radius * 2.0,
        ))
    }
}
