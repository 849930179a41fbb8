//! Per-frame walking policy.
//!
//! A move is proposed in camera space, checked against the floor under the
//! avatar and under the destination, then against walls. It is committed
//! whole or not at all.

use glam::Vec3;
use promenade_common::ControllerConfig;
use promenade_input::InputFrame;
use serde::{Deserialize, Serialize};

use crate::avatar::Avatar;
use crate::jump::JumpWindow;
use crate::query::QueryEngine;

/// Why a proposed move was not committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// The avatar has not been placed in the environment yet.
    NotSpawned,
    /// Nothing below the avatar's current position.
    NoFloorHere,
    /// Nothing below the destination.
    NoFloorAhead,
    /// Destination floor rises more than the current climb allowance.
    TooHigh,
    /// Destination floor falls more than the drop allowance.
    TooSteep,
    /// An obstacle taller than a step is in the way.
    Wall,
}

/// What the movement policy did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// No direction held; the avatar eased toward its floor.
    Idle,
    Moved,
    Blocked(BlockReason),
}

impl MoveOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Moved => "moved",
            Self::Blocked(BlockReason::NotSpawned) => "not spawned",
            Self::Blocked(BlockReason::NoFloorHere) => "no floor here",
            Self::Blocked(BlockReason::NoFloorAhead) => "no floor ahead",
            Self::Blocked(BlockReason::TooHigh) => "too high",
            Self::Blocked(BlockReason::TooSteep) => "drop too deep",
            Self::Blocked(BlockReason::Wall) => "wall",
        }
    }
}

/// Horizontal `(forward, right)` basis from a camera's look direction.
///
/// Falls back to -Z when the camera looks straight up or down.
pub fn horizontal_basis(camera_forward: Vec3) -> (Vec3, Vec3) {
    let forward = Vec3::new(camera_forward.x, 0.0, camera_forward.z).normalize_or_zero();
    let forward = if forward == Vec3::ZERO {
        Vec3::NEG_Z
    } else {
        forward
    };
    (forward, forward.cross(Vec3::Y).normalize())
}

/// World-space move for this frame, or zero when no direction is held.
pub fn move_vector(input: &InputFrame, camera_forward: Vec3, speed: f32, delta: f32) -> Vec3 {
    let axes = input.move_axes();
    if axes == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let (forward, right) = horizontal_basis(camera_forward);
    let direction = (forward * axes.z + right * axes.x).normalize_or_zero();
    direction * speed * delta.max(0.0)
}

/// Run the movement policy for one frame.
///
/// The jump window must already have been decayed for this frame. The
/// avatar is only written on a committed move or a floor-follow.
pub fn advance(
    avatar: &mut Avatar,
    input: &InputFrame,
    camera_forward: Vec3,
    jump: &JumpWindow,
    delta: f32,
    query: &mut QueryEngine<'_>,
    config: &ControllerConfig,
) -> MoveOutcome {
    if !avatar.is_spawned() {
        return MoveOutcome::Blocked(BlockReason::NotSpawned);
    }
    if query.surfaces().is_empty() {
        return if input.is_moving() {
            MoveOutcome::Blocked(BlockReason::NoFloorHere)
        } else {
            MoveOutcome::Idle
        };
    }

    if !input.is_moving() {
        follow_floor(avatar, delta, query, config);
        return MoveOutcome::Idle;
    }

    let movement = &config.movement;
    let step = move_vector(input, camera_forward, movement.speed, delta);
    let current = avatar.position;

    let Some(current_floor) = query.floor_height_at(current) else {
        return MoveOutcome::Blocked(BlockReason::NoFloorHere);
    };
    let proposed = current + Vec3::new(step.x, 0.0, step.z);
    let Some(proposed_floor) = query.floor_height_at(proposed) else {
        return MoveOutcome::Blocked(BlockReason::NoFloorAhead);
    };

    let height_diff = proposed_floor - current_floor;
    let max_up = if jump.is_open() {
        movement.jump_allowance
    } else {
        movement.step_allowance
    };
    if height_diff > max_up {
        return MoveOutcome::Blocked(BlockReason::TooHigh);
    }
    if height_diff < -movement.drop_allowance {
        return MoveOutcome::Blocked(BlockReason::TooSteep);
    }

    if query.wall_ahead(current, step) {
        return MoveOutcome::Blocked(BlockReason::Wall);
    }

    avatar.position = Vec3::new(
        proposed.x,
        proposed_floor + avatar.half_height(),
        proposed.z,
    );
    if step.x != 0.0 || step.z != 0.0 {
        avatar.yaw = step.x.atan2(step.z);
    }
    MoveOutcome::Moved
}

/// Ease the idle avatar's height toward standing on the floor below it.
pub fn follow_floor(
    avatar: &mut Avatar,
    delta: f32,
    query: &mut QueryEngine<'_>,
    config: &ControllerConfig,
) {
    if let Some(floor) = query.floor_height_at(avatar.position) {
        let target = floor + avatar.half_height();
        let t = config.movement.floor_follow.factor(delta);
        avatar.position.y += (target - avatar.position.y) * t;
    }
}
