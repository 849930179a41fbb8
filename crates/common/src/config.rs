//! Controller tunables.
//!
//! Every constant the controller uses lives here so it can be overridden from a
//! YAML file. Missing keys fall back to the defaults, which reproduce the
//! auditorium walker's intended feel.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::ViewMode;

/// Errors from loading or validating a [`ControllerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub avatar: AvatarConfig,
    pub movement: MovementConfig,
    pub view: ViewConfig,
    pub camera: CameraConfig,
    pub spawn: SpawnConfig,
}

/// Avatar footprint. The avatar is a box `2*radius` wide and `height` tall,
/// positioned by its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub height: f32,
    pub radius: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            height: 1.0,
            radius: 0.25,
        }
    }
}

impl AvatarConfig {
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }
}

/// How the idle avatar eases toward the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FloorFollow {
    /// Fixed blend per frame regardless of frame time.
    PerFrame { blend: f32 },
    /// Blend calibrated at `reference_fps` and rescaled by frame time, so the
    /// settle speed is the same at any frame rate.
    DeltaScaled { blend: f32, reference_fps: f32 },
}

impl Default for FloorFollow {
    fn default() -> Self {
        Self::PerFrame { blend: 0.3 }
    }
}

impl FloorFollow {
    /// Interpolation factor to apply this frame.
    pub fn factor(&self, delta: f32) -> f32 {
        match *self {
            Self::PerFrame { blend } => blend,
            Self::DeltaScaled {
                blend,
                reference_fps,
            } => 1.0 - (1.0 - blend).powf(delta.max(0.0) * reference_fps),
        }
    }

    fn blend(&self) -> f32 {
        match *self {
            Self::PerFrame { blend } | Self::DeltaScaled { blend, .. } => blend,
        }
    }
}

/// Movement policy tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walk speed in units per second.
    pub speed: f32,
    /// Highest ledge climbable without a jump.
    pub step_allowance: f32,
    /// Highest ledge climbable while the jump window is open.
    pub jump_allowance: f32,
    /// Deepest drop a single move may take.
    pub drop_allowance: f32,
    /// Seconds the jump window stays open after a jump pulse.
    pub jump_window: f32,
    /// Height above the queried position the floor ray starts from.
    pub floor_probe_offset: f32,
    /// Added to `step_allowance` to get the wall ray's height.
    pub wall_probe_clearance: f32,
    /// Wall ray range is `radius + |move| * wall_probe_range_factor`.
    pub wall_probe_range_factor: f32,
    pub floor_follow: FloorFollow,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            step_allowance: 0.35,
            jump_allowance: 0.8,
            drop_allowance: 1.2,
            jump_window: 0.25,
            floor_probe_offset: 3.0,
            wall_probe_clearance: 0.1,
            wall_probe_range_factor: 1.2,
            floor_follow: FloorFollow::default(),
        }
    }
}

/// Look controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub initial_mode: ViewMode,
    /// Pitch stays within `±(π/2 - pitch_margin)`.
    pub pitch_margin: f32,
    /// Radians per pointer pixel while pointer-locked in first person.
    pub sensitivity_first_person: f32,
    /// Radians per pointer pixel while orbiting in third person.
    pub sensitivity_third_person: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_mode: ViewMode::ThirdPerson,
            pitch_margin: 0.1,
            sensitivity_first_person: 0.002,
            sensitivity_third_person: 0.0025,
        }
    }
}

impl ViewConfig {
    pub fn max_pitch(&self) -> f32 {
        std::f32::consts::FRAC_PI_2 - self.pitch_margin
    }

    pub fn sensitivity(&self, mode: ViewMode) -> f32 {
        match mode {
            ViewMode::FirstPerson => self.sensitivity_first_person,
            ViewMode::ThirdPerson => self.sensitivity_third_person,
        }
    }
}

/// Camera placement and projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// First-person eye offset above the avatar centre.
    pub eye_height: f32,
    /// Third-person look-at offset above the avatar centre.
    pub look_at_height: f32,
    /// Initial third-person distance.
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance change per unit of scroll delta.
    pub zoom_per_scroll: f32,
    /// How far the camera is pulled in front of an occluding surface.
    pub occlusion_pull_in: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye_height: 0.4,
            look_at_height: 0.5,
            distance: 6.0,
            min_distance: 2.5,
            max_distance: 10.0,
            zoom_per_scroll: 0.01,
            occlusion_pull_in: 0.2,
            fov_degrees: 75.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

/// Where the avatar is placed once the environment is ready.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Origin of the downward spawn ray.
    pub point: Vec3,
    /// Floor point used when the spawn ray misses.
    pub fallback: Vec3,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            point: Vec3::new(-10.0, 3.0, 6.725),
            fallback: Vec3::ZERO,
        }
    }
}

impl ControllerConfig {
    /// Parse a YAML document, then validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }

    /// Reject configurations the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        let c = &self.camera;
        let v = &self.view;
        let non_negative = [
            ("avatar.height", self.avatar.height),
            ("avatar.radius", self.avatar.radius),
            ("movement.speed", m.speed),
            ("movement.step_allowance", m.step_allowance),
            ("movement.jump_allowance", m.jump_allowance),
            ("movement.drop_allowance", m.drop_allowance),
            ("movement.jump_window", m.jump_window),
            ("movement.floor_probe_offset", m.floor_probe_offset),
            ("movement.wall_probe_clearance", m.wall_probe_clearance),
            ("movement.wall_probe_range_factor", m.wall_probe_range_factor),
            ("view.sensitivity_first_person", v.sensitivity_first_person),
            ("view.sensitivity_third_person", v.sensitivity_third_person),
            ("camera.distance", c.distance),
            ("camera.min_distance", c.min_distance),
            ("camera.max_distance", c.max_distance),
            ("camera.zoom_per_scroll", c.zoom_per_scroll),
            ("camera.occlusion_pull_in", c.occlusion_pull_in),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        // Offsets may point either way.
        let signed = [
            ("camera.eye_height", c.eye_height),
            ("camera.look_at_height", c.look_at_height),
        ];
        for (name, value) in signed {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        for (name, point) in [
            ("spawn.point", self.spawn.point),
            ("spawn.fallback", self.spawn.fallback),
        ] {
            if !point.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite, got {point}"
                )));
            }
        }
        if !(c.fov_degrees.is_finite() && c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                c.fov_degrees
            )));
        }
        if !(c.near.is_finite() && c.far.is_finite() && c.near > 0.0 && c.far > c.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes need 0 < near < far, got near {} far {}",
                c.near, c.far
            )));
        }
        for (name, value) in [
            ("avatar.height", self.avatar.height),
            ("avatar.radius", self.avatar.radius),
            ("movement.speed", m.speed),
        ] {
            if value == 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if m.jump_allowance <= m.step_allowance {
            return Err(ConfigError::Invalid(format!(
                "movement.jump_allowance ({}) must exceed movement.step_allowance ({})",
                m.jump_allowance, m.step_allowance
            )));
        }
        let blend = m.floor_follow.blend();
        if !(blend > 0.0 && blend <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "floor_follow blend must be in (0, 1], got {blend}"
            )));
        }
        if let FloorFollow::DeltaScaled { reference_fps, .. } = m.floor_follow {
            if !(reference_fps.is_finite() && reference_fps > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "floor_follow reference_fps must be positive, got {reference_fps}"
                )));
            }
        }
        if c.min_distance > c.max_distance {
            return Err(ConfigError::Invalid(format!(
                "camera.min_distance ({}) exceeds camera.max_distance ({})",
                c.min_distance, c.max_distance
            )));
        }
        if !(0.0..std::f32::consts::FRAC_PI_2).contains(&self.view.pitch_margin) {
            return Err(ConfigError::Invalid(format!(
                "view.pitch_margin must be in [0, π/2), got {}",
                self.view.pitch_margin
            )));
        }
        Ok(())
    }
}
