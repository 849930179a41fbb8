//! Shared types and tunables used by every promenade crate.
//!
//! Nothing in here knows about rendering, windowing or asset formats.

mod config;
mod types;

pub use config::{
    AvatarConfig, CameraConfig, ConfigError, ControllerConfig, FloorFollow, MovementConfig,
    SpawnConfig, ViewConfig,
};
pub use types::{Transform, ViewMode};
