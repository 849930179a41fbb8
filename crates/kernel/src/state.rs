use glam::Vec3;
use promenade_common::{ControllerConfig, ViewMode};
use promenade_input::InputFrame;
use promenade_surface::{Surface, SurfaceRegistry};
use serde::{Deserialize, Serialize};

use crate::avatar::Avatar;
use crate::camera::{self, CameraPose};
use crate::jump::JumpWindow;
use crate::movement::{self, MoveOutcome};
use crate::query::{QueryEngine, QueryStats};
use crate::view::{ViewState, ViewTransition};

/// Where the avatar ended up when spawned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnOutcome {
    /// The spawn ray found a floor at this point.
    Placed(Vec3),
    /// The spawn ray missed; the avatar stands on the fallback point.
    Fallback(Vec3),
}

impl SpawnOutcome {
    pub fn floor(&self) -> Vec3 {
        match *self {
            Self::Placed(p) | Self::Fallback(p) => p,
        }
    }
}

/// Summary of one `GameState::step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: u64,
    pub outcome: MoveOutcome,
    pub transition: Option<ViewTransition>,
    pub stats: QueryStats,
}

/// All gameplay state, owned by the frame loop.
///
/// Mutated only through [`GameState::register_surfaces`],
/// [`GameState::spawn`] and [`GameState::step`].
#[derive(Debug, Clone)]
pub struct GameState {
    config: ControllerConfig,
    surfaces: SurfaceRegistry,
    avatar: Avatar,
    view: ViewState,
    jump: JumpWindow,
    camera: CameraPose,
    frame: u64,
    last_report: Option<FrameReport>,
}

impl GameState {
    pub fn new(config: ControllerConfig) -> Self {
        let view = ViewState::new(&config);
        let avatar = Avatar::new(&config.avatar, view.mode() == ViewMode::ThirdPerson);
        let jump = JumpWindow::new(config.movement.jump_window);
        let mut state = Self {
            config,
            surfaces: SurfaceRegistry::new(),
            avatar,
            view,
            jump,
            camera: CameraPose::default(),
            frame: 0,
            last_report: None,
        };
        state.resolve_camera();
        state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn surfaces(&self) -> &SurfaceRegistry {
        &self.surfaces
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn jump(&self) -> &JumpWindow {
        &self.jump
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    /// Add loaded surfaces to the registry. Returns how many were queryable.
    pub fn register_surfaces(&mut self, surfaces: impl IntoIterator<Item = Surface>) -> usize {
        let accepted = self.surfaces.extend(surfaces);
        tracing::debug!(
            accepted,
            total = self.surfaces.len(),
            triangles = self.surfaces.triangle_count(),
            "surfaces registered"
        );
        accepted
    }

    /// Drop the avatar onto the floor below the spawn point, or onto the
    /// fallback point if nothing is there.
    pub fn spawn(&mut self) -> SpawnOutcome {
        let spawn = self.config.spawn;
        let mut query = QueryEngine::new(&self.surfaces, &self.config);
        let outcome = match query.drop_point(spawn.point) {
            Some(floor) => {
                tracing::info!(x = floor.x, y = floor.y, z = floor.z, "avatar spawned");
                SpawnOutcome::Placed(floor)
            }
            None => {
                tracing::warn!(
                    x = spawn.point.x,
                    y = spawn.point.y,
                    z = spawn.point.z,
                    "no floor below spawn point, using fallback"
                );
                SpawnOutcome::Fallback(spawn.fallback)
            }
        };
        self.avatar.place(outcome.floor());
        self.avatar.set_shown(self.view.mode() == ViewMode::ThirdPerson);
        self.resolve_camera();
        outcome
    }

    /// Advance one frame: view input, then movement, then camera.
    pub fn step(&mut self, input: &InputFrame, delta: f32) -> FrameReport {
        let span = tracing::info_span!("frame", frame = self.frame);
        let _enter = span.enter();
        let delta = delta.max(0.0);

        let transition = self.view.apply_input(input, &mut self.jump, &self.config);
        if let Some(t) = transition {
            self.avatar.set_shown(t.to == ViewMode::ThirdPerson);
            tracing::debug!(from = ?t.from, to = ?t.to, "view changed");
        }

        self.jump.decay(delta);
        let mut query = QueryEngine::new(&self.surfaces, &self.config);
        let outcome = movement::advance(
            &mut self.avatar,
            input,
            self.camera.forward(),
            &self.jump,
            delta,
            &mut query,
            &self.config,
        );
        tracing::trace!(?outcome, position = ?self.avatar.position, "movement");

        self.camera = camera::resolve(&self.avatar, &self.view, &mut query, &self.config.camera);

        let report = FrameReport {
            frame: self.frame,
            outcome,
            transition,
            stats: query.stats(),
        };
        self.frame += 1;
        self.last_report = Some(report);
        report
    }

    fn resolve_camera(&mut self) {
        let mut query = QueryEngine::new(&self.surfaces, &self.config);
        self.camera = camera::resolve(&self.avatar, &self.view, &mut query, &self.config.camera);
    }
}
