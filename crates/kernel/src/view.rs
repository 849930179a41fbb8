use glam::Vec2;
use promenade_common::{ControllerConfig, ViewMode};
use promenade_input::InputFrame;
use serde::{Deserialize, Serialize};

use crate::jump::JumpWindow;

/// Which pointer-driven look scheme is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookControl {
    /// First person: pointer deltas turn the head while the pointer is captured.
    PointerLock,
    /// Third person: pointer deltas orbit the camera while the look button is held.
    Orbit,
}

/// A mode change produced by a view-toggle pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTransition {
    pub from: ViewMode,
    pub to: ViewMode,
}

/// First/third person state plus look angles and third-person zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    mode: ViewMode,
    /// Radians about world up. Unbounded.
    yaw: f32,
    /// Radians about the camera's right axis, clamped short of straight up/down.
    pitch: f32,
    camera_distance: f32,
}

impl ViewState {
    pub fn new(config: &ControllerConfig) -> Self {
        let cam = &config.camera;
        Self {
            mode: config.view.initial_mode,
            yaw: 0.0,
            pitch: 0.0,
            camera_distance: cam.distance.clamp(cam.min_distance, cam.max_distance),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn camera_distance(&self) -> f32 {
        self.camera_distance
    }

    pub fn look_control(&self) -> LookControl {
        match self.mode {
            ViewMode::FirstPerson => LookControl::PointerLock,
            ViewMode::ThirdPerson => LookControl::Orbit,
        }
    }

    /// Set the look angles directly, clamping pitch.
    pub fn set_angles(&mut self, yaw: f32, pitch: f32, config: &ControllerConfig) {
        let max = config.view.max_pitch();
        self.yaw = yaw;
        self.pitch = pitch.clamp(-max, max);
    }

    /// Flip between first and third person.
    pub fn toggle(&mut self) -> ViewTransition {
        let from = self.mode;
        self.mode = from.toggled();
        ViewTransition {
            from,
            to: self.mode,
        }
    }

    /// Turn by a pointer delta if the current mode's look gate is open.
    /// Returns whether the delta was consumed.
    pub fn apply_pointer(
        &mut self,
        delta: Vec2,
        pointer_captured: bool,
        look_held: bool,
        config: &ControllerConfig,
    ) -> bool {
        let gate_open = match self.look_control() {
            LookControl::PointerLock => pointer_captured,
            LookControl::Orbit => look_held,
        };
        if !gate_open || delta == Vec2::ZERO {
            return false;
        }
        let sensitivity = config.view.sensitivity(self.mode);
        self.set_angles(
            self.yaw - delta.x * sensitivity,
            self.pitch - delta.y * sensitivity,
            config,
        );
        true
    }

    /// Zoom the third-person camera. Ignored in first person.
    pub fn apply_scroll(&mut self, delta: f32, config: &ControllerConfig) -> bool {
        if self.mode != ViewMode::ThirdPerson || delta == 0.0 {
            return false;
        }
        let cam = &config.camera;
        self.camera_distance = (self.camera_distance + delta * cam.zoom_per_scroll)
            .clamp(cam.min_distance, cam.max_distance);
        true
    }

    /// Consume one frame of input: view toggles, then look, zoom and jump.
    /// Returns the net transition if the mode changed.
    pub fn apply_input(
        &mut self,
        input: &InputFrame,
        jump: &mut JumpWindow,
        config: &ControllerConfig,
    ) -> Option<ViewTransition> {
        let from = self.mode;
        for _ in 0..input.view_toggles {
            self.toggle();
        }
        self.apply_pointer(
            input.pointer_delta,
            input.pointer_captured,
            input.look_held,
            config,
        );
        self.apply_scroll(input.scroll_delta, config);
        if input.jump {
            jump.trigger();
        }
        (self.mode != from).then_some(ViewTransition { from, to: self.mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ControllerConfig {
        ControllerConfig::default()
    }

    #[test]
    fn starts_in_configured_mode() {
        let v = ViewState::new(&config());
        assert_eq!(v.mode(), ViewMode::ThirdPerson);
        assert_eq!(v.look_control(), LookControl::Orbit);
        assert_eq!(v.camera_distance(), 6.0);
    }

    #[test]
    fn double_toggle_restores_mode_and_look_control() {
        let mut v = ViewState::new(&config());
        let before = (v.mode(), v.look_control());
        let t = v.toggle();
        assert_eq!(t.to, ViewMode::FirstPerson);
        assert_eq!(v.look_control(), LookControl::PointerLock);
        v.toggle();
        assert_eq!((v.mode(), v.look_control()), before);
    }

    #[test]
    fn first_person_look_requires_capture() {
        let cfg = config();
        let mut v = ViewState::new(&cfg);
        v.toggle();
        assert!(!v.apply_pointer(Vec2::new(100.0, 0.0), false, true, &cfg));
        assert_eq!(v.yaw(), 0.0);
        assert!(v.apply_pointer(Vec2::new(100.0, 50.0), true, false, &cfg));
        assert!((v.yaw() - (-0.2)).abs() < 1e-6);
        assert!((v.pitch() - (-0.1)).abs() < 1e-6);
    }

    #[test]
    fn third_person_look_requires_button() {
        let cfg = config();
        let mut v = ViewState::new(&cfg);
        assert!(!v.apply_pointer(Vec2::new(100.0, 0.0), true, false, &cfg));
        assert!(v.apply_pointer(Vec2::new(100.0, 0.0), false, true, &cfg));
        assert!((v.yaw() - (-0.25)).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let cfg = config();
        let mut v = ViewState::new(&cfg);
        v.apply_pointer(Vec2::new(0.0, -100_000.0), false, true, &cfg);
        assert_eq!(v.pitch(), cfg.view.max_pitch());
        v.apply_pointer(Vec2::new(0.0, 100_000.0), false, true, &cfg);
        assert_eq!(v.pitch(), -cfg.view.max_pitch());
    }

    #[test]
    fn frame_pointer_delta_is_clamped_once() {
        let cfg = config();
        let mut v = ViewState::new(&cfg);
        let mut collector = promenade_input::InputCollector::default();
        collector.set_look_held(true);
        // Far past the clamp and back within one frame nets to no turn.
        collector.pointer_moved(0.0, -100_000.0);
        collector.pointer_moved(0.0, 100_000.0);
        let frame = collector.take_frame();
        assert_eq!(frame.pointer_delta, Vec2::ZERO);
        let mut jump = JumpWindow::new(0.25);
        v.apply_input(&frame, &mut jump, &cfg);
        assert_eq!(v.pitch(), 0.0);
    }

    #[test]
    fn scroll_zooms_only_in_third_person() {
        let cfg = config();
        let mut v = ViewState::new(&cfg);
        assert!(v.apply_scroll(100.0, &cfg));
        assert!((v.camera_distance() - 7.0).abs() < 1e-6);
        v.apply_scroll(10_000.0, &cfg);
        assert_eq!(v.camera_distance(), cfg.camera.max_distance);
        v.apply_scroll(-10_000.0, &cfg);
        assert_eq!(v.camera_distance(), cfg.camera.min_distance);

        v.toggle();
        assert!(!v.apply_scroll(100.0, &cfg));
        assert_eq!(v.camera_distance(), cfg.camera.min_distance);
    }

    #[test]
    fn jump_pulse_opens_window_in_any_mode() {
        let cfg = config();
        for toggles in [0, 1] {
            let mut v = ViewState::new(&cfg);
            let mut jump = JumpWindow::new(cfg.movement.jump_window);
            let input = InputFrame {
                jump: true,
                view_toggles: toggles,
                ..Default::default()
            };
            v.apply_input(&input, &mut jump, &cfg);
            assert_eq!(jump.remaining(), cfg.movement.jump_window);
        }
    }

    #[test]
    fn apply_input_reports_net_transition() {
        let cfg = config();
        let mut v = ViewState::new(&cfg);
        let mut jump = JumpWindow::new(0.25);
        let once = InputFrame {
            view_toggles: 1,
            ..Default::default()
        };
        let t = v.apply_input(&once, &mut jump, &cfg).unwrap();
        assert_eq!(t.from, ViewMode::ThirdPerson);
        assert_eq!(t.to, ViewMode::FirstPerson);
        let twice = InputFrame {
            view_toggles: 2,
            ..Default::default()
        };
        assert!(v.apply_input(&twice, &mut jump, &cfg).is_none());
    }
}
