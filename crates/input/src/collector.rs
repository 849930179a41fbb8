use std::collections::HashSet;

use glam::Vec2;

use crate::action::{Action, KeyBindings};
use crate::frame::InputFrame;

/// Folds device events arriving between frames into one [`InputFrame`].
///
/// Levels (held movement keys, look button, pointer capture) persist across
/// frames. Pulses and deltas are cleared by [`take_frame`](Self::take_frame).
#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    bindings: KeyBindings,
    held: HashSet<Action>,
    jump: bool,
    view_toggles: u32,
    pointer_delta: Vec2,
    scroll_delta: f32,
    look_held: bool,
    pointer_captured: bool,
}

impl InputCollector {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Record a key event by key name. `repeat` marks auto-repeat presses:
    /// a held jump key keeps re-opening the jump window, but a held view key
    /// toggles only once.
    ///
    /// Returns the bound action on a press so the caller can react to
    /// application-level actions.
    pub fn key(&mut self, key: &str, pressed: bool, repeat: bool) -> Option<Action> {
        let action = self.bindings.action_for(key)?;
        if action.is_level() {
            if pressed {
                self.held.insert(action);
            } else {
                self.held.remove(&action);
            }
        } else if pressed {
            match action {
                Action::Jump => self.jump = true,
                Action::ToggleView if !repeat => self.view_toggles += 1,
                _ => {}
            }
        }
        if pressed && !repeat {
            tracing::trace!(key, ?action, "key pressed");
        }
        pressed.then_some(action)
    }

    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        self.pointer_delta += Vec2::new(dx, dy);
    }

    pub fn scrolled(&mut self, delta: f32) {
        self.scroll_delta += delta;
    }

    pub fn set_look_held(&mut self, held: bool) {
        self.look_held = held;
    }

    pub fn set_pointer_captured(&mut self, captured: bool) {
        self.pointer_captured = captured;
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    /// Drop every held level, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.look_held = false;
    }

    /// Snapshot for this frame. Clears pulses and deltas.
    pub fn take_frame(&mut self) -> InputFrame {
        let frame = InputFrame {
            forward: self.held.contains(&Action::MoveForward),
            back: self.held.contains(&Action::MoveBack),
            left: self.held.contains(&Action::MoveLeft),
            right: self.held.contains(&Action::MoveRight),
            jump: self.jump,
            view_toggles: self.view_toggles,
            pointer_delta: self.pointer_delta,
            scroll_delta: self.scroll_delta,
            look_held: self.look_held,
            pointer_captured: self.pointer_captured,
        };
        self.jump = false;
        self.view_toggles = 0;
        self.pointer_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> InputCollector {
        InputCollector::new(KeyBindings::default())
    }

    #[test]
    fn movement_keys_are_levels() {
        let mut c = collector();
        c.key("KeyW", true, false);
        assert!(c.take_frame().forward);
        assert!(c.take_frame().forward);
        c.key("KeyW", false, false);
        assert!(!c.take_frame().forward);
    }

    #[test]
    fn jump_is_a_pulse() {
        let mut c = collector();
        assert_eq!(c.key("Space", true, false), Some(Action::Jump));
        c.key("Space", false, false);
        assert!(c.take_frame().jump);
        assert!(!c.take_frame().jump);
    }

    #[test]
    fn repeated_view_key_toggles_once() {
        let mut c = collector();
        c.key("KeyV", true, false);
        c.key("KeyV", true, true);
        c.key("KeyV", true, true);
        assert_eq!(c.take_frame().view_toggles, 1);
        assert_eq!(c.take_frame().view_toggles, 0);
    }

    #[test]
    fn deltas_accumulate_then_clear() {
        let mut c = collector();
        c.pointer_moved(3.0, -1.0);
        c.pointer_moved(2.0, 4.0);
        c.scrolled(100.0);
        let f = c.take_frame();
        assert_eq!(f.pointer_delta, Vec2::new(5.0, 3.0));
        assert_eq!(f.scroll_delta, 100.0);
        let f = c.take_frame();
        assert_eq!(f.pointer_delta, Vec2::ZERO);
        assert_eq!(f.scroll_delta, 0.0);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut c = collector();
        assert_eq!(c.key("KeyQ", true, false), None);
        assert_eq!(c.take_frame(), InputFrame::default());
    }

    #[test]
    fn release_all_clears_levels_but_not_capture() {
        let mut c = collector();
        c.key("KeyA", true, false);
        c.set_look_held(true);
        c.set_pointer_captured(true);
        c.release_all();
        let f = c.take_frame();
        assert!(!f.left && !f.look_held);
        assert!(f.pointer_captured);
    }
}
