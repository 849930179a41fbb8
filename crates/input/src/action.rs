use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a bound key does.
///
/// The controller consumes the movement, jump and view actions through
/// [`InputFrame`](crate::InputFrame); the rest are handled by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    /// Open the jump window so taller ledges can be climbed.
    Jump,
    /// Switch between first and third person.
    ToggleView,
    /// Show or hide the help overlay.
    ToggleHud,
    /// Show or hide the collision mesh wireframe.
    ToggleWireframe,
    /// Give up an exclusive pointer capture.
    ReleasePointer,
}

impl Action {
    /// Held actions are tracked as levels; the others fire once per press.
    pub fn is_level(self) -> bool {
        matches!(
            self,
            Self::MoveForward | Self::MoveBack | Self::MoveLeft | Self::MoveRight
        )
    }
}

/// Key name to action table. Names follow physical key codes
/// (`"KeyW"`, `"Space"`, `"F1"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = [
            ("KeyW", Action::MoveForward),
            ("KeyS", Action::MoveBack),
            ("KeyA", Action::MoveLeft),
            ("KeyD", Action::MoveRight),
            ("Space", Action::Jump),
            ("KeyV", Action::ToggleView),
            ("F1", Action::ToggleHud),
            ("F2", Action::ToggleWireframe),
            ("Escape", Action::ReleasePointer),
        ]
        .into_iter()
        .map(|(k, a)| (k.to_string(), a))
        .collect();
        Self { bindings }
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    pub fn bind(&mut self, key: impl Into<String>, action: Action) {
        self.bindings.insert(key.into(), action);
    }

    pub fn unbind(&mut self, key: &str) -> Option<Action> {
        self.bindings.remove(key)
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.bindings.get(key).copied()
    }

    /// Keys bound to `action`, in name order.
    pub fn keys_for(&self, action: Action) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_controls() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for("KeyW"), Some(Action::MoveForward));
        assert_eq!(b.action_for("Space"), Some(Action::Jump));
        assert_eq!(b.action_for("KeyV"), Some(Action::ToggleView));
        assert_eq!(b.action_for("KeyQ"), None);
    }

    #[test]
    fn rebinding_replaces_key() {
        let mut b = KeyBindings::default();
        b.bind("ArrowUp", Action::MoveForward);
        assert_eq!(b.keys_for(Action::MoveForward), vec!["ArrowUp", "KeyW"]);
        assert_eq!(b.unbind("KeyW"), Some(Action::MoveForward));
        assert_eq!(b.keys_for(Action::MoveForward), vec!["ArrowUp"]);
    }

    #[test]
    fn level_actions() {
        assert!(Action::MoveLeft.is_level());
        assert!(!Action::Jump.is_level());
        assert!(!Action::ToggleView.is_level());
    }

    #[test]
    fn bindings_deserialize_from_map() {
        let b: KeyBindings = serde_yaml::from_str("KeyI: move_forward\nKeyJ: jump\n").unwrap();
        assert_eq!(b.action_for("KeyI"), Some(Action::MoveForward));
        assert_eq!(b.action_for("KeyJ"), Some(Action::Jump));
        assert_eq!(b.action_for("KeyW"), None);
    }
}
