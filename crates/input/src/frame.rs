use glam::{Vec2, Vec3};

/// Everything the controller reads from input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// A jump press happened since the last frame.
    pub jump: bool,
    /// Number of view-toggle presses since the last frame.
    pub view_toggles: u32,
    /// Pointer motion since the last frame, in pixels.
    pub pointer_delta: Vec2,
    /// Scroll since the last frame, in wheel units (positive zooms out).
    pub scroll_delta: f32,
    /// The third-person look button is held.
    pub look_held: bool,
    /// The pointer is exclusively captured (first-person look).
    pub pointer_captured: bool,
}

impl InputFrame {
    /// Sum of the held directions in a basis where `forward` is +Z and
    /// `right` is +X. Zero when nothing (or opposing keys) is held.
    pub fn move_axes(&self) -> Vec3 {
        let mut axes = Vec3::ZERO;
        if self.forward {
            axes.z += 1.0;
        }
        if self.back {
            axes.z -= 1.0;
        }
        if self.right {
            axes.x += 1.0;
        }
        if self.left {
            axes.x -= 1.0;
        }
        axes
    }

    pub fn is_moving(&self) -> bool {
        self.move_axes() != Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_frame_has_no_axes() {
        assert_eq!(InputFrame::default().move_axes(), Vec3::ZERO);
        assert!(!InputFrame::default().is_moving());
    }

    #[test]
    fn opposing_keys_cancel() {
        let f = InputFrame {
            forward: true,
            back: true,
            ..Default::default()
        };
        assert!(!f.is_moving());
    }

    #[test]
    fn diagonal_axes() {
        let f = InputFrame {
            forward: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(f.move_axes(), Vec3::new(-1.0, 0.0, 1.0));
    }
}
