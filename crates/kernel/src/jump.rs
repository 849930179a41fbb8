use serde::{Deserialize, Serialize};

/// Tolerance window opened by a jump press.
///
/// While open, moves may climb up to the jump allowance instead of the step
/// allowance. It is a timer, not a flag: it only shrinks until re-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpWindow {
    remaining: f32,
    duration: f32,
}

impl JumpWindow {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Reopen the window at full length.
    pub fn trigger(&mut self) {
        self.remaining = self.duration;
    }

    /// Shrink by `delta` seconds, stopping at zero.
    pub fn decay(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta.max(0.0)).max(0.0);
    }

    pub fn is_open(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}
