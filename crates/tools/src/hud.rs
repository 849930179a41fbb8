use promenade_kernel::GameState;
use promenade_stream::{FrameTimer, LoadTracker};

/// Control reference shown under the view label.
pub const HELP_LINES: [&str; 5] = [
    "WASD = move",
    "Mouse = look (hold LMB in 3rd)",
    "Scroll = zoom (3rd)",
    "Space = climb stairs / step up",
    "V = toggle view",
];

/// On-screen overlay text. The view label is always shown; the rest
/// follows the visibility toggle.
#[derive(Debug, Clone)]
pub struct Hud {
    visible: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "hud toggled");
        self.visible
    }

    pub fn lines(&self, state: &GameState, tracker: &LoadTracker, timer: &FrameTimer) -> Vec<String> {
        let mut lines = vec![format!("View: {}", state.view().mode().label())];
        if !self.visible {
            return lines;
        }
        lines.extend(HELP_LINES.iter().map(|l| l.to_string()));
        lines.push(format!("Environment: {}", tracker.summary()));
        if !state.avatar().is_spawned() {
            lines.push("Avatar: waiting for environment".to_string());
        } else if let Some(report) = state.last_report() {
            lines.push(format!(
                "Move: {} ({} rays)",
                report.outcome.label(),
                report.stats.total()
            ));
        }
        if state.jump().is_open() {
            lines.push(format!("Step-up: {:.2}s", state.jump().remaining()));
        }
        if timer.count() > 0 {
            lines.push(format!(
                "{:.0} fps ({:.1} ms)",
                timer.fps(),
                timer.average().as_secs_f32() * 1000.0
            ));
        }
        lines
    }
}
