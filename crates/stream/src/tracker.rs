use promenade_surface::MeshRole;

use crate::loader::LoadEvent;

/// Progress of one environment mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Pending,
    Ready,
    Failed,
}

/// Two-of-two join over the collision and render loads.
///
/// Completion order does not matter. [`LoadTracker::take_spawn_signal`]
/// fires exactly once, the first time it is asked after both are ready.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    collision: LoadStatus,
    render: LoadStatus,
    signalled: bool,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &LoadEvent) {
        let status = match event {
            LoadEvent::Loaded(_) => LoadStatus::Ready,
            LoadEvent::Failed(_) => LoadStatus::Failed,
        };
        self.set(event.role(), status);
    }

    pub fn set(&mut self, role: MeshRole, status: LoadStatus) {
        match role {
            MeshRole::Collision => self.collision = status,
            MeshRole::Render => self.render = status,
        }
    }

    pub fn status(&self, role: MeshRole) -> LoadStatus {
        match role {
            MeshRole::Collision => self.collision,
            MeshRole::Render => self.render,
        }
    }

    pub fn both_ready(&self) -> bool {
        self.collision == LoadStatus::Ready && self.render == LoadStatus::Ready
    }

    pub fn any_failed(&self) -> bool {
        self.collision == LoadStatus::Failed || self.render == LoadStatus::Failed
    }

    /// True once, when both meshes are ready and spawn has not yet been signalled.
    pub fn take_spawn_signal(&mut self) -> bool {
        if self.signalled || !self.both_ready() {
            return false;
        }
        self.signalled = true;
        true
    }

    /// Short status line for the HUD.
    pub fn summary(&self) -> String {
        let label = |s: LoadStatus| match s {
            LoadStatus::Pending => "loading",
            LoadStatus::Ready => "ready",
            LoadStatus::Failed => "failed",
        };
        format!(
            "collision {}, render {}",
            label(self.collision),
            label(self.render)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_order_independent() {
        for order in [
            [MeshRole::Collision, MeshRole::Render],
            [MeshRole::Render, MeshRole::Collision],
        ] {
            let mut tracker = LoadTracker::new();
            tracker.set(order[0], LoadStatus::Ready);
            assert!(!tracker.take_spawn_signal());
            tracker.set(order[1], LoadStatus::Ready);
            assert!(tracker.take_spawn_signal());
        }
    }

    #[test]
    fn spawn_signal_fires_once() {
        let mut tracker = LoadTracker::new();
        tracker.set(MeshRole::Collision, LoadStatus::Ready);
        tracker.set(MeshRole::Render, LoadStatus::Ready);
        assert!(tracker.take_spawn_signal());
        assert!(!tracker.take_spawn_signal());
    }

    #[test]
    fn failure_keeps_join_open() {
        let mut tracker = LoadTracker::new();
        tracker.set(MeshRole::Collision, LoadStatus::Ready);
        tracker.set(MeshRole::Render, LoadStatus::Failed);
        assert!(tracker.any_failed());
        assert!(!tracker.both_ready());
        assert!(!tracker.take_spawn_signal());
        assert_eq!(tracker.summary(), "collision ready, render failed");
    }

    #[test]
    fn records_loader_events() {
        let loader = crate::EnvironmentLoader::environment(
            crate::MeshSource::Demo,
            crate::MeshSource::Demo,
        );
        let mut tracker = LoadTracker::new();
        for event in loader.wait() {
            tracker.record(&event);
        }
        assert!(tracker.both_ready());
        assert_eq!(tracker.status(MeshRole::Render), LoadStatus::Ready);
    }
}
