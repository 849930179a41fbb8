use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use promenade_assets::{AssetError, EnvironmentMesh, demo_auditorium, load_mesh};
use promenade_surface::{MeshRole, Surface};

/// Where a mesh comes from.
#[derive(Debug, Clone)]
pub enum MeshSource {
    /// A `.glb`, `.gltf` or `.json` file.
    File(PathBuf),
    /// The built-in procedural auditorium, picked by role.
    Demo,
    /// Already in memory.
    Ready(EnvironmentMesh),
}

impl MeshSource {
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Demo => "demo auditorium".to_string(),
            Self::Ready(mesh) => format!("in-memory mesh {}", mesh.name),
        }
    }
}

/// Errors reported by a load job.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load {role} mesh: {source}")]
    Asset {
        role: MeshRole,
        #[source]
        source: AssetError,
    },
    #[error("{role} mesh loader stopped without reporting")]
    WorkerLost { role: MeshRole },
}

impl LoadError {
    pub fn role(&self) -> MeshRole {
        match self {
            Self::Asset { role, .. } | Self::WorkerLost { role } => *role,
        }
    }
}

/// A finished load: the mesh, plus its queryable surface for collision meshes.
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub mesh: EnvironmentMesh,
    pub surface: Option<Surface>,
}

impl LoadedMesh {
    fn new(mesh: EnvironmentMesh) -> Self {
        let surface = (mesh.role == MeshRole::Collision).then(|| mesh.to_surface());
        Self { mesh, surface }
    }

    pub fn role(&self) -> MeshRole {
        self.mesh.role
    }
}

/// Completion of one load job.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded(LoadedMesh),
    Failed(LoadError),
}

impl LoadEvent {
    pub fn role(&self) -> MeshRole {
        match self {
            Self::Loaded(loaded) => loaded.role(),
            Self::Failed(err) => err.role(),
        }
    }
}

fn run_job(role: MeshRole, source: MeshSource) -> LoadEvent {
    let result = match source {
        MeshSource::File(path) => load_mesh(&path, role),
        MeshSource::Demo => {
            let demo = demo_auditorium();
            Ok(match role {
                MeshRole::Collision => demo.collision,
                MeshRole::Render => demo.render,
            })
        }
        MeshSource::Ready(mesh) => Ok(EnvironmentMesh::new(
            mesh.name,
            role,
            mesh.positions,
            mesh.indices,
        )),
    };
    match result {
        Ok(mesh) => LoadEvent::Loaded(LoadedMesh::new(mesh)),
        Err(source) => LoadEvent::Failed(LoadError::Asset { role, source }),
    }
}

/// Runs the collision and render loads on their own threads.
///
/// Results arrive over a channel; [`EnvironmentLoader::poll`] drains it
/// without blocking.
pub struct EnvironmentLoader {
    rx: mpsc::Receiver<LoadEvent>,
    pending: Vec<MeshRole>,
}

impl EnvironmentLoader {
    /// Start one job per `(role, source)` pair.
    pub fn spawn(jobs: impl IntoIterator<Item = (MeshRole, MeshSource)>) -> Self {
        let (tx, rx) = mpsc::channel::<LoadEvent>();
        let mut pending = Vec::new();
        for (role, source) in jobs {
            let tx = tx.clone();
            pending.push(role);
            tracing::debug!(%role, source = %source.describe(), "starting mesh load");
            thread::spawn(move || {
                let _ = tx.send(run_job(role, source));
            });
        }
        Self { rx, pending }
    }

    /// The usual pair: a collision mesh and a render mesh.
    pub fn environment(collision: MeshSource, render: MeshSource) -> Self {
        Self::spawn([(MeshRole::Collision, collision), (MeshRole::Render, render)])
    }

    /// Roles still loading.
    pub fn pending(&self) -> &[MeshRole] {
        &self.pending
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Every event that has arrived since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => out.push(self.complete(event)),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    out.extend(self.abandon_pending());
                    break;
                }
            }
        }
        out
    }

    /// Block until every job has reported. For headless tools and tests.
    pub fn wait(mut self) -> Vec<LoadEvent> {
        let mut out = Vec::new();
        while !self.pending.is_empty() {
            match self.rx.recv() {
                Ok(event) => out.push(self.complete(event)),
                Err(mpsc::RecvError) => out.extend(self.abandon_pending()),
            }
        }
        out
    }

    fn complete(&mut self, event: LoadEvent) -> LoadEvent {
        let role = event.role();
        if let Some(i) = self.pending.iter().position(|r| *r == role) {
            self.pending.remove(i);
        }
        match &event {
            LoadEvent::Loaded(loaded) => tracing::info!(
                %role,
                id = %loaded.mesh.id,
                triangles = loaded.mesh.triangle_count(),
                "mesh ready"
            ),
            LoadEvent::Failed(err) => tracing::error!(%role, error = %err, "mesh load failed"),
        }
        event
    }

    fn abandon_pending(&mut self) -> Vec<LoadEvent> {
        self.pending
            .drain(..)
            .map(|role| {
                let err = LoadError::WorkerLost { role };
                tracing::error!(%role, error = %err, "mesh load failed");
                LoadEvent::Failed(err)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_environment_loads_both_roles() {
        let loader = EnvironmentLoader::environment(MeshSource::Demo, MeshSource::Demo);
        let events = loader.wait();
        assert_eq!(events.len(), 2);
        for event in &events {
            let LoadEvent::Loaded(loaded) = event else {
                panic!("unexpected failure: {event:?}");
            };
            assert_eq!(
                loaded.surface.is_some(),
                loaded.role() == MeshRole::Collision
            );
        }
    }

    #[test]
    fn ready_mesh_takes_the_job_role() {
        let loader = EnvironmentLoader::spawn([(
            MeshRole::Collision,
            MeshSource::Ready(EnvironmentMesh::new("slab", MeshRole::Render, vec![], vec![])),
        )]);
        let events = loader.wait();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].role(), MeshRole::Collision);
    }

    #[test]
    fn missing_file_reports_failure_for_its_role() {
        let dir = tempfile::tempdir().unwrap();
        let loader = EnvironmentLoader::environment(
            MeshSource::File(dir.path().join("missing.glb")),
            MeshSource::Demo,
        );
        let events = loader.wait();
        let failed: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                LoadEvent::Failed(err) => Some(err.role()),
                LoadEvent::Loaded(_) => None,
            })
            .collect();
        assert_eq!(failed, vec![MeshRole::Collision]);
    }

    #[test]
    fn poll_eventually_drains_everything() {
        let mut loader = EnvironmentLoader::environment(MeshSource::Demo, MeshSource::Demo);
        let mut seen = 0;
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while !loader.is_finished() && std::time::Instant::now() < deadline {
            seen += loader.poll().len();
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert!(loader.is_finished());
        assert_eq!(seen, 2);
        assert!(loader.poll().is_empty());
    }
}
