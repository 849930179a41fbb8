mod script;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glam::Vec3;
use promenade_assets::load_mesh;
use promenade_common::ControllerConfig;
use promenade_input::InputFrame;
use promenade_kernel::{GameState, QueryEngine};
use promenade_render::{DebugTextRenderer, FrameOutput, Renderer};
use promenade_stream::{EnvironmentLoader, LoadEvent, MeshSource};
use promenade_surface::{MeshRole, SurfaceRegistry};
use promenade_tools::ControllerInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "promenade-cli", about = "Headless tools for the promenade controller")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Controller config (YAML). Defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective config as YAML, or write it to a file
    Config {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report the floor height below (x, z) on a collision mesh
    Probe {
        /// Collision mesh (.glb, .gltf or .json)
        #[arg(short, long)]
        mesh: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        z: f32,
    },
    /// Walk the avatar through a scripted input sequence
    Walk {
        /// Collision mesh (.glb, .gltf or .json)
        #[arg(short, long, conflicts_with = "demo")]
        mesh: Option<PathBuf>,
        /// Use the built-in demo auditorium
        #[arg(long)]
        demo: bool,
        /// Frames to simulate. Defaults to the script length, or 60 without a script.
        #[arg(short, long)]
        frames: Option<usize>,
        /// Input script, one step per line
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
    },
}

/// Collision source for a walk. One of `--mesh` or `--demo` is required.
fn walk_source(mesh: Option<PathBuf>, demo: bool) -> anyhow::Result<MeshSource> {
    match (mesh, demo) {
        (Some(path), _) => Ok(MeshSource::File(path)),
        (None, true) => Ok(MeshSource::Demo),
        (None, false) => bail!("walk needs a collision mesh: pass --mesh FILE or --demo"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ControllerConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("promenade-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("surface: {}", promenade_surface::crate_info());
            println!("input: {}", promenade_input::crate_info());
            println!("assets: {}", promenade_assets::crate_info());
            println!("stream: {}", promenade_stream::crate_info());
            println!("render: {}", promenade_render::crate_info());
            println!("tools: {}", promenade_tools::crate_info());
        }
        Commands::Config { output } => {
            match output {
                Some(path) => {
                    config.save(&path)?;
                    println!("wrote {}", path.display());
                }
                None => print!("{}", config.to_yaml_string()?),
            }
        }
        Commands::Probe { mesh, x, z } => {
            let mesh = load_mesh(&mesh, MeshRole::Collision)?;
            let mut registry = SurfaceRegistry::new();
            registry.register(mesh.to_surface());
            let Some(bounds) = registry.bounds() else {
                bail!("mesh {} has no triangles", mesh.name);
            };
            let origin = Vec3::new(x, bounds.max.y + 1.0, z);
            let mut query = QueryEngine::new(&registry, &config);
            match query.drop_point(origin) {
                Some(floor) => println!("floor at ({x:.3}, {:.3}, {z:.3})", floor.y),
                None => println!("no floor below ({x:.3}, {z:.3})"),
            }
        }
        Commands::Walk {
            mesh,
            demo,
            frames,
            input,
            dt,
        } => {
            let source = walk_source(mesh, demo)?;
            let inputs = match input {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading script {}", path.display()))?;
                    script::frames(&script::parse(&text)?)
                }
                None => Vec::new(),
            };
            let count = frames.unwrap_or(if inputs.is_empty() { 60 } else { inputs.len() });

            let mut state = GameState::new(config);
            for event in EnvironmentLoader::spawn([(MeshRole::Collision, source)]).wait() {
                match event {
                    LoadEvent::Loaded(loaded) => {
                        state.register_surfaces(loaded.surface);
                    }
                    LoadEvent::Failed(err) => return Err(err.into()),
                }
            }
            let spawn = state.spawn();
            println!("spawn: {spawn:?}");

            let renderer = DebugTextRenderer::new();
            let idle = InputFrame::default();
            for i in 0..count {
                state.step(inputs.get(i).unwrap_or(&idle), dt);
                println!("{}", renderer.render(&FrameOutput::from_state(&state)));
            }
            println!("{}", ControllerInspector::summary(&state));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_requires_mesh_or_demo() {
        assert!(walk_source(None, false).is_err());
        assert!(matches!(walk_source(None, true), Ok(MeshSource::Demo)));
        assert!(matches!(
            walk_source(Some(PathBuf::from("hall.json")), false),
            Ok(MeshSource::File(_))
        ));
    }

    #[test]
    fn walk_flags_parse() {
        let cli = Cli::try_parse_from(["promenade-cli", "walk", "--demo", "--frames", "5"]).unwrap();
        let Commands::Walk { demo, frames, mesh, .. } = cli.command else {
            panic!("expected walk");
        };
        assert!(demo);
        assert_eq!(frames, Some(5));
        assert!(mesh.is_none());
        assert!(Cli::try_parse_from(["promenade-cli", "walk", "--demo", "--mesh", "a.json"]).is_err());
    }

    #[test]
    fn negative_coordinates_parse() {
        let cli = Cli::try_parse_from(["promenade-cli", "probe", "--mesh", "a.json", "-10", "6.5"])
            .unwrap();
        let Commands::Probe { x, z, .. } = cli.command else {
            panic!("expected probe");
        };
        assert_eq!((x, z), (-10.0, 6.5));
    }
}
