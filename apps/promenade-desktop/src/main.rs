use anyhow::{Context, Result, bail};
use clap::Parser;
use egui::Context as EguiContext;
use promenade_assets::EnvironmentMesh;
use promenade_common::{ControllerConfig, ViewMode};
use promenade_input::{Action, InputCollector, KeyBindings};
use promenade_kernel::{GameState, LookControl};
use promenade_render::FrameOutput;
use promenade_render_wgpu::WgpuRenderer;
use promenade_stream::{EnvironmentLoader, FrameTimer, LoadEvent, LoadTracker, MeshSource};
use promenade_surface::MeshRole;
use promenade_tools::{ControllerInspector, Hud};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "promenade-desktop", about = "Walk an avatar through an auditorium")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Collision mesh (.glb, .gltf or .json)
    #[arg(long)]
    collision: Option<PathBuf>,

    /// Render mesh (.glb, .gltf or .json)
    #[arg(long)]
    render: Option<PathBuf>,

    /// Use the built-in demo auditorium for any mesh not given
    #[arg(long)]
    demo: bool,

    /// Controller config (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn mesh_source(path: Option<PathBuf>, demo: bool, role: MeshRole) -> Result<MeshSource> {
    match (path, demo) {
        (Some(path), _) => Ok(MeshSource::File(path)),
        (None, true) => {
            tracing::info!(%role, "using demo auditorium");
            Ok(MeshSource::Demo)
        }
        (None, false) => bail!("no {role} mesh given; pass --{role} FILE or --demo"),
    }
}

/// Pixels per wheel notch, matching browser `deltaY` for a line scroll.
const PIXELS_PER_LINE: f32 = 100.0;

/// Wheel delta in pixels, positive when scrolling down (zoom out).
fn scroll_pixels(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
    }
}

/// Application state.
struct AppState {
    game: GameState,
    input: InputCollector,
    loader: Option<EnvironmentLoader>,
    tracker: LoadTracker,
    timer: FrameTimer,
    hud: Hud,
    show_wireframe: bool,
    // Meshes waiting for the GPU
    pending_render: Option<EnvironmentMesh>,
    pending_wireframe: Option<EnvironmentMesh>,
}

impl AppState {
    fn new(config: ControllerConfig, loader: EnvironmentLoader) -> Self {
        Self {
            game: GameState::new(config),
            input: InputCollector::new(KeyBindings::default()),
            loader: Some(loader),
            tracker: LoadTracker::new(),
            timer: FrameTimer::new(120),
            hud: Hud::new(),
            show_wireframe: false,
            pending_render: None,
            pending_wireframe: None,
        }
    }

    /// Drain finished loads into the registry and the upload queue.
    fn poll_loader(&mut self) {
        let Some(loader) = &mut self.loader else {
            return;
        };
        for event in loader.poll() {
            self.tracker.record(&event);
            match event {
                LoadEvent::Loaded(loaded) => match loaded.mesh.role {
                    MeshRole::Collision => {
                        self.game.register_surfaces(loaded.surface);
                        self.pending_wireframe = Some(loaded.mesh);
                    }
                    MeshRole::Render => self.pending_render = Some(loaded.mesh),
                },
                LoadEvent::Failed(err) => {
                    tracing::error!(error = %err, "environment unavailable, avatar will not spawn");
                }
            }
        }
        if loader.is_finished() {
            tracing::info!(status = %self.tracker.summary(), "environment loading finished");
            self.loader = None;
        }
    }

    fn update(&mut self, dt: f32) -> Option<ViewMode> {
        self.poll_loader();
        if self.tracker.take_spawn_signal() {
            self.game.spawn();
        }
        let frame = self.input.take_frame();
        let report = self.game.step(&frame, dt);
        report.transition.map(|t| t.to)
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        let lines = self.hud.lines(&self.game, &self.tracker, &self.timer);
        egui::Area::new(egui::Id::new("hud"))
            .fixed_pos(egui::pos2(12.0, 12.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let mut lines = lines.iter();
                    if let Some(view) = lines.next() {
                        ui.strong(view);
                    }
                    for line in lines {
                        ui.label(line);
                    }
                    if self.hud.is_visible() {
                        ui.separator();
                        ui.collapsing("Inspector", |ui| {
                            ui.small(ControllerInspector::summary(&self.game).to_string());
                            for info in ControllerInspector::surfaces(self.game.surfaces()) {
                                ui.small(info.to_string());
                            }
                        });
                        ui.small("F1: Toggle HUD | F2: Collision wireframe | Esc: Release pointer");
                    }
                });
            });
    }
}

/// Window and GPU resources, created on resume.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Promenade")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("promenade_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Grab or release the pointer. Returns whether it is now captured.
    fn capture_pointer(&self, capture: bool) -> bool {
        if !capture {
            let _ = self.window.set_cursor_grab(CursorGrabMode::None);
            self.window.set_cursor_visible(true);
            return false;
        }
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "pointer capture unavailable");
                false
            }
        }
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn set_pointer_captured(&mut self, capture: bool) {
        let captured = self
            .gpu
            .as_ref()
            .is_some_and(|gpu| gpu.capture_pointer(capture));
        self.state.input.set_pointer_captured(captured);
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::ToggleHud => {
                self.state.hud.toggle();
            }
            Action::ToggleWireframe => {
                self.state.show_wireframe = !self.state.show_wireframe;
                tracing::debug!(visible = self.state.show_wireframe, "collision wireframe toggled");
            }
            Action::ReleasePointer => self.set_pointer_captured(false),
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let dt = self.state.timer.tick(Instant::now()).min(0.1);
        if let Some(mode) = self.state.update(dt) {
            // Orbit look never holds the pointer.
            if mode == ViewMode::ThirdPerson && self.state.input.pointer_captured() {
                self.set_pointer_captured(false);
            }
        }

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if let Some(mesh) = self.state.pending_render.take() {
            gpu.renderer.upload_environment(&gpu.device, &mesh);
        }
        if let Some(mesh) = self.state.pending_wireframe.take() {
            gpu.renderer.upload_wireframe(&gpu.device, &mesh);
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame = FrameOutput::from_state(&self.state.game);
        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &frame,
            gpu.aspect(),
            self.state.show_wireframe,
        );

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "GPU initialization failed");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.input.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let name = format!("{key:?}");
                let pressed = key_state == ElementState::Pressed;
                if let Some(action) = self.state.input.key(&name, pressed, repeat) {
                    if !repeat {
                        self.handle_action(action);
                    }
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                let pressed = btn_state == ElementState::Pressed;
                self.state.input.set_look_held(pressed);
                let wants_capture = self.state.game.view().look_control() == LookControl::PointerLock;
                if pressed && wants_capture && !self.state.input.pointer_captured() {
                    self.set_pointer_captured(true);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.input.scrolled(scroll_pixels(delta));
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state
                .input
                .pointer_moved(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("promenade-desktop starting");

    let config = match &cli.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ControllerConfig::default(),
    };

    let loader = EnvironmentLoader::environment(
        mesh_source(cli.collision, cli.demo, MeshRole::Collision)?,
        mesh_source(cli.render, cli.demo, MeshRole::Render)?,
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config, loader));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn wheel_notch_is_one_hundred_pixels() {
        assert_eq!(scroll_pixels(MouseScrollDelta::LineDelta(0.0, -1.0)), 100.0);
        assert_eq!(scroll_pixels(MouseScrollDelta::LineDelta(0.0, 2.0)), -200.0);
        assert_eq!(
            scroll_pixels(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -35.0))),
            35.0
        );
    }

    #[test]
    fn one_notch_zooms_a_visible_step() {
        let config = ControllerConfig::default();
        let mut view = promenade_kernel::ViewState::new(&config);
        let pixels = scroll_pixels(MouseScrollDelta::LineDelta(0.0, -1.0));
        assert!(view.apply_scroll(pixels, &config));
        assert!((view.camera_distance() - 7.0).abs() < 1e-5);
    }

    #[test]
    fn demo_is_opt_in() {
        assert!(mesh_source(None, false, MeshRole::Collision).is_err());
        assert!(matches!(
            mesh_source(None, true, MeshRole::Render),
            Ok(MeshSource::Demo)
        ));
        assert!(matches!(
            mesh_source(Some(PathBuf::from("hall.glb")), false, MeshRole::Render),
            Ok(MeshSource::File(_))
        ));
    }
}
