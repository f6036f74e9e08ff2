use std::env;
use std::fmt;
use std::fs;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use log::info;
use pollster::block_on;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use scrollstage::{app, FrameUpdater, InputState, Renderer, Scene};

/// Pixels of page scroll represented by one wheel line.
const SCROLL_LINE_PIXELS: f32 = 60.0;
/// Frames simulated by the headless summary mode unless --frames overrides it.
const DEFAULT_SUMMARY_FRAMES: u32 = 240;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let scene = match &options.path {
        Some(path) => {
            let xml = fs::read_to_string(path)
                .with_context(|| format!("failed to read showcase {path}"))?;
            Scene::from_xml(&xml).context("failed to parse showcase XML")?
        }
        None => Scene::builtin(),
    };

    println!(
        "Loaded showcase with {} sections ({} particles)",
        scene.sections.len(),
        scene.settings.particle_count
    );
    for section in &scene.sections {
        println!(" - {} ({})", section.name, section.shape);
    }

    if options.summary_only {
        run_summary(&scene, options.frames)
    } else {
        match run_interactive(scene.clone()) {
            Ok(()) => Ok(()),
            Err(err) => {
                if err.downcast_ref::<WindowInitError>().is_some() {
                    eprintln!(
                        "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
                    );
                    run_summary(&scene, options.frames)
                } else {
                    Err(err)
                }
            }
        }
    }
}

fn run_summary(scene: &Scene, frames: u32) -> Result<()> {
    let state = app::simulate(scene, frames);
    app::print_summary(scene, &state);
    Ok(())
}

fn run_interactive(scene: Scene) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| WindowInitError::new("event loop", err))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut stage = StageApp::new(scene);
    event_loop
        .run_app(&mut stage)
        .map_err(|err| anyhow!("event loop error: {err}"))?;

    if let Some(err) = stage.last_error.take() {
        return Err(err);
    }
    Ok(())
}

struct StageApp {
    scene: Scene,
    input: Arc<InputState>,
    updater: FrameUpdater,
    start: Instant,
    renderer: Option<Renderer>,
    last_error: Option<anyhow::Error>,
}

impl StageApp {
    fn new(scene: Scene) -> Self {
        let updater = FrameUpdater::new(scene.settings.object_distance);
        Self {
            scene,
            input: Arc::new(InputState::default()),
            updater,
            start: Instant::now(),
            renderer: None,
            last_error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title("Scroll Stage")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| WindowInitError::new("window", err))?,
        );
        let size = window.inner_size();
        self.input.set_viewport(size.width, size.height);

        let renderer = block_on(Renderer::new(Arc::clone(&window), &self.scene))?;
        renderer.window().request_redraw();
        self.renderer = Some(renderer);

        // Elapsed time starts when the first frame can actually be drawn.
        self.start = Instant::now();
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };

        let elapsed = self.start.elapsed().as_secs_f32();
        let snapshot = self.input.snapshot();
        let transforms = self.updater.advance(elapsed, &snapshot);

        let (width, height) = self.input.viewport();
        let aspect = width as f32 / height as f32;
        let camera = app::camera_params(&self.scene.settings, &transforms, aspect);
        let light = app::light_params(&self.scene.settings);
        renderer.update_globals(&camera, &light);

        match renderer.render(&self.scene.sections, &transforms) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.window().inner_size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("GPU is out of memory"));
            }
            Err(wgpu::SurfaceError::Timeout) => {
                info!("Surface timeout; retrying next frame");
            }
            Err(other) => {
                return Err(anyhow!("render failed: {other}"));
            }
        }

        renderer.window().request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for StageApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_none() {
            if let Err(err) = self.init_window(event_loop) {
                self.last_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.renderer.as_ref().map(Renderer::window_id) != Some(window_id) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                self.input.set_viewport(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(renderer) = self.renderer.as_mut() {
                    let size = renderer.window().inner_size();
                    renderer.resize(size);
                    self.input.set_viewport(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .set_cursor_from_pixels(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel down scrolls the page down, increasing the offset.
                let pixels = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * SCROLL_LINE_PIXELS,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                let max_scroll = self.scene.max_scroll(self.input.viewport_height());
                self.input.apply_scroll_delta(pixels, max_scroll);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.last_error = Some(err);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to initialize {stage}: {message}")]
struct WindowInitError {
    stage: &'static str,
    message: String,
}

impl WindowInitError {
    fn new(stage: &'static str, err: impl fmt::Display) -> anyhow::Error {
        anyhow::Error::new(Self {
            stage,
            message: err.to_string(),
        })
    }
}

struct CliOptions {
    path: Option<String>,
    summary_only: bool,
    frames: u32,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut path = None;
        let mut summary_only = false;
        let mut frames = DEFAULT_SUMMARY_FRAMES;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--summary-only" => summary_only = true,
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--frames expects a value"))?;
                    frames = value
                        .parse()
                        .with_context(|| format!("invalid frame count: {value}"))?;
                }
                other if other.starts_with("--") => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --summary-only or --frames"
                    ));
                }
                other => {
                    if path.replace(other.to_string()).is_some() {
                        return Err(anyhow!("only one showcase path may be given"));
                    }
                }
            }
        }

        Ok(Self {
            path,
            summary_only,
            frames,
        })
    }
}
