use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::DVec2;
use raymarch_input::{InputConfig, InputEvent, MoveKey};
use raymarch_kernel::{Step, Viewer, ViewerConfig};
use raymarch_render::{ShaderSources, ShaderVariant};
use raymarch_timing::MonotonicClock;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

mod overlay;
mod pointer;
mod surface;

use pointer::VirtualCursor;
use surface::Presenter;

#[derive(Parser, Debug)]
#[command(name = "raymarch-desktop", about = "Real-time raymarching viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the WGSL shader sources
    #[arg(long, default_value = "res/shaders")]
    shader_dir: PathBuf,

    /// Fragment shader variant: orientation, world-origin or free-flight
    #[arg(long, default_value_t = ShaderVariant::FreeFlight)]
    variant: ShaderVariant,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 1600, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 900, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Number of recent frames averaged for the FPS readout
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    timing_window: u32,

    /// Camera speed in units per second
    #[arg(long, default_value_t = 2.5)]
    speed: f32,

    /// Degrees of rotation per pixel of drag
    #[arg(long, default_value_t = 0.1)]
    sensitivity: f32,

    /// Present without waiting for vertical sync
    #[arg(long)]
    no_vsync: bool,
}

impl Cli {
    fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            input: InputConfig {
                sensitivity: self.sensitivity,
                speed: self.speed,
                ..InputConfig::default()
            },
            variant: self.variant,
            timing_capacity: self.timing_window as usize,
            ..ViewerConfig::default()
        }
    }
}

fn move_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Back),
        KeyCode::KeyA => Some(MoveKey::StrafeLeft),
        KeyCode::KeyD => Some(MoveKey::StrafeRight),
        _ => None,
    }
}

struct GpuApp {
    cli: Cli,
    viewer: Viewer<MonotonicClock>,
    presenter: Option<Presenter>,
    cursor: VirtualCursor,
    /// First fatal error; returned from `main` once the loop stops.
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(cli: Cli, viewer: Viewer<MonotonicClock>) -> Self {
        Self {
            cli,
            viewer,
            presenter: None,
            cursor: VirtualCursor::default(),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let size = PhysicalSize::new(self.cli.width, self.cli.height);
        let mut attrs = Window::default_attributes()
            .with_title("Raymarch Viewer")
            .with_inner_size(size);
        if let Some(monitor) = event_loop.primary_monitor() {
            let area = monitor.size();
            let origin = monitor.position();
            let x = origin.x + (area.width as i32 - size.width as i32) / 2;
            let y = origin.y + (area.height as i32 - size.height as i32) / 2;
            attrs = attrs.with_position(PhysicalPosition::new(x, y));
        }
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        tracing::info!(width = size.width, height = size.height, "window created");

        let sources = ShaderSources::load(&self.cli.shader_dir, self.cli.variant)
            .with_context(|| format!("loading shaders from {}", self.cli.shader_dir.display()))?;
        let presenter = Presenter::new(window, &sources, self.cli.variant, !self.cli.no_vsync)?;
        self.presenter = Some(presenter);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.viewer.request_close();
        if let Some(mut presenter) = self.presenter.take() {
            match self.viewer.step(&mut presenter) {
                Ok(Step::Exit) => {}
                Ok(Step::Continue(_)) => tracing::warn!("close step rendered a frame"),
                Err(e) => tracing::warn!("error while releasing GPU resources: {e}"),
            }
        }
        event_loop.exit();
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        match self.viewer.step(presenter) {
            Ok(Step::Continue(_)) => {}
            Ok(Step::Exit) => event_loop.exit(),
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("render loop failed")),
        }
    }

    fn set_dragging(&mut self, dragging: bool) {
        let Some(presenter) = &self.presenter else {
            return;
        };
        if dragging {
            self.cursor.engage(pointer::grab(presenter.window()));
            self.viewer.push_event(InputEvent::DragStarted);
        } else {
            pointer::ungrab(presenter.window());
            self.cursor.release();
            self.viewer.push_event(InputEvent::DragEnded);
        }
    }

    fn cursor_at(&mut self, position: Option<DVec2>) {
        if let Some(p) = position {
            self.viewer
                .push_event(InputEvent::CursorMoved { x: p.x, y: p.y });
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.presenter.is_some() || self.fatal.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(presenter) = &mut self.presenter else {
            return;
        };
        if presenter.on_window_event(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.viewer.request_close();
                self.frame(event_loop);
            }
            WindowEvent::Resized(new_size) => presenter.resize(new_size),
            WindowEvent::Focused(false) => {
                pointer::ungrab(presenter.window());
                self.cursor.release();
                self.viewer.push_event(InputEvent::FocusLost);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = move_key(code) {
                    self.viewer.push_event(InputEvent::Key {
                        key,
                        pressed: state == ElementState::Pressed,
                    });
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => self.set_dragging(state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } => {
                let position = self.cursor.on_cursor_moved(DVec2::new(position.x, position.y));
                self.cursor_at(position);
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
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
            let position = self.cursor.on_motion(DVec2::new(delta.0, delta.1));
            self.cursor_at(position);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(presenter) = &self.presenter {
            presenter.window().request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    tracing::info!(variant = %cli.variant, "raymarch-desktop starting");

    let viewer = Viewer::new(cli.viewer_config(), MonotonicClock::new())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(cli, viewer);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.fatal.take() {
        return Err(err);
    }
    tracing::info!("shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer_defaults() {
        let cli = Cli::try_parse_from(["raymarch-desktop"]).unwrap();
        assert_eq!((cli.width, cli.height), (1600, 900));
        assert_eq!(cli.shader_dir, PathBuf::from("res/shaders"));
        assert!(!cli.no_vsync);
        assert_eq!(cli.viewer_config(), ViewerConfig::default());
    }

    #[test]
    fn flags_flow_into_config() {
        let cli = Cli::try_parse_from([
            "raymarch-desktop",
            "--variant",
            "world-origin",
            "--timing-window",
            "30",
            "--speed",
            "5",
            "--sensitivity",
            "0.2",
        ])
        .unwrap();
        let config = cli.viewer_config();
        assert_eq!(config.variant, ShaderVariant::WorldOrigin);
        assert_eq!(config.timing_capacity, 30);
        assert_eq!(config.input.speed, 5.0);
        assert_eq!(config.input.sensitivity, 0.2);
    }

    #[test]
    fn rejects_empty_timing_window_and_unknown_variant() {
        assert!(Cli::try_parse_from(["raymarch-desktop", "--timing-window", "0"]).is_err());
        assert!(Cli::try_parse_from(["raymarch-desktop", "--variant", "pinhole"]).is_err());
    }

    #[test]
    fn wasd_maps_to_movement() {
        assert_eq!(move_key(KeyCode::KeyW), Some(MoveKey::Forward));
        assert_eq!(move_key(KeyCode::KeyS), Some(MoveKey::Back));
        assert_eq!(move_key(KeyCode::KeyA), Some(MoveKey::StrafeLeft));
        assert_eq!(move_key(KeyCode::KeyD), Some(MoveKey::StrafeRight));
        assert_eq!(move_key(KeyCode::Space), None);
    }
}
