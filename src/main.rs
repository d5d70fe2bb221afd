use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::{EngineConfig, Preset};
use crate::game::Game;
use crate::input::KeyState;
use crate::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};

mod canvas;
mod config;
mod game;
mod input;
mod maze;
mod player;
mod raycast;
mod renderer;
mod scaler;
mod world;

/// Grid raycaster: hand-authored maps, generated mazes and a mini-map.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Built-in demo configuration
    #[arg(long, value_enum, default_value_t = Preset::MazeMinimap)]
    preset: Preset,

    /// RON config file; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for maze generation
    #[arg(long)]
    seed: Option<u64>,

    /// Hide the mini-map overlay
    #[arg(long)]
    no_minimap: bool,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::preset(self.preset),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_minimap {
            config.minimap = None;
        }
        Ok(config)
    }
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    game: Game,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    scale_lut: ScaleLut,

    // Input
    keys: KeyState,
    focused: bool,
}

impl App {
    fn new(game: Game) -> Self {
        Self {
            window: None,
            surface: None,
            game,
            frame_counter: 0,
            last_fps_print: Instant::now(),
            scale_lut: ScaleLut::empty(),
            keys: KeyState::default(),
            focused: false,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = (self.game.canvas().width(), self.game.canvas().height());
        let attributes = Window::default_attributes()
            .with_title("Grid Raycaster")
            .with_inner_size(LogicalSize::new(w as f64, h as f64));

        let window = Rc::new(event_loop.create_window(attributes).context("create window")?);
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, id: WindowId) -> Result<()> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        // Player update + render happen even when minimized; only presenting is skipped
        self.game.frame(&self.keys, self.focused);

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            window.request_redraw();
            return Ok(());
        };
        let (dw_px, dh_px) = (dw.get() as usize, dh.get() as usize);

        surface
            .resize(dw, dh)
            .map_err(|e| anyhow::anyhow!("resize surface: {e}"))?;

        let canvas = self.game.canvas();
        if !self.scale_lut.matches(dw_px, dh_px) {
            debug!(width = dw_px, height = dh_px, "rebuilding scale table");
            self.scale_lut = build_scale_lut(dw_px, dh_px, canvas.width(), canvas.height());
        }

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("buffer_mut: {e}"))?;
        blit_nearest_stretch(&mut buf, dw_px, canvas.pixels(), canvas.width(), &self.scale_lut);
        buf.present()
            .map_err(|e| anyhow::anyhow!("present: {e}"))?;

        // FPS
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_counter as f32 / elapsed;
            debug!("FPS: {:.1}", fps);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        // Schedule the next frame
        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases that happen while unfocused never reach us
                    self.keys.clear();
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    self.keys.handle(code, state);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(id) {
                    error!("{e:#}");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                debug!(width = new_size.width, height = new_size.height, "resized");
            }
            _ => (),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.engine_config()?;
    info!(
        preset = ?cli.preset,
        config = ?cli.config,
        map = ?config.map,
        "starting"
    );

    let game = Game::new(config).context("building game")?;

    let event_loop = EventLoop::new().context("create event loop")?;
    // Each redraw requests the next one, so the loop keeps ticking under Wait
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(game);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_minimap_preset() {
        let cli = Cli::parse_from(["grid-raycaster"]);
        let config = cli.engine_config().unwrap();
        assert_eq!(config, EngineConfig::preset(Preset::MazeMinimap));
    }

    #[test]
    fn cli_overrides() {
        let cli = Cli::parse_from([
            "grid-raycaster",
            "--preset",
            "maze-minimap",
            "--seed",
            "9",
            "--no-minimap",
        ]);
        let config = cli.engine_config().unwrap();
        assert_eq!(config.seed, Some(9));
        assert!(config.minimap.is_none());

        let cli = Cli::parse_from(["grid-raycaster", "--preset", "fixed"]);
        assert_eq!(
            cli.engine_config().unwrap().map,
            crate::config::MapSource::Fixed
        );
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["grid-raycaster", "--config", "/no/such/file.ron"]);
        assert!(cli.engine_config().is_err());
    }
}
