use std::collections::HashSet;
use std::num::NonZeroU32;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use wadcaster::camera::Camera;
use wadcaster::config::{Args, Config, View};
use wadcaster::error::{MapError, RenderError};
use wadcaster::framebuffer::{BLACK, Framebuffer};
use wadcaster::map::{Map, TileGrid};
use wadcaster::overlay::render_overlay;
use wadcaster::present::{ScaleLut, blit_nearest};
use wadcaster::raycaster::render_scene;
use wadcaster::vector::Vec2f;
use wadcaster::wad::Wad;

// Overlay coordinates are pixels, the grid's are cells.
const OVERLAY_UNITS_PER_CELL: f32 = 32.0;
const OVERLAY_MARGIN: u32 = 8;

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    grid: TileGrid,
    map: Map,
    scene_camera: Camera,
    overlay_camera: Camera,
    view: View,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
    last_error: Option<RenderError>,

    // Internal low-res buffer
    fb: Framebuffer,
    scale_lut: ScaleLut,

    // Input and movement
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
}

impl App {
    fn new(config: Config) -> Self {
        let grid = TileGrid::demo();
        if !grid.is_enclosed() {
            warn!("tile grid is not enclosed, rays may leave it");
        }
        let map = load_overlay_map(&config);

        let scene_camera = Camera::new(Vec2f::new(1.5, 1.5), Vec2f::new(1.0, 0.0), config.fov);
        let overlay_camera =
            Camera::new(Vec2f::new(100.0, 100.0), Vec2f::new(1.0, -0.1), config.fov);

        Self {
            fb: Framebuffer::new(config.width, config.height),
            view: config.view,
            config,
            window: None,
            surface: None,
            grid,
            map,
            scene_camera,
            overlay_camera,

            frame_counter: 0,
            last_fps_print: Instant::now(),
            last_error: None,

            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
        }
    }
}

/// Map for the overlay view: the requested WAD map scaled to the buffer, or the
/// built-in square when no WAD is given or it fails to load.
fn load_overlay_map(config: &Config) -> Map {
    let Some(path) = &config.wad else {
        info!("no wad given, using built-in map");
        return Map::fixture();
    };

    let loaded = Wad::load(path).map_err(MapError::from).and_then(|mut wad| {
        let map = Map::load(&wad, &config.map);
        wad.release();
        map
    });

    match loaded {
        Ok(map) => map.fit_to(config.width as u32, config.height as u32, OVERLAY_MARGIN),
        Err(err) => {
            warn!(%err, path = %path.display(), "failed to load map, using built-in map");
            Map::fixture()
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("wadcaster")
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(err) => {
                error!(%err, "failed to create window");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        let surface = match surface {
            Ok(surface) => surface,
            Err(err) => {
                error!(%err, "failed to create softbuffer surface");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.rebuild_lut(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        self.last_tick = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                    if repeat {
                        return;
                    }
                    match code {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::KeyM => self.toggle_view(),
                        _ => (),
                    }
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                self.tick();

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (Some(dw), Some(dh)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return; // Minimized window, skip drawing
                };
                if let Err(err) = surface.resize(dw, dh) {
                    error!(%err, "failed to resize surface");
                    return;
                }

                match self.view {
                    View::Scene => {
                        match render_scene(&mut self.fb, &self.grid, &self.scene_camera) {
                            Ok(()) => self.last_error = None,
                            Err(err) => {
                                let repeated = self
                                    .last_error
                                    .as_ref()
                                    .is_some_and(|last| last.same_site(&err));
                                if !repeated {
                                    error!(%err, "frame aborted");
                                }
                                self.fb.clear(BLACK);
                                self.last_error = Some(err);
                            }
                        }
                    }
                    View::Overlay => render_overlay(&mut self.fb, &self.map, &self.overlay_camera),
                }

                let mut buf = match surface.buffer_mut() {
                    Ok(buf) => buf,
                    Err(err) => {
                        error!(%err, "failed to map surface buffer");
                        return;
                    }
                };
                blit_nearest(
                    &mut buf,
                    dw.get() as usize,
                    self.fb.pixels(),
                    self.fb.width(),
                    &self.scale_lut,
                );
                if let Err(err) = buf.present() {
                    error!(%err, "failed to present frame");
                }

                // Log FPS
                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
                if elapsed >= 1.0 {
                    let fps = self.frame_counter as f32 / elapsed;
                    debug!(fps, "frame rate");
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                window.request_redraw();
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_lut(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl App {
    fn tick(&mut self) {
        // Compute dt with cap to avoid huge jumps if the app was paused
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;
        let dt_s = dt.as_secs_f32();

        let mut forward = 0.0;
        if self.keys_down.contains(&KeyCode::KeyW) {
            forward += 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyS) {
            forward -= 1.0;
        }

        let mut left = 0.0;
        if self.keys_down.contains(&KeyCode::KeyA) {
            left += 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyD) {
            left -= 1.0;
        }

        let turn = left * self.config.turn_speed * dt_s;
        let step = forward * self.config.move_speed * dt_s;

        match self.view {
            View::Scene => {
                // y grows downward on the grid, so a left turn is clockwise in math terms.
                self.scene_camera.rotate(-turn);
                let before = self.scene_camera.position;
                self.scene_camera.move_by(step);
                let cell = self.scene_camera.position.floor_to_vec2i();
                if self.grid.tile_at(cell.x, cell.y) != Some(0) {
                    self.scene_camera.position = before;
                }
            }
            View::Overlay => {
                self.overlay_camera.rotate(turn);
                self.overlay_camera.move_by(step * OVERLAY_UNITS_PER_CELL);
            }
        }
    }

    fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Scene => View::Overlay,
            View::Overlay => View::Scene,
        };
        info!(view = ?self.view, "switched view");
        if let Some(window) = &self.window {
            let size = window.inner_size();
            self.rebuild_lut(size.width as usize, size.height as usize);
        }
    }

    fn rebuild_lut(&mut self, dst_w: usize, dst_h: usize) {
        // Overlay map space has y pointing up.
        let flip_y = self.view == View::Overlay;
        self.scale_lut = ScaleLut::nearest(dst_w, dst_h, self.fb.width(), self.fb.height(), flip_y);
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::try_from(Args::parse()) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid arguments");
            return ExitCode::FAILURE;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!(%err, "failed to create event loop");
            return ExitCode::FAILURE;
        }
    };

    // Poll keeps redrawing while movement keys are held.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        error!(%err, "event loop failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
