/// Terminal flight simulator built on the orbit3d pipeline
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use orbit3d_core::flight::render_order;
use orbit3d_core::transform::{align_to_direction, scaling, translation_to};
use orbit3d_core::{
    Camera, CameraMode, FreeFlyInput, Matrix4, Mesh, Pipeline, PipelineConfig, Planet,
    RenderOrder, Rgb, ShipControls, Spacecraft, Starfield, Vector3,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::Canvas;

const SHIP_COLOR: Rgb = Rgb::new(150, 150, 150);
const SHIP_WIRE: Rgb = Rgb::WHITE;
const PLANET_COLOR: Rgb = Rgb::new(0, 0, 200);
const VELOCITY_COLOR: Rgb = Rgb::new(0, 255, 0);
const GRAVITY_COLOR: Rgb = Rgb::new(255, 0, 0);
const HEADING_COLOR: Rgb = Rgb::new(255, 255, 0);

/// Look delta per arrow-key press, in mouse units.
const ARROW_LOOK_STEP: f32 = 10.0;
/// Look delta per terminal cell of mouse drag.
const MOUSE_CELL_STEP: f32 = 4.0;
/// Follow-distance change per zoom step.
const ZOOM_STEP: f32 = 2.0;
/// Screen width the gizmo line thickness formula was tuned for.
const REFERENCE_WIDTH: f32 = 1000.0;

/// Startup options for [`FlightApp`]
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub fov_degrees: f32,
    pub target_fps: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            fov_degrees: PipelineConfig::DEFAULT_FOV,
            target_fps: 30,
        }
    }
}

/// Input gathered between two frames
#[derive(Debug, Clone, Copy, Default)]
struct FrameInput {
    controls: ShipControls,
    free: FreeFlyInput,
    look: (f32, f32),
}

/// Main application struct for the terminal flight simulator
pub struct FlightApp {
    ship_mesh: Mesh,
    planet_mesh: Mesh,
    arrow_mesh: Mesh,
    ship: Spacecraft,
    planet: Planet,
    camera: Camera,
    starfield: Starfield,
    settings: AppSettings,
    pipeline: Pipeline,
    canvas: Canvas,
    input: FrameInput,
    last_mouse: Option<(u16, u16)>,
    time_warp: f32,
    show_vectors: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl FlightApp {
    pub fn new(ship_mesh: Mesh, starfield: Starfield, settings: AppSettings) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_size(ship_mesh, starfield, settings, cols, rows))
    }

    /// App state for a terminal of `cols` x `rows` cells.
    pub fn with_size(
        ship_mesh: Mesh,
        starfield: Starfield,
        settings: AppSettings,
        cols: u16,
        rows: u16,
    ) -> Self {
        let canvas = Canvas::for_terminal(cols, rows);
        let pipeline = build_pipeline(&canvas, settings.fov_degrees);
        info!("Canvas {}x{} pixels", canvas.width(), canvas.height());

        Self {
            ship_mesh,
            planet_mesh: Mesh::sphere(1.0, 25, 25),
            arrow_mesh: Mesh::pyramid(0.5, 2.0),
            ship: Spacecraft::new(Vector3::zero()),
            planet: Planet::earth(),
            camera: Camera::new(),
            starfield,
            settings,
            pipeline,
            canvas,
            input: FrameInput::default(),
            last_mouse: None,
            time_warp: 1.0,
            show_vectors: true,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.settings.target_fps.max(1) as u64);
        info!("Main loop at {} FPS target", self.settings.target_fps);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.update();
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                self.canvas = Canvas::for_terminal(cols, rows);
                self.pipeline = build_pipeline(&self.canvas, self.settings.fov_degrees);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, modifiers, .. }: KeyEvent) {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        let shift = modifiers.contains(KeyModifiers::SHIFT);
        if let KeyCode::Char(ch) = code {
            if ch.is_ascii_uppercase() || shift {
                self.input.free.turbo = true;
            }
            if modifiers.contains(KeyModifiers::CONTROL) {
                self.input.free.precision = true;
            }
        }

        match code {
            KeyCode::Esc => self.running = false,
            KeyCode::Up => self.input.look.1 -= ARROW_LOOK_STEP,
            KeyCode::Down => self.input.look.1 += ARROW_LOOK_STEP,
            KeyCode::Left => self.input.look.0 -= ARROW_LOOK_STEP,
            KeyCode::Right => self.input.look.0 += ARROW_LOOK_STEP,
            KeyCode::Char(ch) => match ch.to_ascii_lowercase() {
                'w' => {
                    self.input.controls.thrust_forward = true;
                    self.input.free.forward = true;
                }
                's' => {
                    self.input.controls.thrust_back = true;
                    self.input.free.back = true;
                }
                'a' => self.input.free.left = true,
                'd' => self.input.free.right = true,
                'e' => self.input.free.up = true,
                'q' => self.input.free.down = true,
                'c' => {
                    self.camera.switch_mode();
                    info!("Camera mode {}", self.camera.mode.label());
                }
                'v' => self.show_vectors = !self.show_vectors,
                'r' => self.time_warp = 1.0,
                't' => self.time_warp = 10.0,
                'y' => self.time_warp = 50.0,
                '+' | '=' => self.camera.adjust_distance(-ZOOM_STEP),
                '-' | '_' => self.camera.adjust_distance(ZOOM_STEP),
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                if let Some((last_col, last_row)) = self.last_mouse {
                    self.input.look.0 += (mouse.column as f32 - last_col as f32) * MOUSE_CELL_STEP;
                    self.input.look.1 += (mouse.row as f32 - last_row as f32) * MOUSE_CELL_STEP;
                }
                self.last_mouse = Some((mouse.column, mouse.row));
            }
            MouseEventKind::ScrollUp => self.camera.adjust_distance(-ZOOM_STEP),
            MouseEventKind::ScrollDown => self.camera.adjust_distance(ZOOM_STEP),
            _ => {}
        }
    }

    fn update(&mut self) {
        let input = std::mem::take(&mut self.input);
        let dt = self.time_warp;

        self.ship.apply_gravity(&self.planet, dt);
        self.ship.update(
            &input.controls,
            input.look,
            dt,
            self.camera.mode == CameraMode::Chase,
        );
        if self.ship.check_collision(&self.planet) {
            debug!("Surface contact at altitude {:.1}", self.ship.altitude(&self.planet));
        }

        match self.camera.mode {
            CameraMode::Chase => {
                self.camera
                    .chase(&self.ship.position, self.ship.yaw, self.ship.pitch)
            }
            CameraMode::Follow => self.camera.follow(&self.ship.position, input.look),
            CameraMode::Free => self.camera.free_fly(&input.free, input.look),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.canvas.clear(Rgb::BLACK);

        self.render_stars();

        let view = self.camera.view_matrix();
        match render_order(&self.camera, &self.ship, &self.planet) {
            RenderOrder::ShipFirst => {
                self.render_ship(&view);
                self.render_planet(&view);
            }
            RenderOrder::PlanetFirst => {
                self.render_planet(&view);
                self.render_ship(&view);
            }
        }

        if self.show_vectors {
            self.render_vectors(&view);
        }

        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;
        self.draw_hud(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_stars(&mut self) {
        for star in &self.starfield.stars {
            if let Some((x, y)) = self.pipeline.project_star(star, &self.camera) {
                self.canvas.set_pixel(x as i32, y as i32, Rgb::WHITE);
            }
        }
    }

    fn render_ship(&mut self, view: &Matrix4) {
        let rows = self.pipeline.process_mesh_with_view(
            &self.ship_mesh,
            view,
            &self.ship.world_matrix(),
            SHIP_COLOR,
        );
        self.canvas.draw_triangles(&rows, Some(SHIP_WIRE));
    }

    fn render_planet(&mut self, view: &Matrix4) {
        let rows = self.pipeline.par_process_mesh_with_view(
            &self.planet_mesh,
            view,
            &self.planet.world_matrix(),
            PLANET_COLOR,
        );
        self.canvas.draw_triangles(&rows, None);
    }

    fn render_vectors(&mut self, view: &Matrix4) {
        let start = self.ship.position;
        let velocity = self.ship.velocity * 2.0;
        let gravity = (self.planet.position - start).normalize() * 12.5;
        let heading = self.ship.forward() * 5.0;

        self.draw_vector(view, start, velocity, VELOCITY_COLOR);
        self.draw_vector(view, start, gravity, GRAVITY_COLOR);
        self.draw_vector(view, start, heading, HEADING_COLOR);
    }

    /// Shaft from `start` along `vector`, capped with the arrowhead mesh.
    fn draw_vector(&mut self, view: &Matrix4, start: Vector3, vector: Vector3, color: Rgb) {
        let end = start + vector;

        let shaft = (
            self.pipeline.project_point_with_view(&start, view),
            self.pipeline.project_point_with_view(&end, view),
        );
        if let (Some(a), Some(b)) = shaft {
            let scale = self.pipeline.width() / REFERENCE_WIDTH;
            let thickness = if a.depth > 0.0 {
                ((100.0 / a.depth * scale) as i32).max(1)
            } else {
                1
            };
            self.canvas
                .draw_thick_line((a.x, a.y), (b.x, b.y), thickness, color);
        }

        let world = translation_to(&end) * (align_to_direction(&vector) * scaling(1.0, 1.0, 1.0));
        let rows = self
            .pipeline
            .process_mesh_with_view(&self.arrow_mesh, view, &world, color);
        self.canvas.draw_triangles(&rows, None);
    }

    fn draw_hud<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (cols, rows) = (
            self.canvas.width() as u16,
            (self.canvas.height() / 2) as u16,
        );
        let yellow = Color::Yellow;
        let lines: [(u16, u16, Color, String); 5] = [
            (0, 0, yellow, format!("Altitude: {:9.1} km", self.ship.altitude(&self.planet))),
            (0, 1, yellow, format!("Speed: {:12.1} km/s", self.ship.speed())),
            (0, 3, Color::Magenta, format!("Time Warp: {:.1}x", self.time_warp)),
            (0, 4, Color::Red, format!("Camera Mode: {}", self.camera.mode.label())),
            (cols.saturating_sub(12), 0, yellow, format!("FPS: {:.0}", self.fps)),
        ];

        queue!(out, SetBackgroundColor(Color::Black))?;
        for (x, y, color, text) in lines {
            queue!(out, cursor::MoveTo(x, y), SetForegroundColor(color), Print(text))?;
        }

        if self.show_vectors {
            let x = cols.saturating_sub(12);
            let legend = [
                ("VECTORS:", Color::White),
                ("VELOCITY", Color::Green),
                ("GRAVITY", Color::Red),
                ("HEADING", Color::Yellow),
            ];
            for (i, (label, color)) in legend.iter().enumerate() {
                queue!(
                    out,
                    cursor::MoveTo(x, 3 + i as u16),
                    SetForegroundColor(*color),
                    Print(label)
                )?;
            }
        }

        let help = "W/S thrust  Arrows/Mouse look  C camera  R/T/Y warp  V vectors  +/- zoom  Esc quit";
        queue!(
            out,
            cursor::MoveTo(0, rows.saturating_sub(1)),
            SetForegroundColor(Color::Red),
            Print(help),
            ResetColor
        )?;
        Ok(())
    }
}

/// One pipeline pixel per canvas pixel.
fn build_pipeline(canvas: &Canvas, fov_degrees: f32) -> Pipeline {
    Pipeline::with_config(PipelineConfig::new(
        canvas.width().max(1) as u32,
        canvas.height().max(1) as u32,
        fov_degrees,
    ))
}
