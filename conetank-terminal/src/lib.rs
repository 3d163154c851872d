/// Interactive terminal calculator for liquid in an inverted truncated cone
use conetank_core::{
    compute_with, parse_assignments, Camera, Cap, Mesh, OrbitView, Parameter, TankInputs,
    TankProfile, TankSnapshot, Transform,
};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::{debug, warn};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod error;
pub mod hud;
pub mod renderer;

pub use error::{AppError, Result};
pub use hud::{HudLine, HudState};
pub use renderer::{AsciiRenderer, Layer};

/// Rows reserved above the rendering (title, four inputs, volume).
const TOP_ROWS: u16 = 6;
/// Rows reserved below the rendering (command/status, key help).
const BOTTOM_ROWS: u16 = 2;

/// Snapshot plus the triangle meshes derived from it.
pub struct Scene {
    pub snapshot: TankSnapshot,
    pub vessel: Mesh,
    pub liquid: Mesh,
}

impl Scene {
    pub fn build(inputs: &TankInputs, profile: &TankProfile) -> Result<Self> {
        let frustum = inputs.frustum()?;
        let snapshot = compute_with(
            &frustum,
            inputs.fill_height,
            profile.vessel_resolution,
            profile.liquid_resolution,
        )?;
        let vessel = Mesh::from_surface(&snapshot.vessel, Cap::None);
        let liquid = Mesh::from_surface(&snapshot.liquid, Cap::Top);
        Ok(Self {
            snapshot,
            vessel,
            liquid,
        })
    }
}

/// Plain-text result for non-interactive use.
pub fn report(profile: &TankProfile, inputs: &TankInputs) -> Result<String> {
    let frustum = inputs.frustum()?;
    let snapshot = compute_with(
        &frustum,
        inputs.fill_height,
        profile.vessel_resolution,
        profile.liquid_resolution,
    )?;
    let unit = &profile.length_unit;
    Ok(format!(
        "{}\nR = {:.2} {unit}, r = {:.2} {unit}, H = {:.2} {unit}, h = {:.2} {unit}\n{}\nFull tank: {:.2} {} ({:.1}% filled)\n",
        profile.title,
        frustum.top_radius(),
        frustum.bottom_radius(),
        frustum.height(),
        snapshot.fill_height,
        profile.volume_summary(snapshot.fill_height, snapshot.volume),
        profile.display_volume(frustum.full_volume()),
        profile.volume_unit,
        snapshot.fill_ratio() * 100.0,
    ))
}

/// Main application struct for the terminal calculator
pub struct TerminalApp {
    profile: TankProfile,
    inputs: TankInputs,
    selected: Parameter,
    scene: Scene,
    view: OrbitView,
    camera: Camera,
    renderer: AsciiRenderer,
    command: Option<String>,
    status: Option<String>,
    spinning: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(profile: TankProfile, inputs: TankInputs) -> Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(profile, inputs, width, height)
    }

    /// Build an app for a terminal of `columns x rows` cells.
    pub fn with_size(profile: TankProfile, inputs: TankInputs, columns: u16, rows: u16) -> Result<Self> {
        let scene = Scene::build(&inputs, &profile)?;
        let view_rows = Self::view_rows(rows);
        Ok(Self {
            profile,
            inputs,
            selected: Parameter::FillHeight,
            scene,
            view: OrbitView::default(),
            camera: Camera::for_terminal(columns, view_rows),
            renderer: AsciiRenderer::new(columns as usize, view_rows as usize),
            command: None,
            status: None,
            spinning: false,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    fn view_rows(rows: u16) -> u16 {
        rows.saturating_sub(TOP_ROWS + BOTTOM_ROWS).max(1)
    }

    pub fn inputs(&self) -> &TankInputs {
        &self.inputs
    }

    pub fn snapshot(&self) -> &TankSnapshot {
        &self.scene.snapshot
    }

    pub fn selected(&self) -> Parameter {
        self.selected
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(columns, rows) => self.resize(columns, rows),
                    _ => {}
                }
            }

            // Update
            if self.spinning {
                self.view.rotate(0.015, 0.0);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        let view_rows = Self::view_rows(rows);
        let mode = self.camera.mode;
        self.camera = Camera::for_terminal(columns, view_rows);
        self.camera.mode = mode;
        self.renderer.resize(columns as usize, view_rows as usize);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.command.is_some() {
            self.handle_command_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false
            }
            KeyCode::Up => self.selected = self.selected.previous(),
            KeyCode::Down | KeyCode::Tab => self.selected = self.selected.next(),
            KeyCode::Right | KeyCode::Char('+') => self.nudge(1),
            KeyCode::Left | KeyCode::Char('-') => self.nudge(-1),
            KeyCode::PageUp => self.nudge(10),
            KeyCode::PageDown => self.nudge(-10),
            KeyCode::Char('w') => self.view.rotate(0.0, 0.1),
            KeyCode::Char('s') => self.view.rotate(0.0, -0.1),
            KeyCode::Char('a') => self.view.rotate(-0.1, 0.0),
            KeyCode::Char('d') => self.view.rotate(0.1, 0.0),
            KeyCode::Char(' ') => self.spinning = !self.spinning,
            KeyCode::Char('p') => self.camera.mode = self.camera.mode.toggle(),
            KeyCode::Char(':') => {
                self.command = Some(String::new());
                self.status = None;
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        let Some(command) = self.command.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.command = None,
            KeyCode::Backspace => {
                command.pop();
            }
            KeyCode::Char(c) => command.push(c),
            KeyCode::Enter => {
                let line = std::mem::take(command);
                self.command = None;
                self.submit(&line);
            }
            _ => {}
        }
    }

    /// Apply a typed `R=2 h=1` line.
    fn submit(&mut self, line: &str) {
        let previous = self.inputs;
        let outcome = parse_assignments(line)
            .and_then(|assignments| self.inputs.apply(&assignments, &self.profile));
        match outcome {
            Ok(()) => self.recompute(),
            Err(err) => {
                warn!("rejected command '{}': {}", line, err);
                self.inputs = previous;
                self.status = Some(err.to_string());
            }
        }
    }

    fn nudge(&mut self, steps: i32) {
        match self.inputs.nudge(self.selected, steps, &self.profile) {
            Ok(_) => self.recompute(),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn recompute(&mut self) {
        match Scene::build(&self.inputs, &self.profile) {
            Ok(scene) => {
                debug!("recomputed scene, volume {}", scene.snapshot.volume);
                self.scene = scene;
                self.status = None;
            }
            Err(err) => {
                warn!("keeping previous scene: {}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        let model = Transform::tank_model_matrix(&self.scene.snapshot.frustum, &self.view);

        self.renderer.clear();
        self.renderer
            .render_axes(&self.scene.snapshot.frustum, &model, &self.camera);
        self.renderer
            .render_mesh(&self.scene.vessel, Layer::Shell, &model, &self.camera);
        self.renderer
            .render_mesh(&self.scene.liquid, Layer::Liquid, &model, &self.camera);

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, TOP_ROWS)?;

        let state = HudState {
            profile: &self.profile,
            inputs: &self.inputs,
            selected: self.selected,
            snapshot: &self.scene.snapshot,
            command: self.command.as_deref(),
            status: self.status.as_deref(),
            fps: self.fps,
        };
        let bottom_row = TOP_ROWS + self.renderer.height() as u16;
        let rows = hud::top_lines(&state)
            .into_iter()
            .zip(0u16..)
            .chain(hud::bottom_lines(&state).into_iter().zip(bottom_row..));
        for (line, row) in rows {
            let text: String = line.text.chars().take(self.renderer.width()).collect();
            queue!(
                stdout,
                cursor::MoveTo(0, row),
                SetForegroundColor(line.color),
                Print(text),
                terminal::Clear(ClearType::UntilNewLine),
                ResetColor
            )?;
        }

        stdout.flush()?;
        Ok(())
    }
}
