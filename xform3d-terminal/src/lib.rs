/// Terminal viewer driving the xform3d transformation engine
use crossterm::{
    cursor,
    event::{self, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::Color,
    terminal::{self},
};
use std::io::{self, stdout, Write};
use xform3d_core::{Float, Mesh, PerspectiveCamera, Plane, Transformations};

pub mod controls;
pub mod renderer;

pub use controls::{command_for, Command, Controls, Group};
pub use renderer::{AsciiRenderer, Panel, RenderOptions};

/// Smallest terminal the layout fits in
const MIN_WIDTH: usize = 60;
const MIN_HEIGHT: usize = 20;

/// Rows reserved under the views for parameters and the matrix dump
const STATUS_ROWS: usize = 6;

const HELP: &str = "1-5 group  x/X y/Y z/Z adjust  a axis  s/t/r/0 reset  v/V view  f/w/l layers  q quit";

/// Viewer settings, fixed for the session
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Perspective viewer distance
    pub distance: Float,
    /// Rows per model unit in the perspective panel; fitted to the panel when unset
    pub scale: Option<Float>,
    /// Rows per model unit in the projection panels; fitted when unset
    pub projection_scale: Option<Float>,
    /// View orbit (x, y, z degrees) at start-up and after `v`
    pub initial_view: [Float; 3],
    pub options: RenderOptions,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            distance: PerspectiveCamera::DEFAULT_DISTANCE,
            scale: None,
            projection_scale: None,
            initial_view: [30.0, 45.0, 0.0],
            options: RenderOptions::default(),
        }
    }
}

/// Panel placement for one frame
struct Layout {
    main: Panel,
    side: [Panel; 3],
    status_row: usize,
}

impl Layout {
    fn new(width: usize, height: usize) -> Self {
        let body = height - 1 - STATUS_ROWS;
        let main_width = width * 3 / 5;
        let side_width = width - main_width;
        let side_height = body / 3;
        let side = [0, 1, 2].map(|i| {
            let y = 1 + i * side_height;
            // last panel takes the remainder
            let h = if i == 2 { body - 2 * side_height } else { side_height };
            Panel::new(main_width, y, side_width, h)
        });
        Self {
            main: Panel::new(0, 1, main_width, body),
            side,
            status_row: 1 + body,
        }
    }
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    mesh: Mesh,
    transformations: Transformations,
    controls: Controls,
    config: ViewConfig,
    status: String,
    running: bool,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: ViewConfig) -> Self {
        let mut transformations = Transformations::new();
        let [x, y, z] = config.initial_view;
        transformations.set_view_rotation(x, y, z);

        Self {
            mesh,
            transformations,
            controls: Controls::new(),
            config,
            status: "ready".to_string(),
            running: true,
        }
    }

    pub fn transformations(&self) -> &Transformations {
        &self.transformations
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    /// One redraw per input event; nothing happens between events.
    fn main_loop(&mut self) -> io::Result<()> {
        self.redraw()?;
        while self.running {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    if let Some(command) = command_for(code) {
                        self.handle(command);
                        if self.running {
                            self.redraw()?;
                        }
                    }
                }
                Event::Resize(..) => self.redraw()?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one command to the viewer state
    pub fn handle(&mut self, command: Command) {
        if self.controls.apply(command, &mut self.transformations) {
            self.status = "ready".to_string();
            return;
        }
        let options = &mut self.config.options;
        match command {
            Command::Quit => self.running = false,
            Command::PresetView => {
                let [x, y, z] = self.config.initial_view;
                self.transformations.set_view_rotation(x, y, z);
            }
            Command::ToggleFaces => options.show_faces = !options.show_faces,
            Command::ToggleWireframe => options.show_wireframe = !options.show_wireframe,
            Command::ToggleLabels => options.show_labels = !options.show_labels,
            other => log::debug!("unhandled command {other:?}"),
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let canvas = self.compose_frame(width as usize, height as usize);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        canvas.draw(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    /// Recompute the transformed model and paint a full frame
    pub fn compose_frame(&mut self, width: usize, height: usize) -> AsciiRenderer {
        let vertices = self.transformations.apply_transformations(&self.mesh.vertices);
        let mut canvas = AsciiRenderer::new(width, height);

        if width < MIN_WIDTH || height < MIN_HEIGHT {
            canvas.text(0, 0, "terminal too small", Color::Red);
            return canvas;
        }
        let layout = Layout::new(width, height);

        let camera = PerspectiveCamera {
            distance: self.config.distance,
            scale: self
                .config
                .scale
                .unwrap_or(layout.main.height as Float / 12.0),
            offset_x: 0.0,
            offset_y: 0.0,
        };
        match camera.project_vertices(&vertices) {
            Ok(points) => {
                self.status = "ready".to_string();
                canvas.render_perspective(layout.main, &points, &self.mesh, &self.config.options)
            }
            Err(e) => {
                log::warn!("perspective view skipped: {e}");
                self.status = e.to_string();
                canvas.frame(layout.main, "perspective");
            }
        }

        let projection_scale = self
            .config
            .projection_scale
            .unwrap_or(layout.side[0].height as Float / 9.0);
        for (panel, plane) in layout.side.into_iter().zip(Plane::ALL) {
            match self.transformations.get_projections(&vertices, plane.tag()) {
                Ok(points) => {
                    canvas.render_projection(panel, plane, &points, &self.mesh, projection_scale)
                }
                Err(e) => {
                    self.status = e.to_string();
                    canvas.frame(panel, plane.title());
                }
            }
        }

        canvas.text(
            0,
            0,
            &format!("xform3d | {} | {HELP}", self.mesh.description()),
            Color::Yellow,
        );
        self.draw_status(&mut canvas, layout.status_row);
        canvas
    }

    fn draw_status(&self, canvas: &mut AsciiRenderer, row: usize) {
        let s = self.transformations.state();
        let triple = |v: &nalgebra::Vector3<Float>| format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z);
        let angles = |v: &nalgebra::Vector3<Float>| format!("({}°, {}°, {}°)", v.x, v.y, v.z);

        canvas.text(
            0,
            row,
            &format!(
                "scale {}  translate {}  rotate {}",
                triple(&s.scale),
                triple(&s.translate),
                angles(&s.rotate)
            ),
            Color::White,
        );
        canvas.text(
            0,
            row + 1,
            &format!(
                "axis {} angle {}°  view {}  [{}]  {}",
                triple(&s.custom_axis),
                s.custom_angle,
                angles(&s.view_rotation),
                self.controls.group.name(),
                self.status
            ),
            Color::White,
        );
        for (i, line) in self.transformations.matrix_string().lines().enumerate() {
            canvas.text(0, row + 2 + i, line, Color::Cyan);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_text(canvas: &AsciiRenderer) -> Vec<String> {
        (0..canvas.height()).map(|row| canvas.row_text(row)).collect()
    }

    #[test]
    fn test_starts_with_configured_view() {
        let app = TerminalApp::new(Mesh::letter_p(), ViewConfig::default());
        let view = app.transformations().state().view_rotation;
        assert_eq!((view.x, view.y, view.z), (30.0, 45.0, 0.0));
    }

    #[test]
    fn test_compose_frame_layout() {
        let mut app = TerminalApp::new(Mesh::letter_p(), ViewConfig::default());
        let canvas = app.compose_frame(120, 40);
        let rows = frame_text(&canvas);

        assert!(rows[0].starts_with("xform3d | 16 vertices, 10 faces, 48 edges"));
        let all = rows.concat();
        for caption in ["perspective", "XY (top)", "XZ (front)", "YZ (side)"] {
            assert!(all.contains(caption), "missing {caption}");
        }
        // Matrix dump occupies the last four rows
        assert!(rows[36].contains('.'));
        assert!(rows[39].starts_with("   0.000    0.000    0.000    1.000"));
    }

    #[test]
    fn test_too_small_terminal() {
        let mut app = TerminalApp::new(Mesh::letter_p(), ViewConfig::default());
        let canvas = app.compose_frame(20, 5);
        assert!(canvas.row_text(0).starts_with("terminal too small"));
    }

    #[test]
    fn test_handle_commands() {
        let mut app = TerminalApp::new(Mesh::letter_p(), ViewConfig::default());

        app.handle(Command::ClearView);
        assert_eq!(app.transformations().state().view_rotation.y, 0.0);
        app.handle(Command::PresetView);
        assert_eq!(app.transformations().state().view_rotation.y, 45.0);

        app.handle(Command::ToggleFaces);
        assert!(!app.config.options.show_faces);

        assert!(app.is_running());
        app.handle(Command::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn test_degenerate_perspective_is_reported() {
        let config = ViewConfig {
            initial_view: [0.0, 0.0, 0.0],
            distance: 1.0,
            ..ViewConfig::default()
        };
        // Vertex A sits at y = 1; move it to y = -1 so D + y = 0
        let mut app = TerminalApp::new(Mesh::letter_p(), config);
        app.transformations.set_translate(0.0, -2.0, 0.0);
        let canvas = app.compose_frame(120, 40);
        assert!(app.status.contains("perspective singularity"));
        assert!(frame_text(&canvas).concat().contains("perspective"));
    }

    #[test]
    fn test_status_clears_once_projection_recovers() {
        let config = ViewConfig {
            initial_view: [90.0, 0.0, 0.0],
            distance: 1.0,
            ..ViewConfig::default()
        };
        let mut app = TerminalApp::new(Mesh::letter_p(), config);
        app.transformations.set_translate(0.0, -2.0, 0.0);
        app.transformations.set_view_rotation(0.0, 0.0, 0.0);
        app.compose_frame(120, 40);
        assert!(app.status.contains("perspective singularity"));

        // Non-parameter command: only the next frame can clear the error
        app.handle(Command::PresetView);
        let canvas = app.compose_frame(120, 40);
        assert_eq!(app.status, "ready");
        assert!(!frame_text(&canvas).concat().contains("singularity"));
    }
}
