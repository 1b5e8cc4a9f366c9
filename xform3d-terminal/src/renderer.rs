/// ASCII canvas for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use xform3d_core::{sort_faces_by_depth, Float, Mesh, OrthoViewport, Plane, ScreenPoint};

/// Terminal cells are about twice as tall as they are wide, so one vertical
/// unit spans two columns.
pub const CELL_ASPECT: Float = 2.0;

/// Fill characters, one per face (cycled)
const FACE_FILL: &[char] = &['.', ':', '-', '=', '+', '*', '%', '~', ';', ','];

const FACE_COLORS: &[Color] = &[
    Color::Blue,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::DarkBlue,
    Color::DarkYellow,
    Color::DarkGreen,
    Color::DarkRed,
];

/// Lines longer than this many cells are not drawn
const MAX_LINE_STEPS: Float = 4096.0;

/// Rectangle of cells on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Panel {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, col: i64, row: i64) -> bool {
        col >= self.x as i64
            && row >= self.y as i64
            && col < (self.x + self.width) as i64
            && row < (self.y + self.height) as i64
    }

    /// Map a point given in vertical-unit coordinates relative to the panel
    /// centre to fractional cell coordinates.
    pub fn cell_from_center(&self, sx: Float, sy: Float) -> (Float, Float) {
        (
            self.x as Float + self.width as Float / 2.0 + sx * CELL_ASPECT,
            self.y as Float + self.height as Float / 2.0 + sy,
        )
    }

    /// Same, for coordinates relative to the panel's top-left corner
    pub fn cell_from_corner(&self, p: &Point2<Float>) -> (Float, Float) {
        (self.x as Float + p.x * CELL_ASPECT, self.y as Float + p.y)
    }

    /// Interior area, inside a one-cell border
    pub fn inner(&self) -> Panel {
        Panel::new(
            self.x + 1,
            self.y + 1,
            self.width.saturating_sub(2),
            self.height.saturating_sub(2),
        )
    }
}

/// Which layers of the perspective view to paint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_faces: bool,
    pub show_wireframe: bool,
    pub show_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_faces: true,
            show_wireframe: true,
            show_labels: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

/// Character canvas the views are painted onto before being flushed
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.width && row < self.height).then(|| self.cells[row * self.width + col].ch)
    }

    /// One row of the canvas as plain text
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    fn put(&mut self, col: i64, row: i64, ch: char, color: Color, clip: Panel) {
        if !clip.contains(col, row) || col >= self.width as i64 || row >= self.height as i64 {
            return;
        }
        self.cells[row as usize * self.width + col as usize] = Cell { ch, color };
    }

    pub fn text(&mut self, col: usize, row: usize, text: &str, color: Color) {
        let clip = Panel::new(0, 0, self.width, self.height);
        for (i, ch) in text.chars().enumerate() {
            self.put((col + i) as i64, row as i64, ch, color, clip);
        }
    }

    /// Straight segment between two fractional cell positions. The glyph
    /// follows the slope unless `glyph` is given.
    pub fn line(
        &mut self,
        from: (Float, Float),
        to: (Float, Float),
        glyph: Option<char>,
        color: Color,
        clip: Panel,
    ) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil();
        if !steps.is_finite() || steps > MAX_LINE_STEPS {
            return;
        }
        let ch = glyph.unwrap_or_else(|| slope_glyph(dx, dy));
        let steps = steps.max(1.0) as i64;
        for i in 0..=steps {
            let t = i as Float / steps as Float;
            let x = from.0 + dx * t;
            let y = from.1 + dy * t;
            self.put(x.floor() as i64, y.floor() as i64, ch, color, clip);
        }
    }

    /// Fill a polygon using the even-odd rule, sampling cell centres.
    /// Works for concave outlines.
    pub fn fill_polygon(&mut self, outline: &[(Float, Float)], ch: char, color: Color, clip: Panel) {
        if outline.len() < 3 || outline.iter().any(|p| !p.0.is_finite() || !p.1.is_finite()) {
            return;
        }
        let min_x = outline.iter().map(|p| p.0).fold(Float::INFINITY, Float::min);
        let max_x = outline.iter().map(|p| p.0).fold(Float::NEG_INFINITY, Float::max);
        let min_y = outline.iter().map(|p| p.1).fold(Float::INFINITY, Float::min);
        let max_y = outline.iter().map(|p| p.1).fold(Float::NEG_INFINITY, Float::max);

        let col_start = (min_x.floor() as i64).max(clip.x as i64);
        let col_end = (max_x.ceil() as i64).min((clip.x + clip.width) as i64);
        let row_start = (min_y.floor() as i64).max(clip.y as i64);
        let row_end = (max_y.ceil() as i64).min((clip.y + clip.height) as i64);

        for row in row_start..row_end {
            for col in col_start..col_end {
                if point_in_polygon(outline, col as Float + 0.5, row as Float + 0.5) {
                    self.put(col, row, ch, color, clip);
                }
            }
        }
    }

    /// Border around `panel` with a caption in the top edge
    pub fn frame(&mut self, panel: Panel, title: &str) {
        if panel.width < 2 || panel.height < 2 {
            return;
        }
        let color = Color::DarkGrey;
        let (left, top) = (panel.x, panel.y);
        let right = panel.x + panel.width - 1;
        let bottom = panel.y + panel.height - 1;
        let clip = panel;

        for col in left..=right {
            self.put(col as i64, top as i64, '-', color, clip);
            self.put(col as i64, bottom as i64, '-', color, clip);
        }
        for row in top..=bottom {
            self.put(left as i64, row as i64, '|', color, clip);
            self.put(right as i64, row as i64, '|', color, clip);
        }
        for (col, row) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            self.put(col as i64, row as i64, '+', color, clip);
        }

        let caption: String = format!(" {title} ").chars().take(panel.width.saturating_sub(4)).collect();
        for (i, ch) in caption.chars().enumerate() {
            self.put((left + 2 + i) as i64, top as i64, ch, Color::White, clip);
        }
    }

    /// Paint the perspective view: faces farthest-first, then edges,
    /// vertices and labels on top.
    ///
    /// `points` come from a camera centred on the origin; they are placed
    /// relative to the panel centre.
    pub fn render_perspective(
        &mut self,
        panel: Panel,
        points: &[ScreenPoint],
        mesh: &Mesh,
        options: &RenderOptions,
    ) {
        self.frame(panel, "perspective");
        let area = panel.inner();
        let to_cell = |p: &ScreenPoint| area.cell_from_center(p.x, p.y);

        self.axis_gizmo(area);

        if options.show_faces {
            for face in sort_faces_by_depth(points, &mesh.faces) {
                let outline: Vec<(Float, Float)> = face.points.iter().map(to_cell).collect();
                let ch = FACE_FILL[face.index % FACE_FILL.len()];
                let color = FACE_COLORS[face.index % FACE_COLORS.len()];
                self.fill_polygon(&outline, ch, color, area);
            }
        }

        if options.show_wireframe {
            for (a, b) in mesh.valid_edges(points.len()) {
                self.line(to_cell(&points[a]), to_cell(&points[b]), None, Color::White, area);
            }
        }

        for p in points {
            let (col, row) = to_cell(p);
            self.put(col.floor() as i64, row.floor() as i64, 'o', Color::DarkYellow, area);
        }
        if options.show_labels {
            for p in points {
                let (col, row) = to_cell(p);
                let label = mesh.vertex_label(p.index);
                for (i, ch) in label.chars().enumerate() {
                    let c = col.floor() as i64 + 1 + i as i64;
                    self.put(c, row.floor() as i64, ch, Color::White, area);
                }
            }
        }
    }

    /// Paint one orthographic projection: axes, edges and vertices
    pub fn render_projection(
        &mut self,
        panel: Panel,
        plane: Plane,
        points: &[Point2<Float>],
        mesh: &Mesh,
        scale: Float,
    ) {
        self.frame(panel, plane.title());
        let area = panel.inner();
        let viewport = OrthoViewport {
            width: area.width as Float / CELL_ASPECT,
            height: area.height as Float,
            scale,
        };

        let (h_label, v_label) = plane.axis_labels();
        let (cx, cy) = area.cell_from_center(0.0, 0.0);
        let axis_color = Color::DarkGrey;
        let right = (area.x + area.width) as Float;
        let bottom = (area.y + area.height) as Float;
        self.line((area.x as Float, cy), (right, cy), Some('-'), axis_color, area);
        self.line((cx, area.y as Float), (cx, bottom), Some('|'), axis_color, area);
        self.put(right as i64 - 1, cy as i64 - 1, h_label, axis_color, area);
        self.put(cx as i64 + 1, area.y as i64, v_label, axis_color, area);

        let cells: Vec<(Float, Float)> = viewport
            .map_all(points)
            .iter()
            .map(|p| area.cell_from_corner(p))
            .collect();

        for (a, b) in mesh.valid_edges(cells.len()) {
            self.line(cells[a], cells[b], None, Color::Magenta, area);
        }
        for &(col, row) in &cells {
            self.put(col.floor() as i64, row.floor() as i64, 'o', Color::DarkYellow, area);
        }
    }

    /// Fixed screen-space axis indicator in the lower-left corner
    fn axis_gizmo(&mut self, area: Panel) {
        if area.width < 12 || area.height < 6 {
            return;
        }
        let origin = ((area.x + 3) as Float, (area.y + area.height - 2) as Float);
        let arms = [
            ((origin.0 + 6.0, origin.1), 'X', Color::Red),
            ((origin.0, origin.1 - 3.0), 'Z', Color::Green),
            ((origin.0 + 3.0, origin.1 - 1.5), 'Y', Color::Blue),
        ];
        for (end, label, color) in arms {
            self.line(origin, end, None, color, area);
            self.put(end.0 as i64 + 1, end.1 as i64, label, color, area);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Glyph approximating the direction of a segment (screen y grows down)
fn slope_glyph(dx: Float, dy: Float) -> char {
    if dy.abs() * 2.0 < dx.abs() {
        '-'
    } else if dx.abs() * 2.0 < dy.abs() {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Even-odd point-in-polygon test
fn point_in_polygon(outline: &[(Float, Float)], px: Float, py: Float) -> bool {
    let mut inside = false;
    let mut j = outline.len() - 1;
    for i in 0..outline.len() {
        let (xi, yi) = outline[i];
        let (xj, yj) = outline[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
