/// ASCII rasterizer for terminal rendering
use conetank_core::{Camera, Frustum, Mesh, Transform, Triangle};
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

/// Dim ramp for the translucent vessel shell (darkest to lightest)
const SHELL_RAMP: &[char] = &['.', ':', '-', '=', '+'];

/// Bright ramp for the liquid body (darkest to lightest)
const LIQUID_RAMP: &[char] = &['~', '=', '+', '*', '#', '%', '@'];

/// Dots drawn along each axis
const AXIS_STEPS: usize = 24;

/// Which surface a triangle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Shell,
    Liquid,
}

impl Layer {
    fn ramp(self) -> &'static [char] {
        match self {
            Layer::Shell => SHELL_RAMP,
            Layer::Liquid => LIQUID_RAMP,
        }
    }
}

/// One depth-buffered character plane.
struct Plane {
    depth: Vec<f32>,
    chars: Vec<Option<char>>,
}

impl Plane {
    fn new(size: usize) -> Self {
        Self {
            depth: vec![f32::INFINITY; size],
            chars: vec![None; size],
        }
    }

    fn clear(&mut self) {
        self.depth.fill(f32::INFINITY);
        self.chars.fill(None);
    }

    fn plot(&mut self, idx: usize, depth: f32, character: char) {
        if depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.chars[idx] = Some(character);
        }
    }
}

/// ASCII renderer drawing a vessel shell and the liquid inside it.
///
/// Shell and liquid are rasterized into separate planes. When both
/// cover a cell the liquid wins, so the shell reads as translucent.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    shell: Plane,
    liquid: Plane,
    axes: Vec<Option<char>>,
    labels: Vec<(usize, usize, &'static str)>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            shell: Plane::new(size),
            liquid: Plane::new(size),
            axes: vec![None; size],
            labels: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.shell.clear();
        self.liquid.clear();
        self.axes.fill(None);
        self.labels.clear();
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, layer: Layer, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let mvp = Transform::mvp_matrix(model_matrix, &camera.view_matrix(), &camera.projection_matrix());
        let light = Vector3::new(-0.3, -1.0, 0.6).normalize();
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, layer, &mvp, model_matrix, &light, camera);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        layer: Layer,
        mvp: &Matrix4<f32>,
        model_matrix: &Matrix4<f32>,
        light: &Vector3<f32>,
        camera: &Camera,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_with(mvp, &vertex.position, self.width as u32, self.height as u32) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Both sides of the shell are visible, so shade two-sided
        let normal = model_matrix
            .transform_vector(&triangle.vertices[0].normal)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros);
        let brightness = normal.dot(light).abs();

        let ramp = layer.ramp();
        let char_index = ((brightness * (ramp.len() - 1) as f32).round() as usize).min(ramp.len() - 1);

        let plane = match layer {
            Layer::Shell => &mut self.shell,
            Layer::Liquid => &mut self.liquid,
        };
        rasterize_triangle(plane, self.width, self.height, &screen_coords, ramp[char_index]);
    }

    /// Draw the three coordinate axes from the tank's bottom center,
    /// labelled `X`, `Y` and `Height`.
    pub fn render_axes(&mut self, frustum: &Frustum, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let reach = (frustum.top_radius() * 1.25) as f32;
        let rise = (frustum.height() * 1.15) as f32;
        let axes = [
            (Point3::new(reach, 0.0, 0.0), "X"),
            (Point3::new(0.0, reach, 0.0), "Y"),
            (Point3::new(0.0, 0.0, rise), "Height"),
        ];

        let mvp = Transform::mvp_matrix(model_matrix, &camera.view_matrix(), &camera.projection_matrix());
        let (w, h) = (self.width as u32, self.height as u32);
        for (tip, label) in axes {
            for step in 0..=AXIS_STEPS {
                let t = step as f32 / AXIS_STEPS as f32;
                let p = Point3::from(tip.coords * t);
                if let Some((x, y, _)) = camera.project_with(&mvp, &p, w, h) {
                    if let Some(idx) = self.cell_index(x, y) {
                        self.axes[idx] = Some('.');
                    }
                }
            }
            if let Some((x, y, _)) = camera.project_with(&mvp, &tip, w, h) {
                if self.cell_index(x, y).is_some() {
                    self.labels.push((x as usize, y as usize, label));
                }
            }
        }
    }

    fn cell_index(&self, x: f32, y: f32) -> Option<usize> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (col, row) = (x as usize, y as usize);
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }

    /// Final character and color of a cell.
    pub fn cell(&self, col: usize, row: usize) -> (char, Color) {
        let idx = row * self.width + col;
        if let Some(c) = self.liquid.chars[idx] {
            let color = match c {
                '~' | '=' | '+' => Color::DarkBlue,
                '*' | '#' => Color::Blue,
                _ => Color::Cyan,
            };
            return (c, color);
        }
        if let Some(c) = self.shell.chars[idx] {
            let color = match c {
                '.' | ':' => Color::DarkGrey,
                _ => Color::Grey,
            };
            return (c, color);
        }
        if let Some(c) = self.axes[idx] {
            return (c, Color::DarkYellow);
        }
        (' ', Color::Reset)
    }

    /// Count of cells currently covered by a layer.
    pub fn coverage(&self, layer: Layer) -> usize {
        let plane = match layer {
            Layer::Shell => &self.shell,
            Layer::Liquid => &self.liquid,
        };
        plane.chars.iter().filter(|c| c.is_some()).count()
    }

    /// Write the frame starting at terminal row `origin_row`.
    pub fn draw<W: Write>(&self, writer: &mut W, origin_row: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, origin_row + y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let (c, color) = self.cell(x, y);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }

        writer.queue(SetForegroundColor(Color::Yellow))?;
        for &(x, y, label) in &self.labels {
            let room = self.width.saturating_sub(x);
            let text: String = label.chars().take(room).collect();
            writer.queue(cursor::MoveTo(x as u16, origin_row + y as u16))?;
            writer.queue(Print(text))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Scanline-fill a screen-space triangle into a plane.
fn rasterize_triangle(plane: &mut Plane, width: usize, height: usize, coords: &[(f32, f32, f32); 3], character: char) {
    let [v0, v1, v2] = *coords;

    // Bounding box
    let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
    let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
    let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
    let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

    // Clip to screen bounds
    let min_x = min_x.max(0);
    let max_x = max_x.min(width as i32 - 1);
    let min_y = min_y.max(0);
    let max_y = max_y.min(height as i32 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            if let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py)) {
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    plane.plot(y as usize * width + x as usize, depth, character);
                }
            }
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
