/// Half-block pixel canvas for terminal rendering
///
/// Each terminal cell shows two vertically stacked pixels using the upper
/// half-block glyph: foreground is the top pixel, background the bottom one.
/// There is no depth buffer; later draws simply overwrite earlier ones.
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use orbit3d_core::{ProjectedTriangle, Rgb};
use std::io::Write;

const HALF_BLOCK: char = '▀';

/// Pixel buffer drawn in submission order
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Canvas {
    /// `rows` terminal rows hold `2 * rows` pixels.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize, rows as usize * 2)
    }

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = color;
    }

    /// Fill the faces of already depth-sorted rows, then stroke the edges whose
    /// flag is set when `wire` is given.
    pub fn draw_triangles(&mut self, rows: &[ProjectedTriangle], wire: Option<Rgb>) {
        for row in rows {
            let [a, b, c] = row.points.map(|p| (p.x, p.y));
            self.fill_triangle([a, b, c], row.color);

            if let Some(wire_color) = wire {
                let corners = [a, b, c];
                for (i, visible) in row.edge_flags.iter().enumerate() {
                    if *visible {
                        let (from, to) = (corners[i], corners[(i + 1) % 3]);
                        self.draw_line(from, to, wire_color);
                    }
                }
            }
        }
    }

    /// Bounding-box fill; accepts either winding.
    pub fn fill_triangle(&mut self, coords: [(f32, f32); 3], color: Rgb) {
        let [v0, v1, v2] = coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to canvas bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                        || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                    if inside {
                        self.set_pixel(x, y, color);
                    }
                }
            }
        }
    }

    /// Bresenham line between two pixel positions.
    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb) {
        let Some((x0, y0, x1, y1)) = self.clip_endpoints(from, to) else {
            return;
        };
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Line drawn with a square brush `thickness` pixels wide.
    pub fn draw_thick_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: i32, color: Rgb) {
        if thickness <= 1 {
            self.draw_line(from, to, color);
            return;
        }
        let lo = -(thickness / 2);
        let hi = lo + thickness;
        for ox in lo..hi {
            for oy in lo..hi {
                let offset = |(x, y): (f32, f32)| (x + ox as f32, y + oy as f32);
                self.draw_line(offset(from), offset(to), color);
            }
        }
    }

    /// Rounds endpoints to pixels; rejects lines whose endpoints are wildly
    /// off-canvas so a degenerate projection cannot stall the loop.
    fn clip_endpoints(&self, from: (f32, f32), to: (f32, f32)) -> Option<(i32, i32, i32, i32)> {
        let limit = 4.0 * (self.width.max(self.height) as f32 + 1.0);
        let ok = |v: f32| v.is_finite() && v.abs() <= limit;
        if !(ok(from.0) && ok(from.1) && ok(to.0) && ok(to.1)) {
            return None;
        }
        Some((
            from.0.round() as i32,
            from.1.round() as i32,
            to.0.round() as i32,
            to.1.round() as i32,
        ))
    }

    /// Queue the whole canvas starting at the top-left cell.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Rgb, Rgb)> = None;

        for row in 0..self.height / 2 {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for x in 0..self.width {
                let top = self.pixels[(row * 2) * self.width + x];
                let bottom = self.pixels[(row * 2 + 1) * self.width + x];

                if current != Some((top, bottom)) {
                    writer.queue(SetForegroundColor(to_color(top)))?;
                    writer.queue(SetBackgroundColor(to_color(bottom)))?;
                    current = Some((top, bottom));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
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
