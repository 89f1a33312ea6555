//! Scanline rasterization of flat-colored triangles.

use nalgebra::Point2;

use super::surface::PixelSurface;

/// Two sorted vertices closer than this in `y` count as one flat edge.
const FLAT_EPSILON: f32 = 1e-4;

/// How a y-sorted triangle is split into scanline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// The two top vertices share a row.
    FlatTop,
    /// The two bottom vertices share a row.
    FlatBottom,
    /// Split at the middle vertex's scanline.
    General,
}

/// A triangle edge walked one scanline at a time.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x: f32,
    y: f32,
    /// Change of `x` per unit of `y`.
    slope: f32,
}

impl Edge {
    fn new(from: Point2<f32>, to: Point2<f32>) -> Self {
        let dy = to.y - from.y;
        let slope = if dy > 0.0 { (to.x - from.x) / dy } else { 0.0 };
        Self {
            x: from.x,
            y: from.y,
            slope,
        }
    }

    /// Edge `x` at scanline `y`, advanced from the start by the accumulated slope.
    #[inline]
    fn x_at(&self, y: f32) -> f32 {
        self.x + (y - self.y) * self.slope
    }
}

/// Fills a screen-space triangle with `pixel`.
///
/// Vertices are in pixel coordinates with `y` growing downwards. A pixel
/// `(x, y)` is covered when the row `y` lies in `[y_top, y_bottom)` and `x` in
/// the row's `[x_left, x_right)` span. Everything outside
/// `[0, width) x [0, height)` is clipped, including row padding, so the
/// vertices may lie arbitrarily far away. Triangles with a non-finite
/// coordinate are skipped.
pub fn fill_triangle<S: PixelSurface + ?Sized>(
    surface: &mut S,
    vertices: [Point2<f32>; 3],
    pixel: u32,
) {
    if vertices
        .iter()
        .any(|v| !v.x.is_finite() || !v.y.is_finite())
    {
        return;
    }

    let mut sorted = vertices;
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));
    let [a, b, c] = sorted;

    let shape = if b.y - a.y < FLAT_EPSILON {
        Shape::FlatTop
    } else if c.y - b.y < FLAT_EPSILON {
        Shape::FlatBottom
    } else {
        Shape::General
    };

    match shape {
        Shape::FlatTop => fill_rows(surface, a.y, c.y, Edge::new(a, c), Edge::new(b, c), pixel),
        Shape::FlatBottom => fill_rows(surface, a.y, c.y, Edge::new(a, b), Edge::new(a, c), pixel),
        Shape::General => {
            let long = Edge::new(a, c);
            fill_rows(surface, a.y, b.y, long, Edge::new(a, b), pixel);
            fill_rows(surface, b.y, c.y, long, Edge::new(b, c), pixel);
        }
    }
}

/// Fills the rows in `[y_top, y_bottom)` between two edges.
fn fill_rows<S: PixelSurface + ?Sized>(
    surface: &mut S,
    y_top: f32,
    y_bottom: f32,
    first: Edge,
    second: Edge,
    pixel: u32,
) {
    let (width, height, stride) = (surface.width(), surface.height(), surface.stride());

    // Saturating casts: negative values become 0.
    let start = y_top.max(0.0).ceil() as usize;
    let end = y_bottom.min(height as f32).ceil() as usize;
    if start >= end {
        return;
    }

    let mut x1 = first.x_at(start as f32);
    let mut x2 = second.x_at(start as f32);
    let pixels = surface.pixels_mut();

    for y in start..end.min(height) {
        let (left, right) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        if left < right {
            let x_start = left.max(0.0).ceil() as usize;
            let x_end = (right.min(width as f32).ceil() as usize).min(width);
            if x_start < x_end {
                let row = y * stride;
                if let Some(span) = pixels.get_mut(row + x_start..row + x_end) {
                    span.fill(pixel);
                }
            }
        }
        x1 += first.slope;
        x2 += second.slope;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{Framebuffer, PixelFormat};
    use crate::Color;

    const INK: u32 = 0xFFFF_FFFF;

    fn make_buffer(width: usize, height: usize) -> Framebuffer {
        Framebuffer::new(width, height, PixelFormat::Argb8888)
    }

    fn p(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    fn covered(buffer: &Framebuffer) -> usize {
        buffer.pixels().iter().filter(|&&px| px == INK).count()
    }

    #[test]
    fn fills_axis_aligned_right_triangle() {
        let mut buffer = make_buffer(10, 10);
        fill_triangle(&mut buffer, [p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.0)], INK);

        // Rows 0..4 with spans [0, 4 - y).
        assert_eq!(covered(&buffer), 4 + 3 + 2 + 1);
        assert_eq!(buffer.pixel(3, 0), Some(INK));
        assert_eq!(buffer.pixel(4, 0), Some(PixelFormat::Argb8888.pack(Color::BLACK)));
        assert_eq!(buffer.pixel(0, 3), Some(INK));
        assert_ne!(buffer.pixel(0, 4), Some(INK));
    }

    #[test]
    fn vertex_order_does_not_matter() {
        let tri = [p(1.0, 1.0), p(8.0, 3.0), p(3.0, 9.0)];
        let mut reference = make_buffer(10, 10);
        fill_triangle(&mut reference, tri, INK);

        for order in [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            let mut buffer = make_buffer(10, 10);
            fill_triangle(&mut buffer, order.map(|i| tri[i]), INK);
            assert_eq!(buffer, reference);
        }
        assert!(covered(&reference) > 0);
    }

    #[test]
    fn flat_bottom_triangle() {
        let mut buffer = make_buffer(10, 10);
        fill_triangle(&mut buffer, [p(5.0, 0.0), p(1.0, 8.0), p(9.0, 8.0)], INK);

        assert_eq!(buffer.pixel(5, 1), Some(INK));
        assert_eq!(buffer.pixel(2, 7), Some(INK));
        assert_ne!(buffer.pixel(5, 8), Some(INK));
        assert_ne!(buffer.pixel(0, 7), Some(INK));
    }

    #[test]
    fn zero_height_draws_nothing() {
        let mut buffer = make_buffer(10, 10);
        fill_triangle(&mut buffer, [p(0.0, 5.0), p(4.0, 5.0), p(9.0, 5.0)], INK);
        assert_eq!(covered(&buffer), 0);
    }

    #[test]
    fn non_finite_is_skipped() {
        let mut buffer = make_buffer(10, 10);
        fill_triangle(&mut buffer, [p(0.0, 0.0), p(f32::NAN, 5.0), p(9.0, 9.0)], INK);
        fill_triangle(&mut buffer, [p(0.0, 0.0), p(f32::INFINITY, 5.0), p(9.0, 9.0)], INK);
        assert_eq!(covered(&buffer), 0);
    }

    #[test]
    fn huge_triangle_covers_everything() {
        let mut buffer = make_buffer(8, 6);
        fill_triangle(
            &mut buffer,
            [p(-1e6, -1e6), p(1e6, -1e6), p(0.0, 1e6)],
            INK,
        );
        assert_eq!(covered(&buffer), 48);
    }

    #[test]
    fn offscreen_triangle_is_clipped_away() {
        let mut buffer = make_buffer(8, 6);
        fill_triangle(&mut buffer, [p(-50.0, -5.0), p(-10.0, 20.0), p(-30.0, 40.0)], INK);
        fill_triangle(&mut buffer, [p(0.0, 10.0), p(5.0, 20.0), p(8.0, 12.0)], INK);
        assert_eq!(covered(&buffer), 0);
    }
}
