//! Property-based bounds tests for the scanline rasterizer.
//!
//! 1. Never writes to row padding or past the last row, wherever the vertices are
//! 2. Never panics on non-finite input
//! 3. Vertex order does not change the result

use bsp_raster::render::fill_triangle;
use bsp_raster::{Color, PixelSurface};
use nalgebra::Point2;
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

const SENTINEL: u32 = 0xDEAD_BEEF;
const INK: u32 = 0x0000_0001;
const PAD: usize = 3;
const EXTRA_ROWS: usize = 2;

/// A surface whose buffer is wider and taller than its visible area.
struct PaddedSurface {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl PaddedSurface {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![SENTINEL; (width + PAD) * (height + EXTRA_ROWS)],
        }
    }

    fn is_visible(&self, index: usize) -> bool {
        let (x, y) = (index % self.stride(), index / self.stride());
        x < self.width && y < self.height
    }
}

impl PixelSurface for PaddedSurface {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn stride(&self) -> usize {
        self.width + PAD
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    fn pack(&self, _color: Color) -> u32 {
        INK
    }
}

fn arb_coord() -> impl Strategy<Value = f32> {
    prop_oneof![
        4 => -50.0f32..150.0,
        1 => -1e7f32..1e7,
        1 => prop::num::f32::NORMAL,
    ]
}

fn arb_vertex() -> impl Strategy<Value = Point2<f32>> {
    (arb_coord(), arb_coord()).prop_map(|(x, y)| Point2::new(x, y))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn never_writes_outside_surface(
        width in 1usize..64,
        height in 1usize..64,
        a in arb_vertex(),
        b in arb_vertex(),
        c in arb_vertex(),
    ) {
        let mut surface = PaddedSurface::new(width, height);
        fill_triangle(&mut surface, [a, b, c], INK);

        for (index, &pixel) in surface.pixels.iter().enumerate() {
            if !surface.is_visible(index) {
                prop_assert_eq!(pixel, SENTINEL, "pixel {} outside the surface was written", index);
            } else {
                prop_assert!(pixel == SENTINEL || pixel == INK);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Non-finite input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn non_finite_vertices_are_ignored(
        a in arb_vertex(),
        b in arb_vertex(),
        bad in prop_oneof![Just(f32::NAN), Just(f32::INFINITY), Just(f32::NEG_INFINITY)],
        slot in 0usize..3,
    ) {
        let mut vertices = [a, b, Point2::new(0.0, 0.0)];
        vertices[slot] = Point2::new(bad, 10.0);

        let mut surface = PaddedSurface::new(16, 16);
        fill_triangle(&mut surface, vertices, INK);
        prop_assert!(surface.pixels.iter().all(|&p| p == SENTINEL));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Order independence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn vertex_order_is_irrelevant(
        a in (0.0f32..32.0, 0.0f32..32.0),
        b in (0.0f32..32.0, 0.0f32..32.0),
        c in (0.0f32..32.0, 0.0f32..32.0),
    ) {
        // Distinct rows keep the sort unambiguous.
        prop_assume!(a.1 != b.1 && b.1 != c.1 && a.1 != c.1);
        let [a, b, c] = [a, b, c].map(|(x, y)| Point2::new(x, y));

        let mut first = PaddedSurface::new(32, 32);
        fill_triangle(&mut first, [a, b, c], INK);
        let mut second = PaddedSurface::new(32, 32);
        fill_triangle(&mut second, [c, a, b], INK);

        prop_assert!(first.pixels == second.pixels);
    }
}
