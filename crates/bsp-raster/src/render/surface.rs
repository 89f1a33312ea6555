//! Writable pixel surfaces.

use crate::Color;

/// A 32-bit pixel buffer the rasterizer can draw into.
///
/// Pixel `(x, y)` lives at `y * stride() + x` in [`pixels_mut`](Self::pixels_mut).
/// Rows may be padded: `stride()` is at least `width()`.
pub trait PixelSurface {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Number of pixels between the starts of two consecutive rows.
    fn stride(&self) -> usize {
        self.width()
    }

    fn pixels_mut(&mut self) -> &mut [u32];

    /// Packs a color into this surface's pixel format.
    fn pack(&self, color: Color) -> u32;

    /// Fills every visible pixel with `color`, leaving row padding alone.
    fn clear(&mut self, color: Color) {
        let pixel = self.pack(color);
        let (width, height, stride) = (self.width(), self.height(), self.stride());
        if stride == 0 {
            return;
        }
        for row in self.pixels_mut().chunks_mut(stride).take(height) {
            let end = width.min(row.len());
            row[..end].fill(pixel);
        }
    }
}

/// Channel layout of a packed 32-bit pixel, most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// `0xAARRGGBB`.
    #[default]
    Argb8888,
    /// `0xAABBGGRR`: bytes are R, G, B, A in memory on little-endian targets.
    Abgr8888,
}

impl PixelFormat {
    /// Packs an opaque color.
    pub fn pack(self, color: Color) -> u32 {
        let [r, g, b] = color.to_rgb8().map(u32::from);
        match self {
            PixelFormat::Argb8888 => 0xFF00_0000 | (r << 16) | (g << 8) | b,
            PixelFormat::Abgr8888 => 0xFF00_0000 | (b << 16) | (g << 8) | r,
        }
    }

    /// Splits a packed pixel into `[r, g, b, a]`.
    pub fn unpack(self, pixel: u32) -> [u8; 4] {
        let [a, x, g, y] = pixel.to_be_bytes();
        match self {
            PixelFormat::Argb8888 => [x, g, y, a],
            PixelFormat::Abgr8888 => [y, g, x, a],
        }
    }
}

/// An owned, unpadded pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    pixels: Vec<u32>,
}

impl Framebuffer {
    /// Creates a buffer filled with opaque black.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            pixels: vec![format.pack(Color::BLACK); width * height],
        }
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Returns the packed pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Returns the pixel at `(x, y)` as `[r, g, b, a]`.
    pub fn rgba(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        self.pixel(x, y).map(|p| self.format.unpack(p))
    }

    /// Copies the buffer out as tightly packed RGBA bytes, row by row.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| self.format.unpack(p))
            .collect()
    }

    /// Resizes the buffer, discarding its contents.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width * height, self.format.pack(Color::BLACK));
    }
}

impl PixelSurface for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    fn pack(&self, color: Color) -> u32 {
        self.format.pack(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_formats() {
        let color = Color::new(1.0, 0.5, 0.0);
        assert_eq!(PixelFormat::Argb8888.pack(color), 0xFFFF_8000);
        assert_eq!(PixelFormat::Abgr8888.pack(color), 0xFF00_80FF);
    }

    #[test]
    fn abgr_is_rgba_bytes_on_little_endian() {
        let pixel = PixelFormat::Abgr8888.pack(Color::new(1.0, 0.5, 0.0));
        assert_eq!(pixel.to_le_bytes(), [255, 128, 0, 255]);
    }

    #[test]
    fn unpack_inverts_pack() {
        let color = Color::new(0.2, 0.4, 0.6);
        for format in [PixelFormat::Argb8888, PixelFormat::Abgr8888] {
            assert_eq!(format.unpack(format.pack(color)), [51, 102, 153, 255]);
        }
    }

    #[test]
    fn framebuffer_starts_black() {
        let buffer = Framebuffer::new(4, 3, PixelFormat::Argb8888);
        assert_eq!(buffer.pixels().len(), 12);
        assert_eq!(buffer.pixel(3, 2), Some(0xFF00_0000));
        assert_eq!(buffer.pixel(4, 0), None);
        assert_eq!(buffer.pixel(0, 3), None);
    }

    #[test]
    fn clear_and_export() {
        let mut buffer = Framebuffer::new(2, 1, PixelFormat::Abgr8888);
        buffer.clear(Color::WHITE);
        assert_eq!(buffer.rgba(1, 0), Some([255, 255, 255, 255]));
        assert_eq!(buffer.to_rgba8(), vec![255; 8]);
    }

    #[test]
    fn resize_discards_contents() {
        let mut buffer = Framebuffer::new(2, 2, PixelFormat::Argb8888);
        buffer.clear(Color::WHITE);
        buffer.resize(3, 1);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 1);
        assert!(buffer.pixels().iter().all(|&p| p == 0xFF00_0000));
    }
}
