//! The render target: a packed-RGBA pixel buffer.
//!
//! Pixels are stored row-major with row 0 at the *bottom* of the picture,
//! matching film coordinates where `y` grows upward. Encoders that expect
//! top-down rows must walk the buffer in reverse (see [`Image::rows_top_down`]).
//!
//! Each pixel is a `u32` with red in the highest byte, then green, then blue;
//! the lowest (alpha) byte is always zero.

use lumen_math::{Color, Interval};

/// Packed-RGBA render target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Image {
    /// Create a new image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, bottom row first.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the packed pixel at (x, y), with y = 0 the bottom row.
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    /// Set the packed pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, packed: u32) {
        let idx = self.index(x, y);
        self.pixels[idx] = packed;
    }

    /// Copy a rectangular block of packed pixels into the image.
    ///
    /// `block` is row-major with `block_width` pixels per row, its first row
    /// landing on image row `y_min`.
    pub fn blit(&mut self, x_min: u32, y_min: u32, block_width: u32, block: &[u32]) {
        if block_width == 0 {
            return;
        }
        debug_assert_eq!(block.len() % block_width as usize, 0);
        debug_assert!(x_min + block_width <= self.width);

        for (row, src) in block.chunks_exact(block_width as usize).enumerate() {
            let start = self.index(x_min, y_min + row as u32);
            self.pixels[start..start + src.len()].copy_from_slice(src);
        }
    }

    /// Rows in display order: top of the picture first.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[u32]> + '_ {
        // chunks_exact panics on a zero chunk size
        let row_len = (self.width as usize).max(1);
        self.pixels.chunks_exact(row_len).rev()
    }
}

/// Convert a display-ready color (already gamma corrected) to a packed pixel.
///
/// Channels are clamped to [0, 1] and scaled by 255.99 so that 1.0 maps to 255.
pub fn pack_rgba(color: Color) -> u32 {
    let unit = Interval::new(0.0, 1.0);
    let r = (unit.clamp(color.x) * 255.99) as u32;
    let g = (unit.clamp(color.y) * 255.99) as u32;
    let b = (unit.clamp(color.z) * 255.99) as u32;
    let a = 0;

    (r << 24) | (g << 16) | (b << 8) | a
}

/// Extract the 8-bit RGB channels of a packed pixel.
pub fn unpack_rgb(packed: u32) -> [u8; 3] {
    [
        ((packed >> 24) & 0xFF) as u8,
        ((packed >> 16) & 0xFF) as u8,
        ((packed >> 8) & 0xFF) as u8,
    ]
}
