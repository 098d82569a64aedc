//! Decoded texture bitmaps.
//!
//! Image textures sample from a `Bitmap`: 8-bit RGB, three bytes per pixel,
//! rows stored top to bottom. Decoding is done here with the `image` crate so
//! the renderer only ever sees plain bytes.

use std::path::Path;

use thiserror::Error;

/// Bytes per pixel in a decoded bitmap.
pub const BYTES_PER_PIXEL: usize = 3;

/// Errors that can occur while decoding a bitmap.
#[derive(Error, Debug)]
pub enum BitmapError {
    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Bitmap data has {actual} bytes, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type BitmapResult<T> = Result<T, BitmapError>;

/// A decoded 8-bit RGB image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGB bytes, row-major, top row first.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> BitmapResult<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(BitmapError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode an image file of any format the `image` crate understands.
    pub fn open(path: impl AsRef<Path>) -> BitmapResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;
        let bitmap = Self::from_rgb(img.to_rgb8());

        log::debug!(
            "Decoded bitmap: {} ({}x{}, {:.1} KB)",
            path.display(),
            bitmap.width,
            bitmap.height,
            bitmap.size_bytes() as f32 / 1024.0
        );

        Ok(bitmap)
    }

    /// Decode an in-memory encoded image (PNG, JPEG, ...).
    pub fn from_memory(bytes: &[u8]) -> BitmapResult<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_rgb(img.to_rgb8()))
    }

    fn from_rgb(rgb: image::RgbImage) -> Self {
        let (width, height) = rgb.dimensions();
        Self {
            width,
            height,
            data: rgb.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes of the pixel at column `x`, row `y` (row 0 is the top).
    ///
    /// Panics if the coordinates are outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Size of the pixel data in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(Bitmap::new(2, 2, vec![0; 12]).is_ok());

        let err = Bitmap::new(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            BitmapError::SizeMismatch {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_pixel_is_row_major_top_down() {
        #[rustfmt::skip]
        let data = vec![
            255, 0, 0,    0, 255, 0,
            0, 0, 255,    10, 20, 30,
        ];
        let bitmap = Bitmap::new(2, 2, data).unwrap();

        assert_eq!(bitmap.pixel(0, 0), [255, 0, 0]);
        assert_eq!(bitmap.pixel(1, 0), [0, 255, 0]);
        assert_eq!(bitmap.pixel(0, 1), [0, 0, 255]);
        assert_eq!(bitmap.pixel(1, 1), [10, 20, 30]);
    }

    #[test]
    fn test_open_png_roundtrip() {
        let _ = env_logger::builder().is_test(true).try_init();

        let path = std::env::temp_dir().join("lumen_core_bitmap_open.png");
        let mut img = image::RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([1, 2, 3]));
        img.save(&path).unwrap();

        let bitmap = Bitmap::open(&path).unwrap();
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.height(), 2);
        assert_eq!(bitmap.pixel(2, 1), [1, 2, 3]);
        assert_eq!(bitmap.pixel(0, 0), [0, 0, 0]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let path = std::env::temp_dir().join("lumen_core_definitely_missing.png");
        assert!(Bitmap::open(path).is_err());
    }

    #[test]
    fn test_from_memory_rejects_garbage() {
        assert!(matches!(
            Bitmap::from_memory(b"not an image"),
            Err(BitmapError::Decode(_))
        ));
    }
}
