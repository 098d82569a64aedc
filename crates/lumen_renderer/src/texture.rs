//! Textures: color as a function of surface coordinates and position.

use std::path::Path;
use std::sync::Arc;

use crate::Color;
use lumen_core::Bitmap;
use lumen_math::{Interval, Vec3};

/// Returned by image textures whose bitmap failed to load.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// A color-valued function of `(u, v, p)`.
pub enum Texture {
    /// Constant color.
    Solid(Color),
    /// 3D checker pattern: `odd` where `sin(10x)sin(10y)sin(10z) < 0`, else `even`.
    Checker {
        odd: Arc<Texture>,
        even: Arc<Texture>,
    },
    /// Nearest-sample lookup into a decoded bitmap.
    Image(ImageTexture),
}

impl Texture {
    /// Checker pattern between two solid colors.
    pub fn checker(odd: Color, even: Color) -> Self {
        Texture::Checker {
            odd: Arc::new(Texture::Solid(odd)),
            even: Arc::new(Texture::Solid(even)),
        }
    }

    /// Evaluate the texture.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { odd, even } => {
                let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
            Texture::Image(image) => image.value(u, v),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

impl From<ImageTexture> for Texture {
    fn from(image: ImageTexture) -> Self {
        Texture::Image(image)
    }
}

/// Samples a bitmap at clamped UV coordinates, without filtering.
#[derive(Clone)]
pub struct ImageTexture {
    bitmap: Option<Arc<Bitmap>>,
}

impl ImageTexture {
    pub fn new(bitmap: Arc<Bitmap>) -> Self {
        Self {
            bitmap: Some(bitmap),
        }
    }

    /// A texture with no pixel data; every lookup yields [`MISSING_TEXTURE_COLOR`].
    pub fn missing() -> Self {
        Self { bitmap: None }
    }

    /// Decode `path`. A failure is logged and leaves the texture without data
    /// rather than aborting the render.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Bitmap::open(path) {
            Ok(bitmap) => Self::new(Arc::new(bitmap)),
            Err(e) => {
                log::warn!(
                    "Could not load texture image '{}': {}; using flat cyan",
                    path.display(),
                    e
                );
                Self::missing()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.bitmap.is_some()
    }

    pub fn value(&self, u: f32, v: f32) -> Color {
        let Some(bitmap) = &self.bitmap else {
            return MISSING_TEXTURE_COLOR;
        };
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return MISSING_TEXTURE_COLOR;
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Flip V: row 0 of the bitmap is the top
        let v = 1.0 - unit.clamp(v);

        // Coordinates of exactly 1.0 land one past the last pixel
        let i = ((u * bitmap.width() as f32) as u32).min(bitmap.width() - 1);
        let j = ((v * bitmap.height() as f32) as u32).min(bitmap.height() - 1);

        let [r, g, b] = bitmap.pixel(i, j);
        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_bitmap() -> Arc<Bitmap> {
        // top-left red, top-right green, bottom-left blue, bottom-right white
        #[rustfmt::skip]
        let data = vec![
            255, 0, 0,    0, 255, 0,
            0, 0, 255,    255, 255, 255,
        ];
        Arc::new(Bitmap::new(2, 2, data).unwrap())
    }

    #[test]
    fn test_solid_ignores_inputs() {
        let tex = Texture::Solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(tex.value(0.0, 0.0, Vec3::ZERO), Color::new(0.1, 0.2, 0.3));
        assert_eq!(
            tex.value(0.9, 0.1, Vec3::new(5.0, -2.0, 1.0)),
            Color::new(0.1, 0.2, 0.3)
        );
    }

    #[test]
    fn test_checker_selects_by_sign() {
        let odd = Color::new(1.0, 0.0, 0.0);
        let even = Color::new(0.0, 0.0, 1.0);
        let tex = Texture::checker(odd, even);

        // sin(1) * sin(1) * sin(-1) < 0
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.1, 0.1, -0.1)), odd);
        // sin(1)^3 > 0
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.1, 0.1, 0.1)), even);
        // Product of exactly zero belongs to `even`
        assert_eq!(tex.value(0.0, 0.0, Vec3::new(0.0, 0.1, -0.1)), even);
    }

    #[test]
    fn test_checker_ignores_uv_and_is_deterministic() {
        let tex = Texture::checker(Color::ZERO, Color::ONE);
        let p = Vec3::new(0.37, -1.2, 2.9);

        let first = tex.value(0.0, 0.0, p);
        for i in 0..10 {
            let uv = i as f32 / 10.0;
            assert_eq!(tex.value(uv, 1.0 - uv, p), first);
        }
    }

    #[test]
    fn test_checker_nests_textures() {
        let inner = Arc::new(Texture::checker(Color::X, Color::Y));
        let tex = Texture::Checker {
            odd: Arc::new(Texture::Solid(Color::ZERO)),
            even: inner,
        };
        assert_eq!(tex.value(0.0, 0.0, Vec3::splat(0.1)), Color::Y);
    }

    #[test]
    fn test_image_texture_corners() {
        let tex = ImageTexture::new(quad_bitmap());
        assert!(tex.is_loaded());

        // v = 1 is the top row
        assert_eq!(tex.value(0.0, 1.0), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(1.0, 1.0), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.0, 0.0), Color::new(0.0, 0.0, 1.0));
        assert_eq!(tex.value(1.0, 0.0), Color::ONE);
    }

    #[test]
    fn test_image_texture_clamps_uv() {
        let tex = ImageTexture::new(quad_bitmap());
        assert_eq!(tex.value(-3.0, 7.0), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(2.0, -1.0), Color::ONE);
    }

    #[test]
    fn test_missing_bitmap_is_cyan() {
        let tex: Texture = ImageTexture::missing().into();
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE_COLOR);
    }

    #[test]
    fn test_open_failure_falls_back() {
        let path = std::env::temp_dir().join("lumen_renderer_no_such_texture.png");
        let tex = ImageTexture::open(path);
        assert!(!tex.is_loaded());
        assert_eq!(tex.value(0.2, 0.8), MISSING_TEXTURE_COLOR);
    }
}
