//! Lumen Core - the I/O boundary around the path tracer.
//!
//! This crate provides:
//!
//! - **Film**: `Image`, the packed-RGBA pixel buffer the renderer fills
//! - **Bitmaps**: decoded 8-bit RGB texture data (`Bitmap`)
//! - **Output**: plain-text PPM and PNG encoders
//! - **Config**: `RenderSettings`, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{output, Image, RenderSettings};
//!
//! let settings = RenderSettings::from_json_file("render.json")?;
//! let image = Image::new(settings.width, settings.height);
//! output::save(&image, "out.ppm")?;
//! ```

pub mod bitmap;
pub mod config;
pub mod film;
pub mod output;

// Re-export commonly used types
pub use bitmap::{Bitmap, BitmapError};
pub use config::{ConfigError, RenderSettings};
pub use film::{pack_rgba, unpack_rgb, Image};
pub use output::OutputError;
