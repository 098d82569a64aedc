//! Image output.
//!
//! Writes a rendered [`Image`] as plain-text PPM (`P3`) or as an 8-bit PNG.
//! Both encoders emit rows top to bottom, reversing the film's storage order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::film::{unpack_rgb, Image};

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Unsupported output format '{0}' (expected .ppm or .png)")]
    UnsupportedFormat(String),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Write `image` as a plain-text PPM.
///
/// Header `P3\n<width> <height>\n255\n`, then one `r g b` line per pixel.
pub fn write_ppm<W: Write>(image: &Image, mut writer: W) -> OutputResult<()> {
    write!(writer, "P3\n{} {}\n255\n", image.width(), image.height())?;

    for row in image.rows_top_down() {
        for &packed in row {
            let [r, g, b] = unpack_rgb(packed);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write `image` as a plain-text PPM file.
pub fn save_ppm(image: &Image, path: impl AsRef<Path>) -> OutputResult<()> {
    let file = File::create(path)?;
    write_ppm(image, BufWriter::new(file))
}

/// Flatten the image into top-down RGB bytes.
pub fn to_rgb_bytes(image: &Image) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(image.pixels().len() * 3);
    for row in image.rows_top_down() {
        for &packed in row {
            bytes.extend_from_slice(&unpack_rgb(packed));
        }
    }
    bytes
}

/// Write `image` as an 8-bit RGB PNG file.
pub fn save_png(image: &Image, path: impl AsRef<Path>) -> OutputResult<()> {
    image::save_buffer(
        path,
        &to_rgb_bytes(image),
        image.width(),
        image.height(),
        image::ColorType::Rgb8,
    )?;
    Ok(())
}

/// Write `image`, choosing the encoder from the file extension.
pub fn save(image: &Image, path: impl AsRef<Path>) -> OutputResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => save_ppm(image, path),
        "png" => save_png(image, path),
        _ => Err(OutputError::UnsupportedFormat(extension)),
    }?;

    log::info!(
        "Wrote {}x{} image to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}
