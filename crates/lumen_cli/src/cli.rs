use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_core::RenderSettings;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Metal, glass and diffuse spheres on a ground plane
    Spheres,
    /// Emissive sphere and triangles over a checker floor
    Lights,
    /// A sphere wrapped in the image given by --texture
    Textured,
}

#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "A brute-force CPU path tracer")]
pub struct Args {
    /// JSON render settings; flags below override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Camera rays per pixel
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounces per camera ray
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Tile edge length in pixels
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Worker threads besides the coordinator (default: cores - 1)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Seed for reproducible renders
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value = "spheres")]
    pub scene: SceneKind,

    /// Image file for the textured scene
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Output image (.ppm or .png)
    #[arg(short, long, default_value = "output.ppm")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Overwrite the fields of `settings` given on the command line.
    pub fn apply(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            settings.ray_depth = depth;
        }
        if let Some(tile_size) = self.tile_size {
            settings.tile_size = tile_size;
        }
        if self.workers.is_some() {
            settings.workers = self.workers;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
    }
}
