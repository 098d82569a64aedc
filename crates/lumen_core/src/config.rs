//! Render configuration.
//!
//! `RenderSettings` holds the tunables the tile scheduler consumes. It can be
//! loaded from a JSON file; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating render settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// Tunables for a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Camera rays averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per camera ray
    pub ray_depth: u32,
    /// Edge length of the square tiles handed to workers
    pub tile_size: u32,
    /// Worker threads besides the coordinating thread (None = cores - 1)
    pub workers: Option<usize>,
    /// Base seed for per-tile random streams (None = from entropy)
    pub seed: Option<u64>,
    /// Radiance returned by rays that escape the scene
    pub background: [f32; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        let width = 1024;
        Self {
            width,
            height: (width as f32 / (16.0 / 9.0)) as u32,
            samples_per_pixel: 128,
            ray_depth: 8,
            tile_size: DEFAULT_TILE_SIZE,
            workers: None,
            seed: None,
            background: [0.5, 0.7, 1.0],
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON string.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::debug!("Loaded render settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the scheduler cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::Invalid(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid("tile_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Worker thread count: the configured value, or available parallelism
    /// minus one since the coordinating thread renders too.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(0)
        })
    }
}
