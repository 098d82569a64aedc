//! Math primitives for lumen.
//!
//! `Vec3` from glam carries points, directions and linear RGB colors alike.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Linear RGB color, one float per channel.
pub type Color = Vec3;
