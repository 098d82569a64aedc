//! Lumen Renderer - CPU Path Tracing
//!
//! A brute-force Monte Carlo path tracer:
//! - Planes, spheres and triangles scanned linearly per ray
//! - Lambertian, metal, dielectric and emissive materials
//! - Solid, checker and bitmap textures
//! - Tiles claimed from a lock-free job queue by a fixed worker pool

mod camera;
mod hittable;
mod material;
mod plane;
mod renderer;
mod sampling;
mod scheduler;
mod sphere;
mod texture;
mod tile;
mod triangle;
mod world;

pub use camera::{Camera, CameraSettings};
pub use hittable::{Geometry, HitRecord, Hittable};
pub use material::{Dielectric, DiffuseLight, Lambertian, Material, Metal, Scatter, ScatterResult};
pub use plane::Plane;
pub use renderer::{color_to_packed, gamma_correct, render_pixel, trace, HIT_EPSILON};
pub use sampling::{gen_f32, random_in_unit_ball, random_in_unit_disk, random_unit_vector};
pub use scheduler::{render, run, JobQueue, RenderContext, RenderStats};
pub use sphere::Sphere;
pub use texture::{ImageTexture, Texture, MISSING_TEXTURE_COLOR};
pub use tile::{generate_jobs, Job};
pub use triangle::Triangle;
pub use world::World;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Color, Interval, Ray, Vec3};
