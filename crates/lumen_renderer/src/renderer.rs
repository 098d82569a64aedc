//! Core path tracing estimator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::{Color, Hittable, Ray, RenderContext, Scatter, World};
use lumen_core::pack_rgba;
use lumen_math::Interval;
use rand::RngCore;

use crate::sampling::gen_f32;

/// Lower bound of every hit query, keeping bounced rays from re-hitting
/// the surface they just left.
pub const HIT_EPSILON: f32 = 0.0001;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn trace(world: &World, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut bounces = 0;
    trace_counted(world, ray, depth, rng, &mut bounces)
}

/// [`trace`], also counting the hit queries made along the path.
pub(crate) fn trace_counted(
    world: &World,
    ray: &Ray,
    depth: u32,
    rng: &mut dyn RngCore,
    bounces: &mut u64,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    *bounces += 1;
    let Some(rec) = world.hit(ray, Interval::new(HIT_EPSILON, f32::INFINITY)) else {
        return world.background;
    };

    // Get emission from material (for lights)
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let incoming = trace_counted(world, &result.scattered, depth - 1, rng, bounces);
            emission + result.attenuation * incoming
        }
        // Ray was absorbed - just return emission
        None => emission,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn gamma_correct(color: Color) -> Color {
    Color::new(
        linear_to_gamma(color.x),
        linear_to_gamma(color.y),
        linear_to_gamma(color.z),
    )
}

#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma correct a linear color and pack it for the film.
pub fn color_to_packed(color: Color) -> u32 {
    pack_rgba(gamma_correct(color))
}

/// Render a single pixel with multi-sampling, returning the linear average.
///
/// `(x, y)` are pixel coordinates with y = 0 the bottom row; each sample
/// jitters uniformly inside the pixel.
pub fn render_pixel(
    ctx: &RenderContext<'_>,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
    bounces: &mut u64,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..ctx.samples_per_pixel {
        let film_x = (x as f32 + gen_f32(rng)) / ctx.width as f32;
        let film_y = (y as f32 + gen_f32(rng)) / ctx.height as f32;

        let ray = ctx.camera.get_ray(film_x, film_y, rng);
        pixel_color += trace_counted(ctx.world, &ray, ctx.ray_depth, rng, bounces);
    }

    // Average the samples
    pixel_color / ctx.samples_per_pixel as f32
}
