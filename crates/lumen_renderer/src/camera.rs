//! Camera for ray generation.
//!
//! A thin-lens camera: rays start on a disk of radius `aperture / 2` around
//! `look_from` and pass through a film plane placed at the focus distance,
//! `|look_from - look_at|`.

use crate::sampling::random_in_unit_disk;
use crate::Ray;
use lumen_math::Vec3;
use rand::RngCore;

/// Placement and lens parameters for a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Lens diameter; 0 disables defocus blur
    pub aperture: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aperture: 0.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self
    }

    /// Build the camera for a film of the given width/height ratio.
    pub fn build(&self, aspect_ratio: f32) -> Camera {
        Camera::new(self, aspect_ratio)
    }
}

/// Camera for generating rays into the scene. Immutable once built.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    // Orthonormal basis: w points backward, u right, v up
    u: Vec3,
    v: Vec3,
    w: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    lower_left: Vec3,
    lens_radius: f32,
}

impl Camera {
    pub fn new(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        let theta = settings.vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = viewport_height * aspect_ratio;

        // Calculate camera basis vectors
        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.vup.cross(w).normalize();
        let v = w.cross(u);

        let focus_dist = (settings.look_from - settings.look_at).length();

        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left =
            settings.look_from - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        Self {
            origin: settings.look_from,
            u,
            v,
            w,
            horizontal,
            vertical,
            lower_left,
            lens_radius: settings.aperture / 2.0,
        }
    }

    /// Generate a ray through film coordinates in [0, 1] x [0, 1],
    /// (0, 0) being the bottom-left corner.
    pub fn get_ray(&self, film_x: f32, film_y: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let target = self.lower_left + film_x * self.horizontal + film_y * self.vertical;
        let ray_origin = self.origin + offset;

        Ray::new(ray_origin, target - ray_origin)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit vector pointing from the scene back toward the camera.
    pub fn backward(&self) -> Vec3 {
        self.w
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
