//! Infinite plane primitive.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Interval, Vec3};

/// The plane of points `p` with `dot(normal, p) + d = 0`.
pub struct Plane {
    /// Unit normal
    normal: Vec3,
    /// Signed offset along the normal
    d: f32,
    material: Arc<Material>,
}

impl Plane {
    /// Create a plane from a unit normal and offset.
    pub fn new(normal: Vec3, d: f32, material: Arc<Material>) -> Self {
        Self {
            normal,
            d,
            material,
        }
    }

    /// Plane through `point` facing along `normal` (normalized here).
    pub fn through_point(point: Vec3, normal: Vec3, material: Arc<Material>) -> Self {
        let normal = normal.normalize();
        Self::new(normal, -normal.dot(point), material)
    }
}

impl Hittable for Plane {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());

        // Ray is parallel to the plane
        if denom == 0.0 {
            return None;
        }

        let t = (-self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, &self.material))
    }
}
