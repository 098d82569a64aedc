//! The scene: an ordered list of geometry plus background radiance.

use crate::{Color, Geometry, HitRecord, Hittable, Ray};
use lumen_math::Interval;

/// Everything a ray can hit.
///
/// Objects are scanned linearly in insertion order; on exactly equal `t`
/// the earlier object wins.
pub struct World {
    /// Radiance returned by rays that escape the scene
    pub background: Color,
    objects: Vec<Geometry>,
}

impl World {
    /// Create an empty world.
    pub fn new(background: Color) -> Self {
        Self {
            background,
            objects: Vec::new(),
        }
    }

    /// Add an object to the world.
    pub fn add(&mut self, object: impl Into<Geometry>) {
        self.objects.push(object.into());
    }

    pub fn objects(&self) -> &[Geometry] {
        &self.objects
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the world is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for World {
    /// Closest hit across all objects.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
