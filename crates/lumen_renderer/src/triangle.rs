//! Triangle primitive for ray tracing.
//!
//! Intersects the triangle's supporting plane, then keeps the hit only if the
//! point lies on the inner side of all three edges.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Interval, Vec3};

/// A triangle primitive.
pub struct Triangle {
    /// Vertices, wound consistently; the face normal follows `(b - a) x (c - a)`
    a: Vec3,
    b: Vec3,
    c: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Arc<Material>,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, material: Arc<Material>) -> Self {
        // NaN for zero-area triangles, which then never report a hit
        let normal = (b - a).cross(c - a).normalize();

        Self {
            a,
            b,
            c,
            normal,
            material,
        }
    }

    /// Is `q`, a point on the supporting plane, inside or on the triangle?
    fn contains(&self, q: Vec3) -> bool {
        let n = self.normal;
        (self.b - self.a).cross(q - self.a).dot(n) >= 0.0
            && (q - self.a).cross(self.c - self.a).dot(n) >= 0.0
            && (self.c - self.b).cross(q - self.b).dot(n) >= 0.0
    }
}

impl Hittable for Triangle {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());

        // Ray is parallel to triangle
        if denom == 0.0 {
            return None;
        }

        let d = self.normal.dot(self.a);
        let t = (d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let q = ray.at(t);
        if !self.contains(q) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, &self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;

    fn triangle_at_z(z: f32) -> Triangle {
        // Counter-clockwise seen from +Z, so the normal faces +Z
        Triangle::new(
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(0.0, 1.0, z),
            Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)).into()),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = triangle_at_z(-1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.0).abs() < 0.001);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert_eq!((rec.u, rec.v), (0.0, 0.0));
    }

    #[test]
    fn test_triangle_miss() {
        let tri = triangle_at_z(-1.0);

        // Ray pointing away
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_outside_each_edge_misses() {
        let tri = triangle_at_z(-1.0);
        let interval = Interval::new(0.001, f32::INFINITY);

        for target in [
            Vec3::new(0.0, -1.5, -1.0), // below edge ab
            Vec3::new(-0.9, 0.5, -1.0), // left of edge ca
            Vec3::new(0.9, 0.5, -1.0),  // right of edge bc
        ] {
            let ray = Ray::new(Vec3::ZERO, target);
            assert!(tri.hit(&ray, interval).is_none(), "{target:?}");
        }
    }

    #[test]
    fn test_back_side_hit_flips_normal() {
        let tri = triangle_at_z(1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let tri = Triangle::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(2.0, 0.0, 0.0),
            Arc::new(Lambertian::new(Vec3::ONE).into()),
        );
        let ray = Ray::new(Vec3::new(0.5, 1.0, 0.0), Vec3::NEG_Y);
        assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
    }
}
