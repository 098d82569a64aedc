//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use lumen_math::{Color, Vec3};
use lumen_renderer::{
    CameraSettings, Dielectric, DiffuseLight, ImageTexture, Lambertian, Material, Metal, Plane,
    Sphere, Texture, Triangle, World,
};

/// Geometry plus the camera that frames it.
pub struct Scene {
    pub world: World,
    pub camera: CameraSettings,
}

fn shared(material: impl Into<Material>) -> Arc<Material> {
    Arc::new(material.into())
}

/// Three small spheres in front of a large metal and a large glass sphere,
/// with a few red spheres in the distance.
pub fn spheres(background: Color) -> Scene {
    let ground = shared(Lambertian::new(Color::new(0.52, 0.59, 0.68)));
    let center = shared(Lambertian::new(Color::new(0.7, 0.3, 0.3)));
    let left = shared(Metal::new(Color::new(0.8, 0.6, 0.2), 0.7));
    let right = shared(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3));
    let glass = shared(Dielectric::new(1.7));
    let mirror = shared(Metal::new(Color::new(0.2, 0.25, 0.7), 0.0));
    let red = shared(Lambertian::new(Color::new(0.9, 0.1, 0.1)));

    let mut world = World::new(background);
    world.add(Plane::new(Vec3::Y, 0.0, ground));
    world.add(Sphere::new(Vec3::new(2.5, 2.0, -3.0), 2.0, glass));
    world.add(Sphere::new(Vec3::new(-2.5, 2.0, -3.0), 2.0, mirror));
    for center in [
        Vec3::new(3.0, 0.5, -12.0),
        Vec3::new(7.0, 0.5, -20.0),
        Vec3::new(9.0, 0.5, -13.0),
    ] {
        world.add(Sphere::new(center, 0.5, red.clone()));
    }
    world.add(Sphere::new(Vec3::new(0.0, 0.5, -1.0), 0.5, center));
    world.add(Sphere::new(Vec3::new(-2.0, 0.5, 0.0), 0.5, left));
    world.add(Sphere::new(Vec3::new(1.0, 0.5, 0.7), 0.5, right));

    let camera = CameraSettings::default()
        .with_position(Vec3::new(0.0, 0.5, 1.5), Vec3::new(0.0, 0.5, -1.0), Vec3::Y)
        .with_lens(90.0, 0.2);

    Scene { world, camera }
}

/// An emissive sphere lighting a checker floor and a pair of triangles.
/// Ignores the configured background: the light is the only source.
pub fn lights() -> Scene {
    let floor = Arc::new(Texture::checker(
        Color::new(0.1, 0.1, 0.1),
        Color::new(0.8, 0.8, 0.8),
    ));
    let floor = shared(Lambertian::textured(floor));
    let panel = shared(Lambertian::new(Color::new(0.2, 0.6, 0.3)));
    let glass = shared(Dielectric::with_fresnel(1.5));
    let lamp = shared(DiffuseLight::new(Color::new(6.0, 5.5, 5.0)));

    let mut world = World::new(Color::splat(0.01));
    world.add(Plane::new(Vec3::Y, 0.0, floor));
    world.add(Sphere::new(Vec3::new(0.0, 3.0, -2.0), 0.75, lamp));
    world.add(Sphere::new(Vec3::new(1.2, 0.6, -1.0), 0.6, glass));

    // Two triangles forming an upright panel behind the glass sphere
    let (a, b) = (Vec3::new(-2.5, 0.0, -3.5), Vec3::new(0.5, 0.0, -3.5));
    let (c, d) = (Vec3::new(0.5, 2.0, -3.5), Vec3::new(-2.5, 2.0, -3.5));
    world.add(Triangle::new(a, b, c, panel.clone()));
    world.add(Triangle::new(a, c, d, panel));

    let camera = CameraSettings::default()
        .with_position(Vec3::new(0.0, 1.2, 3.0), Vec3::new(0.0, 1.0, -1.5), Vec3::Y)
        .with_lens(60.0, 0.0);

    Scene { world, camera }
}

/// A globe wrapped in `texture`, resting on a checker floor. Without a usable
/// image the globe renders flat cyan.
pub fn textured(background: Color, texture: Option<&Path>) -> Scene {
    let image = match texture {
        Some(path) => ImageTexture::open(path),
        None => {
            log::warn!("No --texture given; the globe will render as the missing-texture color");
            ImageTexture::missing()
        }
    };
    let globe = shared(Lambertian::textured(Arc::new(image.into())));

    let checker = Texture::Checker {
        odd: Arc::new(Texture::Solid(Color::new(0.2, 0.3, 0.1))),
        even: Arc::new(Texture::Solid(Color::splat(0.9))),
    };
    let floor = shared(Lambertian::textured(Arc::new(checker)));

    let mut world = World::new(background);
    world.add(Plane::through_point(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, floor));
    world.add(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 1.0, globe));

    let camera = CameraSettings::default()
        .with_position(Vec3::new(0.0, 0.5, 1.5), Vec3::new(0.0, 0.0, -2.0), Vec3::Y)
        .with_lens(50.0, 0.0);

    Scene { world, camera }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::{Interval, Ray};
    use lumen_renderer::{Hittable, Scatter, HIT_EPSILON, MISSING_TEXTURE_COLOR};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn forward() -> Interval {
        Interval::new(HIT_EPSILON, f32::INFINITY)
    }

    #[test]
    fn test_spheres_layout() {
        let scene = spheres(Color::new(0.5, 0.7, 1.0));
        assert_eq!(scene.world.len(), 9);
        assert_eq!(scene.world.background, Color::new(0.5, 0.7, 1.0));
        assert_eq!(scene.camera.vfov, 90.0);
        assert_eq!(scene.camera.aperture, 0.2);
    }

    #[test]
    fn test_spheres_camera_sees_center_sphere() {
        let scene = spheres(Color::ONE);
        let camera = CameraSettings {
            aperture: 0.0,
            ..scene.camera
        }
        .build(16.0 / 9.0);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        let rec = scene.world.hit(&ray, forward()).unwrap();
        // Front of the sphere at (0, 0.5, -1)
        assert!((rec.p - Vec3::new(0.0, 0.5, -0.5)).length() < 1e-3);
    }

    #[test]
    fn test_lights_has_emitter() {
        let scene = lights();
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Z);
        let rec = scene.world.hit(&ray, forward()).unwrap();
        assert!(rec.material.emitted(rec.u, rec.v, rec.p).x > 1.0);
    }

    #[test]
    fn test_textured_without_image_is_cyan() {
        let scene = textured(Color::ONE, None);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = scene.world.hit(&ray, forward()).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let scattered = rec.material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(scattered.attenuation, MISSING_TEXTURE_COLOR);
    }

    #[test]
    fn test_textured_bad_path_falls_back() {
        let path = std::env::temp_dir().join("lumen_scene_missing_texture.png");
        let scene = textured(Color::ONE, Some(&path));
        assert_eq!(scene.world.len(), 2);
    }
}
