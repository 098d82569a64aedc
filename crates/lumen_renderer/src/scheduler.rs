//! Tile scheduler.
//!
//! Tiles are claimed from a [`JobQueue`] with a single atomic
//! fetch-and-increment, so every tile goes to exactly one thread. A fixed
//! pool of workers and the coordinating thread all run the same claim/render
//! loop; the coordinator additionally polls for completion and reports
//! progress.
//!
//! Each claimed tile is rendered into its own buffer and parked in a
//! write-once slot owned by the queue. Tiles never share pixels, so the
//! image is assembled after the pool drains without any locking.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;

use lumen_core::{Image, RenderSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::renderer::{color_to_packed, render_pixel};
use crate::tile::{generate_jobs, Job};
use crate::{Camera, World};

/// Shared work list plus the counters workers update.
pub struct JobQueue {
    jobs: Vec<Job>,
    tiles: Vec<OnceLock<Vec<u32>>>,
    next_job: AtomicUsize,
    finished_jobs: AtomicUsize,
    total_bounces: AtomicU64,
}

impl JobQueue {
    pub fn new(jobs: Vec<Job>) -> Self {
        let tiles = jobs.iter().map(|_| OnceLock::new()).collect();
        Self {
            jobs,
            tiles,
            next_job: AtomicUsize::new(0),
            finished_jobs: AtomicUsize::new(0),
            total_bounces: AtomicU64::new(0),
        }
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Claim the next unclaimed job, or `None` once the queue is exhausted.
    pub fn claim(&self) -> Option<(usize, Job)> {
        let index = self.next_job.fetch_add(1, Ordering::Relaxed);
        self.jobs.get(index).map(|job| (index, *job))
    }

    /// Hand in the packed pixels of a claimed job.
    pub fn complete(&self, index: usize, pixels: Vec<u32>, bounces: u64) {
        debug_assert_eq!(pixels.len(), self.jobs[index].pixel_count() as usize);
        if self.tiles[index].set(pixels).is_err() {
            log::error!("Tile {} completed twice; keeping the first result", index);
            return;
        }

        self.total_bounces.fetch_add(bounces, Ordering::Relaxed);
        self.finished_jobs.fetch_add(1, Ordering::Release);
    }

    pub fn finished_jobs(&self) -> usize {
        self.finished_jobs.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.finished_jobs() >= self.jobs.len()
    }

    pub fn total_bounces(&self) -> u64 {
        self.total_bounces.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> RenderStats {
        RenderStats {
            jobs: self.jobs.len(),
            finished_jobs: self.finished_jobs(),
            total_bounces: self.total_bounces(),
            pixels: self
                .tiles
                .iter()
                .filter_map(OnceLock::get)
                .map(|tile| tile.len() as u64)
                .sum(),
        }
    }

    /// Stitch the finished tiles into an image. Unfinished tiles stay black.
    pub fn into_image(self, width: u32, height: u32) -> Image {
        let mut image = Image::new(width, height);
        for (job, tile) in self.jobs.iter().zip(self.tiles) {
            if let Some(pixels) = tile.into_inner() {
                image.blit(job.x_min, job.y_min, job.width(), &pixels);
            }
        }
        image
    }
}

/// Diagnostics gathered during a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub jobs: usize,
    pub finished_jobs: usize,
    /// Hit queries made across all paths
    pub total_bounces: u64,
    /// Pixels written by workers
    pub pixels: u64,
}

/// Read-only state every worker renders against.
pub struct RenderContext<'a> {
    pub world: &'a World,
    pub camera: &'a Camera,
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub ray_depth: u32,
    /// Base of the per-tile random streams
    pub seed: u64,
}

impl<'a> RenderContext<'a> {
    pub fn new(world: &'a World, camera: &'a Camera, settings: &RenderSettings) -> Self {
        Self {
            world,
            camera,
            width: settings.width,
            height: settings.height,
            samples_per_pixel: settings.samples_per_pixel,
            ray_depth: settings.ray_depth,
            seed: settings.seed.unwrap_or_else(rand::random),
        }
    }

    /// Random stream for a tile; depends only on the base seed and the tile.
    fn job_rng(&self, index: usize) -> StdRng {
        let stream = (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(self.seed ^ stream)
    }

    /// Render one tile, returning its packed pixels (row-major, bottom row
    /// first) and the number of hit queries made.
    pub fn render_job(&self, index: usize, job: &Job) -> (Vec<u32>, u64) {
        let mut rng = self.job_rng(index);
        let mut bounces = 0;
        let mut pixels = Vec::with_capacity(job.pixel_count() as usize);

        for y in job.y_min..job.y_max {
            for x in job.x_min..job.x_max {
                let color = render_pixel(self, x, y, &mut rng, &mut bounces);
                pixels.push(color_to_packed(color));
            }
        }

        (pixels, bounces)
    }
}

/// Claim and render one job. Returns false once the queue is exhausted.
fn render_next(queue: &JobQueue, ctx: &RenderContext<'_>) -> bool {
    let Some((index, job)) = queue.claim() else {
        return false;
    };

    let (pixels, bounces) = ctx.render_job(index, &job);
    queue.complete(index, pixels, bounces);
    log::trace!("Finished tile {} ({:?})", index, job);
    true
}

/// Decrements the live-worker count when a pool task ends, even by panic.
struct Retire<'a>(&'a AtomicUsize);

impl Drop for Retire<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Release);
    }
}

/// Work on the queue from the calling thread until every job has finished,
/// logging progress in 10% steps.
///
/// `work` claims and renders one job, returning false once nothing is left
/// to claim. Once the queue is drained and no worker is alive, unfinished
/// tiles can never complete, so the loop gives up instead of spinning.
fn coordinate(queue: &JobQueue, live_workers: &AtomicUsize, work: &(dyn Fn() -> bool + Sync)) {
    let total = queue.len().max(1);
    let mut reported = 0;

    while !queue.is_finished() {
        if !work() {
            if live_workers.load(Ordering::Acquire) == 0 {
                if !queue.is_finished() {
                    log::error!(
                        "{} of {} tiles were never finished",
                        queue.len() - queue.finished_jobs(),
                        queue.len()
                    );
                }
                break;
            }
            // Nothing left to claim; wait for the workers' last tiles
            std::thread::yield_now();
        }

        let decile = queue.finished_jobs() * 10 / total;
        if decile > reported {
            reported = decile;
            log::info!("Rendering {}%", decile * 10);
        }
    }
}

/// Run `work` on `workers` pool threads plus the calling thread until the
/// queue is done. A panic in any of them is re-raised here.
fn drain(queue: &JobQueue, workers: usize, work: &(dyn Fn() -> bool + Sync)) {
    let live_workers = AtomicUsize::new(0);
    if workers == 0 {
        coordinate(queue, &live_workers, work);
        return;
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("lumen-worker-{}", i))
        .build();

    match pool {
        Ok(pool) => pool.in_place_scope(|scope| {
            live_workers.store(workers, Ordering::Release);
            let live = &live_workers;
            for _ in 0..workers {
                scope.spawn(move |_| {
                    let _retire = Retire(live);
                    while work() {}
                });
            }
            coordinate(queue, live, work);
        }),
        Err(e) => {
            log::warn!("Could not start worker pool ({}); rendering on one thread", e);
            coordinate(queue, &live_workers, work);
        }
    }
}

/// Drain `queue` with `workers` pool threads plus the calling thread.
pub fn run(queue: &JobQueue, ctx: &RenderContext<'_>, workers: usize) {
    drain(queue, workers, &|| render_next(queue, ctx));
}

/// Render `world` as seen by `camera` into a new image.
pub fn render(world: &World, camera: &Camera, settings: &RenderSettings) -> (Image, RenderStats) {
    let ctx = RenderContext::new(world, camera, settings);
    let queue = JobQueue::new(generate_jobs(settings.width, settings.height, settings.tile_size));
    let workers = settings.worker_count();

    log::info!(
        "Rendering {}x{}: {} samples per pixel, ray depth {}",
        settings.width,
        settings.height,
        settings.samples_per_pixel,
        settings.ray_depth
    );
    log::info!(
        "{} tiles of up to {}x{} px, {} workers + coordinator",
        queue.len(),
        settings.tile_size,
        settings.tile_size,
        workers
    );
    log::debug!("Base seed {:#018x}", ctx.seed);

    run(&queue, &ctx, workers);

    let stats = queue.stats();
    (queue.into_image(settings.width, settings.height), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CameraSettings, Color, DiffuseLight, Hittable, Interval, Lambertian, Material, Ray, Sphere,
        Vec3, HIT_EPSILON,
    };
    use std::sync::Arc;

    fn settings(width: u32, height: u32, samples: u32, workers: usize) -> RenderSettings {
        RenderSettings {
            width,
            height,
            samples_per_pixel: samples,
            ray_depth: 4,
            tile_size: 8,
            workers: Some(workers),
            seed: Some(1234),
            background: [0.5, 0.7, 1.0],
        }
    }

    fn unit_sphere_scene(material: Material) -> World {
        let mut world = World::new(Color::new(0.5, 0.7, 1.0));
        world.add(Sphere::new(Vec3::ZERO, 1.0, Arc::new(material)));
        world
    }

    fn camera_down_z(aspect: f32) -> Camera {
        CameraSettings::default()
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0)
            .build(aspect)
    }

    #[test]
    fn test_claim_exactly_once_across_threads() {
        let count = 1000;
        let jobs = (0..count).map(|i| Job::new(i, i + 1, 0, 1)).collect();
        let queue = JobQueue::new(jobs);

        let mut claimed: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        let mut mine = Vec::new();
                        while let Some((index, job)) = queue.claim() {
                            assert_eq!(job.x_min as usize, index);
                            mine.push(index);
                        }
                        mine
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        claimed.sort_unstable();
        assert_eq!(claimed, (0..count as usize).collect::<Vec<_>>());
        assert!(queue.claim().is_none());
    }

    #[test]
    fn test_complete_updates_counters() {
        let queue = JobQueue::new(vec![Job::new(0, 2, 0, 1), Job::new(2, 4, 0, 1)]);
        assert!(!queue.is_finished());

        let (index, _) = queue.claim().unwrap();
        queue.complete(index, vec![1, 2], 10);
        assert_eq!(queue.finished_jobs(), 1);

        let (index, _) = queue.claim().unwrap();
        queue.complete(index, vec![3, 4], 5);
        assert!(queue.is_finished());
        assert!(queue.claim().is_none());

        let stats = queue.stats();
        assert_eq!(stats.total_bounces, 15);
        assert_eq!(stats.pixels, 4);

        let image = queue.into_image(4, 1);
        assert_eq!(image.pixels(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_queue_is_finished() {
        let queue = JobQueue::new(Vec::new());
        assert!(queue.is_empty());
        assert!(queue.is_finished());
        assert!(queue.claim().is_none());
    }

    #[test]
    fn test_failed_tile_propagates_instead_of_hanging() {
        let queue = JobQueue::new((0..64).map(|i| Job::new(i, i + 1, 0, 1)).collect());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            drain(&queue, 3, &|| match queue.claim() {
                Some((10, _)) => panic!("tile 10 failed"),
                Some((index, _)) => {
                    queue.complete(index, vec![0], 1);
                    true
                }
                None => false,
            })
        }));

        assert!(result.is_err());
        assert_eq!(queue.finished_jobs(), 63);
        assert!(!queue.is_finished());
    }

    #[test]
    fn test_drain_without_pool_finishes_everything() {
        let queue = JobQueue::new((0..20).map(|i| Job::new(i, i + 1, 0, 1)).collect());

        drain(&queue, 0, &|| match queue.claim() {
            Some((index, _)) => {
                queue.complete(index, vec![index as u32], 2);
                true
            }
            None => false,
        });

        assert!(queue.is_finished());
        assert_eq!(queue.total_bounces(), 40);
    }

    #[test]
    fn test_every_pixel_rendered_once() {
        let world = World::new(Color::ONE);
        let camera = camera_down_z(37.0 / 23.0);

        for workers in [0, 1, 3] {
            let (image, stats) = render(&world, &camera, &settings(37, 23, 1, workers));
            assert_eq!(stats.jobs, 5 * 3);
            assert_eq!(stats.finished_jobs, stats.jobs);
            assert_eq!(stats.pixels, 37 * 23);
            assert_eq!(image.pixels().len(), 37 * 23);
        }
    }

    #[test]
    fn test_empty_world_renders_background() {
        let world = World::new(Color::new(0.5, 0.7, 1.0));
        let camera = camera_down_z(1.0);
        let expected = color_to_packed(Color::new(0.5, 0.7, 1.0));

        for samples in [1, 3, 8] {
            let (image, _) = render(&world, &camera, &settings(16, 16, samples, 2));
            assert!(image.pixels().iter().all(|&p| p == expected));
        }
    }

    #[test]
    fn test_fixed_seed_is_reproducible_across_worker_counts() {
        let world = unit_sphere_scene(Lambertian::new(Color::new(0.6, 0.4, 0.2)).into());
        let camera = camera_down_z(1.5);

        let (single, _) = render(&world, &camera, &settings(24, 16, 4, 0));
        let (pooled, _) = render(&world, &camera, &settings(24, 16, 4, 3));
        assert_eq!(single, pooled);
    }

    #[test]
    fn test_central_ray_hits_unit_sphere() {
        let world = unit_sphere_scene(Lambertian::new(Color::ONE).into());
        let camera = camera_down_z(1.0);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        let ray = Ray::new(ray.origin, ray.direction.normalize());

        let rec = world
            .hit(&ray, Interval::new(HIT_EPSILON, f32::INFINITY))
            .unwrap();
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!((rec.normal.length() - 1.0).abs() < 1e-4);
        // The struck side faces back up the camera's -z view direction
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
        assert!(rec.front_face);
    }

    #[test]
    fn test_light_sphere_image() {
        let world = unit_sphere_scene(DiffuseLight::new(Color::splat(0.25)).into());
        let camera = camera_down_z(1.0);
        let (image, _) = render(&world, &camera, &settings(15, 15, 2, 2));

        // Center sees the light, the corner sees the sky
        assert_eq!(image.get(7, 7), color_to_packed(Color::splat(0.25)));
        assert_eq!(image.get(0, 0), color_to_packed(Color::new(0.5, 0.7, 1.0)));
    }
}
