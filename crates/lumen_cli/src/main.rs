use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use lumen_core::{output, RenderSettings};
use lumen_math::Color;

mod cli;
mod scenes;

use cli::{Args, SceneKind};
use scenes::Scene;

/// Initialize the logger; `RUST_LOG` can still refine individual modules.
fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_settings(args: &Args) -> Result<RenderSettings> {
    let mut settings = match &args.config {
        Some(path) => RenderSettings::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderSettings::default(),
    };

    args.apply(&mut settings);
    settings.validate().context("Invalid render settings")?;
    Ok(settings)
}

fn build_scene(args: &Args, settings: &RenderSettings) -> Scene {
    let background = Color::from_array(settings.background);
    match args.scene {
        SceneKind::Spheres => scenes::spheres(background),
        SceneKind::Lights => scenes::lights(),
        SceneKind::Textured => scenes::textured(background, args.texture.as_deref()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let settings = load_settings(&args)?;
    let scene = build_scene(&args, &settings);
    info!("Scene {:?}: {} objects", args.scene, scene.world.len());

    let camera = scene.camera.build(settings.aspect_ratio());

    let start = Instant::now();
    let (image, stats) = lumen_renderer::render(&scene.world, &camera, &settings);
    let elapsed = start.elapsed();

    info!(
        "Rendered {} pixels in {} tiles in {:.2?}",
        stats.pixels, stats.finished_jobs, elapsed
    );
    if stats.total_bounces > 0 {
        info!(
            "{} bounces, {:.1} ns per bounce",
            stats.total_bounces,
            elapsed.as_nanos() as f64 / stats.total_bounces as f64
        );
    }

    output::save(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
