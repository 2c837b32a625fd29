//! Headless planet demo.
//!
//! Builds a planet from `config.ron` (overridable via CLI flags), writes the
//! blend lookup table if it doesn't exist yet, then flies a camera from orbit
//! down to the surface and logs how the LOD selection reacts.
//!
//! Run with `cargo run -p planetoid-demo -- --depth 3 --frames 200`.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use glam::DVec3;
use planetoid_config::{CliArgs, Config};
use planetoid_lod::ViewCamera;
use planetoid_planet::{CountingRenderer, Planet, PlanetParams};
use planetoid_terrain::{BlendBands, BlendLookupGenerator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

/// Starting altitude as a multiple of the radius.
const START_DISTANCE: f64 = 6.0;
/// Closest approach as a multiple of the radius.
const END_DISTANCE: f64 = 1.02;

fn planet_params(config: &Config) -> PlanetParams {
    PlanetParams {
        radius: config.planet.radius,
        quad_divs: config.planet.quad_divs,
        tri_divs: config.planet.tri_divs,
        iterations: config.terrain.iterations,
        seed: config.terrain.seed,
        magnitude_divisor: config.terrain.magnitude_divisor,
        frames_per_update: config.lod.frames_per_update,
        pixel_divisor: config.lod.pixel_divisor,
        lookup_path: config.blend.lookup_path.clone(),
    }
}

fn blend_bands(config: &Config) -> BlendBands {
    BlendBands {
        peak: config.blend.peak,
        trough: config.blend.trough,
        base_steep: config.blend.base_steep,
        dirt_steep: config.blend.dirt_steep,
        rock_steep: config.blend.rock_steep,
        noise_factor: config.blend.noise_factor,
    }
}

/// Resolves a relative `blend.lookup_path` against the config directory so
/// the table is found no matter where the demo is started from.
fn anchor_lookup_path(config: &mut Config, config_dir: &Path) {
    if config.blend.lookup_path.is_relative() {
        config.blend.lookup_path = config_dir.join(&config.blend.lookup_path);
    }
}

/// Writes the blend lookup image unless it is already on disk.
/// Returns whether a new image was generated.
fn ensure_lookup(config: &Config) -> Result<bool, Box<dyn Error>> {
    let path = &config.blend.lookup_path;
    if path.exists() {
        info!("Using blend lookup {}", path.display());
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut generator = BlendLookupGenerator::new(config.blend.size, config.blend.noise_scale);
    let mut rng = ChaCha8Rng::seed_from_u64(config.terrain.seed);
    generator.generate(&blend_bands(config), &mut rng);
    generator.save_png(path)?;
    info!(
        "Generated {}x{} blend lookup at {}",
        config.blend.size,
        config.blend.size,
        path.display()
    );
    Ok(true)
}

/// Camera distance from the centre for `frame` of `frames`, easing
/// geometrically from orbit to just above the surface.
fn flight_distance(radius: f64, frame: u32, frames: u32) -> f64 {
    let t = if frames <= 1 {
        1.0
    } else {
        f64::from(frame) / f64::from(frames - 1)
    };
    radius * START_DISTANCE * (END_DISTANCE / START_DISTANCE).powf(t)
}

fn fly(config: &Config, planet: &mut Planet, frames: u32) -> CountingRenderer {
    let radius = f64::from(config.planet.radius);
    let mut camera = ViewCamera::new(
        config.view.viewport_width,
        config.view.viewport_height,
        config.view.fov_y_degrees,
        config.view.near,
        config.view.far,
    );
    let mut renderer = CountingRenderer::default();
    planet.sync(&mut renderer);
    planet.set_material(&config.planet.material, &mut renderer);
    info!(
        "Created {} patches with {} vertices",
        renderer.patches, renderer.vertices
    );

    // Slightly off-axis so the approach crosses a face seam.
    let direction = DVec3::new(0.3, 0.2, 1.0).normalize();
    for frame in 0..frames {
        camera.position = direction * flight_distance(radius, frame, frames);
        camera.look_at(DVec3::ZERO, DVec3::Y);

        let Some(stats) = planet.render(&camera.view()) else {
            continue;
        };
        let sync = planet.sync(&mut renderer);
        info!(
            "Frame {}: altitude {:.1}, {} patches drawn, {} re-stitched, {} index uploads, {} visibility changes",
            frame,
            camera.position.length() - radius,
            stats.rendered,
            stats.rebuilt,
            sync.index_uploads,
            sync.visibility_changes
        );
    }
    renderer
}

fn run(config: &Config, frames: u32) -> Result<(), Box<dyn Error>> {
    config.validate()?;
    ensure_lookup(config)?;

    let mut planet = Planet::new(planet_params(config))?;
    planet.build();
    planet.finalise();
    if let Some((min, max)) = planet.height_range() {
        info!("Surface heights span {:.2}..{:.2}", min, max);
    }

    let renderer = fly(config, &mut planet, frames);
    info!(
        "Flight done: {} index uploads, {} vertex uploads, {} patches visible",
        renderer.index_uploads,
        renderer.vertex_uploads,
        renderer.visible_count()
    );
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("planetoid")
    });

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    // A --lookup flag stays relative to the working directory.
    anchor_lookup_path(&mut config, &config_dir);
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    planetoid_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config, args.frames) {
        error!("Planet demo failed: {}", e);
        std::process::exit(1);
    }
}
