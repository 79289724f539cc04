use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::LevelFilter;
use strata::{GenerationMode, Vec3, World, WorldConfig, WorldError};

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Headless driver for the strata voxel world")]
struct Args {
    /// World config TOML; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u32>,
    /// Force flat terrain.
    #[arg(long, default_value_t = false)]
    flat: bool,
    #[arg(long, default_value_t = 600)]
    steps: u32,
    /// Seconds per step.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Viewpoint speed along +X in blocks per second.
    #[arg(long, default_value_t = 0.0)]
    walk_speed: f32,
    #[arg(long, default_value_t = 80.0)]
    eye_height: f32,
    /// Log to this file instead of stdout.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    match &args.log_file {
        Some(path) => {
            simplelog::WriteLogger::init(
                LevelFilter::Info,
                simplelog::Config::default(),
                File::create(path)?,
            )?;
        }
        None => {
            env_logger::Builder::new()
                .target(env_logger::Target::Stdout)
                .filter_level(LevelFilter::Info)
                .parse_env("RUST_LOG")
                .init();
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<WorldConfig, Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => WorldConfig::load_from_path(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if args.flat {
        cfg.generation.mode = GenerationMode::Flat;
    }
    Ok(cfg)
}

fn run(world: &mut World, args: &Args) -> Result<(), WorldError> {
    let mut eye = Vec3::new(0.0, 0.0, args.eye_height);
    let mut uploads = 0usize;
    for step in 0..args.steps {
        eye.x += args.walk_speed * args.dt;
        world.set_viewpoint(eye);
        world.update(args.dt)?;
        uploads += world.drain_mesh_uploads().len();
        if step % 60 == 0 {
            let stats = world.runtime_stats();
            log::info!(
                "step {step}: {} active, {} light pending, {} meshes uploaded, disk {}+{} gen {}+{}, {}",
                world.active().len(),
                world.pending_light_updates(),
                uploads,
                stats.queued_disk,
                stats.inflight_disk,
                stats.queued_generation,
                stats.inflight_generation,
                world.day_cycle().clock_string()
            );
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(&args) {
        eprintln!("failed to initialize logging: {e}");
        process::exit(1);
    }
    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("failed to load world config: {}", e);
            process::exit(1);
        }
    };
    let mut world = match World::with_builtin(cfg) {
        Ok(world) => world,
        Err(e) => {
            log::error!("failed to create world: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = run(&mut world, &args) {
        log::error!("fatal: {}", e);
        process::exit(1);
    }
    world.shutdown();
}
