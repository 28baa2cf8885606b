//! Tilesmith command line.
//!
//! - `inspect` loads tilesets, prints a summary of each and checks every
//!   external animation reference.
//! - `simulate` spawns one tile instance and prints what it shows and
//!   collides with on each tick.
//!
//! # Running
//!
//! ```sh
//! tilesmith inspect assets/tilesets/actors/yellow.json
//! tilesmith simulate --tileset actors/yellow.json --tile 10 --step-ms 50 --ticks 8 \
//!     assets/tilesets/actors/yellow.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use glam::Vec2;
use log::{error, info, warn};

use tilesmith::components::tileinstance::{TileFlip, TileInstance};
use tilesmith::components::worldshapes::WorldShapes;
use tilesmith::engine::{build_schedule, build_world, load_tilesets, spawn_tile_instance, tick};
use tilesmith::error::TileResult;
use tilesmith::resources::engineconfig::{DEFAULT_CONFIG_PATH, EngineConfig};
use tilesmith::resources::tilesetstore::TilesetStore;

/// Tile metadata and animation inspector
#[derive(Parser)]
#[command(version, about = "Inspect tilesets and simulate tile animations.")]
struct Cli {
    /// INI configuration file (default: ./tilesmith.ini, if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load tilesets, print their summaries and validate external references.
    Inspect {
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
    },
    /// Spawn one instance and tick it.
    Simulate {
        /// Tileset id, relative to the configured tileset directory.
        #[arg(long)]
        tileset: String,
        #[arg(long)]
        tile: u32,
        #[arg(long, default_value_t = 100)]
        step_ms: u32,
        #[arg(long, default_value_t = 20)]
        ticks: u32,
        #[arg(long, default_value_t = 0.0)]
        x: f32,
        #[arg(long, default_value_t = 0.0)]
        y: f32,
        #[arg(long)]
        flip_x: bool,
        #[arg(long)]
        flip_y: bool,
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> TileResult<EngineConfig> {
    match path {
        Some(path) => {
            let mut config = EngineConfig::with_path(path);
            config.load_from_file()?;
            Ok(config)
        }
        None => {
            let mut config = EngineConfig::new();
            if PathBuf::from(DEFAULT_CONFIG_PATH).exists() {
                config.load_from_file()?;
            }
            Ok(config)
        }
    }
}

fn inspect(config: EngineConfig, files: &[PathBuf]) -> TileResult<bool> {
    let mut world = build_world(config);
    load_tilesets(&mut world, files)?;

    let store = world.resource::<TilesetStore>();
    let mut ids: Vec<_> = store.iter().collect();
    ids.sort_by(|a, b| a.0.cmp(b.0));
    for (id, index) in ids {
        let holds = index.tracks().filter(|(_, t)| t.has_hold()).count();
        let shapes: usize = index.tiles().map(|t| t.shapes.len()).sum();
        println!(
            "{}: '{}' {}x{}, {} tiles, {} shapes, {} tracks ({} holding)",
            id,
            index.name(),
            index.tile_size().x,
            index.tile_size().y,
            index.len(),
            shapes,
            index.track_count(),
            holds
        );
    }

    let broken = store.broken_references();
    for err in &broken {
        warn!("{}", err);
        println!("broken: {}", err);
    }
    Ok(broken.is_empty())
}

#[allow(clippy::too_many_arguments)]
fn simulate(
    config: EngineConfig,
    files: &[PathBuf],
    tileset: &str,
    tile: u32,
    position: Vec2,
    flip: TileFlip,
    step_ms: u32,
    ticks: u32,
) -> TileResult<()> {
    let mut world = build_world(config);
    load_tilesets(&mut world, files)?;
    let entity = spawn_tile_instance(&mut world, tileset, tile, position, flip)?;
    let mut schedule = build_schedule();

    for n in 0..=ticks {
        let delta = if n == 0 { 0 } else { step_ms };
        tick(&mut world, &mut schedule, delta);
        let (Some(instance), Some(shapes)) = (
            world.get::<TileInstance>(entity),
            world.get::<WorldShapes>(entity),
        ) else {
            break;
        };
        let summary: Vec<String> = shapes
            .iter()
            .map(|s| {
                let (min, max) = s.bounds();
                format!("{:?} ({}, {})-({}, {})", s.class, min.x, min.y, max.x, max.y)
            })
            .collect();
        println!(
            "t={:>6}ms  {}:{}  [{}]",
            u64::from(n) * u64::from(step_ms),
            instance.tileset,
            instance.tile,
            summary.join(", ")
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Inspect { files } => inspect(config, &files),
        Command::Simulate {
            tileset,
            tile,
            step_ms,
            ticks,
            x,
            y,
            flip_x,
            flip_y,
            files,
        } => {
            let flip = TileFlip {
                horizontal: flip_x,
                vertical: flip_y,
                diagonal: false,
            };
            simulate(config, &files, &tileset, tile, Vec2::new(x, y), flip, step_ms, ticks).map(|()| true)
        }
    };

    match result {
        Ok(true) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
