//! dungeon-gen: room-grid dungeon generator
//!
//! Generates one or more levels and prints the sampled room count and the
//! text map of each.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use dg_core::dungeon::{Glyphs, Grid};
use dg_core::{ConfigError, GameRng, GenerationConfig, GenerationError, generate_level};

/// Room-grid dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Generate room-grid dungeon levels", long_about = None)]
struct Args {
    /// Seed for the first level (random if omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// dungeonrc file with OPTIONS= lines
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Side length of the room grid
    #[arg(long = "grid-size")]
    grid_size: Option<usize>,

    /// Center of the room-count distribution
    #[arg(long = "room-mean")]
    room_mean: Option<i32>,

    /// Spread of the room-count distribution
    #[arg(long = "room-sigma", allow_negative_numbers = true)]
    room_sigma: Option<i32>,

    /// Number of levels to generate; level k uses seed + k
    #[arg(short = 'n', long = "levels", default_value_t = 1)]
    levels: u32,

    /// Draw with plain ASCII glyphs
    #[arg(long = "ascii")]
    ascii: bool,

    /// Print each level as JSON
    #[arg(long = "json")]
    json: bool,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Command-line errors
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One level as printed by `--json`
#[derive(Debug, Serialize)]
struct LevelReport<'a> {
    seed: u64,
    room_count: usize,
    map: String,
    grid: &'a Grid,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("dungeon-gen: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only maps
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "dungeon_gen=debug,dg_core=debug"
    } else {
        "dungeon_gen=info,dg_core=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = build_config(args)?;
    config.validate()?;
    debug!(?config, "effective configuration");

    let glyphs = if args.ascii {
        Glyphs::ASCII
    } else {
        Glyphs::UNICODE
    };
    let base_seed = args.seed.unwrap_or_else(|| GameRng::from_entropy().seed());

    for k in 0..args.levels {
        let seed = base_seed.wrapping_add(u64::from(k));
        let mut rng = GameRng::new(seed);
        let level = generate_level(&config, &mut rng)?;
        let map = level.render(glyphs);

        if args.json {
            let report = LevelReport {
                seed,
                room_count: level.room_count,
                map,
                grid: &level.grid,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("Seed: {seed}");
            println!("Number of rooms: {}", level.room_count);
            println!("{map}");
        }
    }

    Ok(())
}

/// Defaults, then the rc file, then command-line overrides
fn build_config(args: &Args) -> Result<GenerationConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load_from_file(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(grid_size) = args.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(room_mean) = args.room_mean {
        config.room_mean = room_mean;
    }
    if let Some(room_sigma) = args.room_sigma {
        config.room_sigma = room_sigma;
    }

    Ok(config)
}
