#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that grows a plant skeleton and prints it.

mod report;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sprout_core::{Command, Event, PlantRecord};
use sprout_system_branching::GrowthTuning;
use sprout_world::{self as world, EntityGraph};
use tracing_subscriber::EnvFilter;

/// Grows a procedural plant skeleton from a species record.
#[derive(Debug, Parser)]
#[command(name = "sprout", version)]
struct Args {
    /// JSON species record to grow; the built-in defaults are used when omitted.
    #[arg(long)]
    record: Option<PathBuf>,
    /// Seed for the deterministic random source.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Derive lighter and darker variants of every palette color.
    #[arg(long)]
    vary_colors: bool,
    /// TOML file overriding the growth tuning.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print the whole entity graph as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

/// Entry point for the sprout command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sprout=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let record = load_record(args.record.as_ref())?;
    let tuning = load_tuning(args.tuning.as_ref())?;

    let mut graph = EntityGraph::with_tuning(tuning);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut events = Vec::new();
    world::apply(
        &mut graph,
        Command::GrowPlant {
            record: Box::new(record),
            vary_colors: args.vary_colors,
        },
        &mut rng,
        &mut events,
    );

    let plant = events
        .iter()
        .find_map(|event| match event {
            Event::PlantGrown { plant } => Some(*plant),
            _ => None,
        })
        .context("growing the plant produced no plant")?;
    tracing::info!(
        plant = plant.get(),
        seed = args.seed,
        events = events.len(),
        "grew plant"
    );

    let output = if args.json {
        report::json(&graph, plant)?
    } else {
        report::summary(&graph, plant)
    };
    println!("{output}");
    Ok(())
}

fn load_record(path: Option<&PathBuf>) -> Result<PlantRecord> {
    let Some(path) = path else {
        return Ok(PlantRecord::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse record {}", path.display()))
}

fn load_tuning(path: Option<&PathBuf>) -> Result<GrowthTuning> {
    let Some(path) = path else {
        return Ok(GrowthTuning::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse tuning {}", path.display()))
}
