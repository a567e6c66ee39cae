//! Headless simulation runner
//!
//! Drives the simulation clock at the fixed tick rate (or flat out with
//! `--fast`), founds the configured colony at startup, and prints a summary
//! when the run ends.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use colonies::core::config::GameConfig;
use colonies::core::error::Result;
use colonies::event::GameEvent;
use colonies::simulation::{SimulationManager, MILLIS_PER_TICK};
use colonies::stats::StatsTracker;

#[derive(Parser, Debug)]
#[command(name = "colonies", about = "Deterministic colony simulation")]
struct Args {
    /// Path to a TOML config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 9000)]
    ticks: u64,

    /// Run as fast as possible instead of at the real-time tick rate
    #[arg(long)]
    fast: bool,

    /// Resume from a snapshot file written by --save
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write a snapshot here when the run ends
    #[arg(long)]
    save: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let sim = match &args.resume {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            info!(path = %path.display(), "resuming from snapshot");
            SimulationManager::restore(&bytes, &config)?
        }
        None => {
            let sim = SimulationManager::new(&config);
            sim.bus()
                .publish(GameEvent::ColonyPlaced(config.colony.to_placement(0)?));
            sim
        }
    };

    let stats = StatsTracker::new();
    stats.clone().attach(&sim.bus());

    let mut interval = tokio::time::interval(Duration::from_millis(MILLIS_PER_TICK));
    for _ in 0..args.ticks {
        if !args.fast {
            interval.tick().await;
        }
        sim.step();
    }

    let (happy, neutral, unhappy) = stats.happiness_reports();
    let population: usize = sim
        .logic()
        .colonies()
        .iter()
        .map(|c| c.living_count())
        .sum();
    let timing = sim.timing();
    info!(
        ticks = sim.ticks(),
        population,
        births = stats.births(),
        deaths = stats.deaths(),
        happy,
        neutral,
        unhappy,
        last_step_us = timing.last_step_duration.as_micros() as u64,
        "run finished"
    );

    if let Some(path) = &args.save {
        std::fs::write(path, sim.snapshot()?)?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}
