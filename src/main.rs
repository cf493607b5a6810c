use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use qnet::{driver, RoutedRejection};
use tracing_subscriber::EnvFilter;

/// Round-based simulation of an open network of queueing stations
#[derive(Parser, Debug, Clone)]
#[command(version)]
struct CliOpt {
    /// Path to the network configuration (JSON when the extension is `.json`, YAML
    /// otherwise)
    config: PathBuf,

    /// Number of rounds to run, overriding the configuration
    #[arg(long)]
    iterations: Option<usize>,

    /// Random seed, overriding the configuration. Without any seed the run is non-deterministic
    #[arg(long)]
    seed: Option<u64>,

    /// Count customers refused by a routing destination as lost
    #[arg(long)]
    count_routed_rejections: bool,

    /// Print per-station counters after the summary
    #[arg(long)]
    stations: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let opt = CliOpt::parse();
    let mut desc = driver::read_config(&opt.config)
        .with_context(|| format!("failed to load configuration from {}", opt.config.display()))?;
    if let Some(iterations) = opt.iterations {
        desc.simulation.iterations = iterations;
    }
    if let Some(seed) = opt.seed {
        desc.simulation.seed = Some(seed);
    }
    if opt.count_routed_rejections {
        desc.simulation.routed_rejection = RoutedRejection::CountAsLoss;
    }

    let report = driver::run(desc.into()).context("simulation could not be constructed")?;
    if opt.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
        if opt.stations {
            print!("\n{}", report.station_table());
        }
    }
    Ok(())
}
