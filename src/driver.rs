use std::path::Path;

use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use crate::{
    config::{self, Invalid, NetworkDesc, ParseError, SimulationDesc},
    entities::station::{Station, StationDesc},
    network::{Network, RoutedRejection},
    time::Time,
    Report,
};

#[derive(Debug, typed_builder::TypedBuilder)]
pub struct Config {
    #[builder(setter(into))]
    start: Time,
    iterations: usize,
    stations: Vec<StationDesc>,

    /// Seed for the network's random number generator; OS entropy when absent.
    #[builder(default, setter(into, strip_option))]
    seed: Option<u64>,
    #[builder(default)]
    routed_rejection: RoutedRejection,
}

impl From<NetworkDesc> for Config {
    fn from(desc: NetworkDesc) -> Self {
        let SimulationDesc {
            start_time,
            iterations,
            seed,
            routed_rejection,
        } = desc.simulation;
        Config {
            start: Time::new(start_time),
            iterations,
            stations: desc.stations,
            seed,
            routed_rejection,
        }
    }
}

/// Builds the network described by `cfg` without running it.
pub fn build(cfg: Config) -> Result<Network<StdRng>, Error> {
    config::validate(cfg.start.into_f64(), &cfg.stations)?;
    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut network = Network::builder()
        .start(cfg.start)
        .iterations(cfg.iterations)
        .rng(rng)
        .routed_rejection(cfg.routed_rejection)
        .build();
    for s in cfg.stations {
        let mut station = Station::builder()
            .arrival(s.arrival)
            .service(s.service)
            .servers(s.servers)
            .capacity(s.capacity)
            .build();
        for r in s.routes {
            station.add_route(r.destination, r.probability);
        }
        network.add_station(s.name, station);
    }
    Ok(network)
}

/// Validates `cfg` and runs the simulation to completion. An invalid configuration fails before
/// any round is processed.
pub fn run(cfg: Config) -> Result<Report, Error> {
    Ok(build(cfg)?.run())
}

/// Reads a network description. Files ending in `.json` are parsed as JSON, anything else as
/// YAML. Ranges are checked when the description is built into a network.
pub fn read_config(path: impl AsRef<Path>) -> Result<NetworkDesc, Error> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)?;
    let desc = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&s)?,
        _ => config::parse_yaml(&s)?,
    };
    debug!(
        path = %path.display(),
        stations = desc.stations.len(),
        "Loaded configuration"
    );
    Ok(desc)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serde error")]
    Serde(#[from] serde_json::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("parse error")]
    Parse(#[from] ParseError),

    #[error("invalid configuration")]
    Invalid(#[from] Invalid),
}
