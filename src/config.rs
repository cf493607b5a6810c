use std::str::FromStr;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::{
    entities::station::{default_servers, Interval, RouteDesc, StationDesc, EXIT},
    network::RoutedRejection,
};

const SIMULATION: &str = "simulation";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NetworkDesc {
    pub simulation: SimulationDesc,
    #[serde(default)]
    pub stations: Vec<StationDesc>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulationDesc {
    pub start_time: f64,
    pub iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub routed_rejection: RoutedRejection,
}

impl NetworkDesc {
    pub fn validate(&self) -> Result<(), Invalid> {
        validate(self.simulation.start_time, &self.stations)
    }
}

/// Checks the ranges deserialization cannot: interval bounds, server counts, probabilities and
/// reserved names.
pub fn validate(start_time: f64, stations: &[StationDesc]) -> Result<(), Invalid> {
    if !start_time.is_finite() {
        return Err(Invalid::StartTime(start_time));
    }
    for s in stations {
        if s.name == EXIT {
            return Err(Invalid::ReservedName {
                station: s.name.clone(),
            });
        }
        for (which, iv) in [("arrival", s.arrival), ("service", s.service)] {
            if !iv.is_valid() {
                return Err(Invalid::Interval {
                    station: s.name.clone(),
                    which,
                    interval: iv,
                });
            }
        }
        if s.servers == 0 {
            return Err(Invalid::NoServers {
                station: s.name.clone(),
            });
        }
        for r in &s.routes {
            if !(0.0..=1.0).contains(&r.probability) {
                return Err(Invalid::Probability {
                    station: s.name.clone(),
                    destination: r.destination.clone(),
                    probability: r.probability,
                });
            }
        }
    }
    Ok(())
}

impl FromStr for NetworkDesc {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_yaml(s)
    }
}

// Every key besides the station fields names a route destination
#[derive(Debug, serde::Deserialize)]
struct StationSection {
    arrival: Interval,
    service: Interval,
    #[serde(default = "default_servers")]
    servers: usize,
    capacity: usize,
    #[serde(flatten)]
    routes: Mapping,
}

impl StationSection {
    fn into_desc(self, name: String) -> Result<StationDesc, ParseError> {
        let mut routes: Vec<RouteDesc> = Vec::with_capacity(self.routes.len());
        for (key, value) in self.routes {
            let destination = match key {
                Value::String(destination) => destination,
                key => return Err(ParseError::RouteKey { station: name, key }),
            };
            let Some(probability) = value.as_f64() else {
                return Err(ParseError::Probability {
                    station: name,
                    destination,
                    value,
                });
            };
            routes.push(RouteDesc {
                destination,
                probability,
            });
        }
        Ok(StationDesc {
            name,
            arrival: self.arrival,
            service: self.service,
            servers: self.servers,
            capacity: self.capacity,
            routes,
        })
    }
}

/// Parses a YAML network description. The `simulation` section is required; every other
/// top-level key is a station, in document order.
pub fn parse_yaml(text: &str) -> Result<NetworkDesc, ParseError> {
    let doc: Mapping = serde_yaml::from_str(text)?;
    let mut simulation = None;
    let mut stations = Vec::new();
    for (key, value) in doc {
        let name = match key {
            Value::String(name) => name,
            key => return Err(ParseError::SectionName(key)),
        };
        debug!(section = %name, "Reading section");
        if name == SIMULATION {
            let sim: SimulationDesc =
                serde_yaml::from_value(value).map_err(|source| ParseError::Section {
                    section: name,
                    source,
                })?;
            simulation = Some(sim);
        } else {
            let section: StationSection = match serde_yaml::from_value(value) {
                Ok(section) => section,
                Err(source) => {
                    return Err(ParseError::Section {
                        section: name,
                        source,
                    })
                }
            };
            stations.push(section.into_desc(name)?);
        }
    }
    Ok(NetworkDesc {
        simulation: simulation.ok_or(ParseError::MissingSection(SIMULATION))?,
        stations,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("YAML error")]
    Yaml(#[from] serde_yaml::Error),

    #[error("section `{section}`")]
    Section {
        section: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("section names must be strings, found {0:?}")]
    SectionName(Value),

    #[error("station `{station}`: route destinations must be strings, found {key:?}")]
    RouteKey { station: String, key: Value },

    #[error("station `{station}`: probability for `{destination}` is not a number: {value:?}")]
    Probability {
        station: String,
        destination: String,
        value: Value,
    },

    #[error("missing `{0}` section")]
    MissingSection(&'static str),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Invalid {
    #[error("start time {0} is not finite")]
    StartTime(f64),

    #[error("`{station}` is reserved for customers leaving the network")]
    ReservedName { station: String },

    #[error("station `{station}`: {which} interval {interval} must satisfy 0 <= min <= max")]
    Interval {
        station: String,
        which: &'static str,
        interval: Interval,
    },

    #[error("station `{station}` needs at least one server")]
    NoServers { station: String },

    #[error("station `{station}`: probability {probability} for `{destination}` is outside [0, 1]")]
    Probability {
        station: String,
        destination: String,
        probability: f64,
    },
}
