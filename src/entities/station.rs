use std::fmt;

use rand::Rng;
use smallvec::SmallVec;

use crate::{
    queue::Buffer,
    time::{Delta, Time},
};

identifier!(StationId);

/// Destination name that sends a customer out of the network.
pub const EXIT: &str = "exit";

// Most stations only route to a handful of destinations
pub(crate) type RouteList = SmallVec<[Route; 4]>;

#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct Station {
    pub(crate) arrival: Interval,
    pub(crate) service: Interval,
    #[builder(default = 1)]
    servers: usize, // advisory, does not limit service
    capacity: usize,

    #[builder(default = Buffer::new(capacity), setter(skip))]
    buffer: Buffer,
    #[builder(default, setter(skip))]
    pub(crate) routes: RouteList,
    #[builder(default, setter(skip))]
    pub(crate) counters: Counters,
}

impl Station {
    /// Draws a value uniformly from `[min, max)`.
    pub fn generate_random_interval<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Delta {
        Interval::new(min, max).sample(rng)
    }

    pub fn sample_arrival<R: Rng + ?Sized>(&self, rng: &mut R) -> Delta {
        self.arrival.sample(rng)
    }

    pub fn sample_service<R: Rng + ?Sized>(&self, rng: &mut R) -> Delta {
        self.service.sample(rng)
    }

    /// Admits a customer that arrived at `arrival`. Returns `false` if the buffer is full.
    #[must_use]
    pub fn admit(&mut self, arrival: Time) -> bool {
        self.buffer.admit(arrival)
    }

    /// Sets the probability of forwarding a customer to `destination`. Re-adding a destination
    /// overwrites its probability but keeps its original position.
    pub fn add_route(&mut self, destination: impl Into<Destination>, probability: f64) {
        let destination = destination.into();
        match self.routes.iter_mut().find(|r| r.destination == destination) {
            Some(route) => route.probability = probability,
            None => self.routes.push(Route::new(destination, probability)),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn servers(&self) -> usize {
        self.servers
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }
}

/// Per-station outcome counters accumulated over a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    /// External arrivals accepted into the buffer.
    pub admitted: u64,
    /// External arrivals refused because the buffer was full.
    pub rejected: u64,
    /// Customers forwarded here by another station and accepted.
    pub routed_in: u64,
    /// Customers forwarded here by another station and refused.
    pub routed_rejected: u64,
    /// Customers this station sent out of the network.
    pub exited: u64,
}

/// Bounds of a uniformly sampled time interval.
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    // A degenerate interval yields `min` exactly
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Delta {
        if self.min < self.max {
            Delta::new(rng.gen_range(self.min..self.max))
        } else {
            Delta::new(self.min)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && 0.0 <= self.min && self.min <= self.max
    }
}

impl From<(f64, f64)> for Interval {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl From<Interval> for (f64, f64) {
    fn from(val: Interval) -> Self {
        (val.min, val.max)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Exit,
    Station(String),
}

impl Destination {
    pub fn name(&self) -> &str {
        match self {
            Destination::Exit => EXIT,
            Destination::Station(name) => name,
        }
    }
}

impl From<&str> for Destination {
    fn from(name: &str) -> Self {
        if name == EXIT {
            Destination::Exit
        } else {
            Destination::Station(name.to_owned())
        }
    }
}

impl From<String> for Destination {
    fn from(name: String) -> Self {
        if name == EXIT {
            Destination::Exit
        } else {
            Destination::Station(name)
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct Route {
    pub destination: Destination,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StationDesc {
    pub name: String,
    pub arrival: Interval,
    pub service: Interval,
    #[serde(default = "default_servers")]
    pub servers: usize,
    pub capacity: usize,
    #[serde(default)]
    pub routes: Vec<RouteDesc>,
}

pub(crate) fn default_servers() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteDesc {
    pub destination: String,
    pub probability: f64,
}
