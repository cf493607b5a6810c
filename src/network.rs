use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, info, trace, warn};

use crate::{
    data::{Report, StationRecord},
    entities::station::{Destination, Station, StationId},
    time::{Delta, Time},
};

/// What happens to a customer that a routing destination refuses for lack of room.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    derivative::Derivative,
    serde::Serialize,
    serde::Deserialize,
)]
#[derivative(Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutedRejection {
    /// The customer is dropped without being counted as lost.
    #[derivative(Default)]
    Ignore,
    /// The customer is counted as lost, like a refused external arrival.
    CountAsLoss,
}

/// A round-based network of queueing stations.
///
/// Every round visits each station once in insertion order. A station draws one external
/// arrival and one service time, the service time advances the shared clock, and then each of
/// its routes independently decides whether to forward a customer.
#[derive(Debug, typed_builder::TypedBuilder)]
pub struct Network<R: Rng> {
    #[builder(setter(into))]
    start: Time,
    iterations: usize,
    rng: R,
    #[builder(default)]
    routed_rejection: RoutedRejection,

    // Run-time
    #[builder(default = start, setter(skip))]
    cur_time: Time,
    #[builder(default, setter(skip))]
    lost: u64,
    #[builder(default, setter(skip))]
    rounds: usize,
    #[builder(default, setter(skip))]
    unresolved: u64,

    // Entities
    #[builder(default, setter(skip))]
    stations: Vec<(String, Station)>,
    #[builder(default, setter(skip))]
    index: FxHashMap<String, StationId>,
}

impl<R: Rng> Network<R> {
    /// Inserts a station under `name`. A station already registered under that name is replaced
    /// and the newcomer takes over its position in the round order.
    pub fn add_station(&mut self, name: impl Into<String>, station: Station) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&id) => self.stations[id.into_usize()].1 = station,
            None => {
                let id = StationId::new(self.stations.len());
                self.index.insert(name.clone(), id);
                self.stations.push((name, station));
            }
        }
    }

    pub fn run(mut self) -> Report {
        debug!(
            stations = self.stations.len(),
            iterations = self.iterations,
            start = %self.start,
            "Starting simulation"
        );
        for _ in 0..self.iterations {
            self.process_round();
        }
        let report = self.finish();
        info!(
            time = %report.current_time,
            lost = report.lost,
            unresolved = report.unresolved_routes,
            "Simulation finished"
        );
        report
    }

    pub fn process_round(&mut self) {
        for i in 0..self.stations.len() {
            self.process_station(StationId::new(i));
        }
        self.rounds += 1;
        trace!(round = self.rounds, time = %self.cur_time, lost = self.lost, "Round complete");
    }

    fn process_station(&mut self, id: StationId) {
        let idx = id.into_usize();

        // External arrival
        let (_, station) = &mut self.stations[idx];
        let arrival = station.sample_arrival(&mut self.rng).into_time();
        if station.admit(arrival) {
            station.counters.admitted += 1;
        } else {
            station.counters.rejected += 1;
            self.lost += 1;
        }

        // Service
        let service = station.sample_service(&mut self.rng);
        self.advance(service);

        // Routing
        for r in 0..self.stations[idx].1.routes.len() {
            let draw: f64 = self.rng.gen();
            let (name, station) = &self.stations[idx];
            let route = &station.routes[r];
            if draw > route.probability {
                continue;
            }
            let target = match &route.destination {
                Destination::Exit => None,
                Destination::Station(dest) => match self.index.get(dest) {
                    Some(&target) => Some(target),
                    None => {
                        warn!(station = %name, destination = %dest, "Routing destination not found");
                        self.unresolved += 1;
                        continue;
                    }
                },
            };
            match target {
                Some(target) => self.forward(target),
                None => {
                    trace!(station = %name, "Customer left the network");
                    self.stations[idx].1.counters.exited += 1;
                    self.lost += 1;
                }
            }
        }
    }

    // Routed customers are stamped with the shared clock, not a sampled arrival time
    fn forward(&mut self, target: StationId) {
        let now = self.cur_time;
        let (name, station) = &mut self.stations[target.into_usize()];
        if station.admit(now) {
            station.counters.routed_in += 1;
            return;
        }
        station.counters.routed_rejected += 1;
        match self.routed_rejection {
            RoutedRejection::Ignore => {
                trace!(station = %name, "Routed customer dropped");
            }
            RoutedRejection::CountAsLoss => {
                trace!(station = %name, "Routed customer lost");
                self.lost += 1;
            }
        }
    }

    fn advance(&mut self, delta: Delta) {
        self.cur_time += delta;
    }

    pub fn current_time(&self) -> Time {
        self.cur_time
    }

    pub fn lost(&self) -> u64 {
        self.lost
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn unresolved_routes(&self) -> u64 {
        self.unresolved
    }

    pub fn station(&self, name: &str) -> Option<&Station> {
        self.index
            .get(name)
            .map(|id| &self.stations[id.into_usize()].1)
    }

    /// Station names in round order.
    pub fn station_names(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(|(name, _)| name.as_str())
    }

    pub fn finish(self) -> Report {
        let stations = self
            .stations
            .into_iter()
            .map(|(name, station)| StationRecord::new(name, &station))
            .collect();
        Report {
            start: self.start,
            current_time: self.cur_time,
            lost: self.lost,
            rounds: self.rounds,
            unresolved_routes: self.unresolved,
            stations,
        }
    }
}
