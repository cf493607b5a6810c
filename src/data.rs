use std::fmt;

use crate::{entities::station::Station, time::Time};

/// The outcome of a simulation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    /// The clock value the run started from.
    pub start: Time,
    /// The global simulated time once every round has completed.
    pub current_time: Time,
    /// Customers refused on arrival or sent out of the network.
    pub lost: u64,
    /// The number of rounds executed.
    pub rounds: usize,
    /// Routing events whose destination named no known station.
    pub unresolved_routes: u64,
    /// Per-station counters, in round order.
    pub stations: Vec<StationRecord>,
}

impl Report {
    pub fn station(&self, name: &str) -> Option<&StationRecord> {
        self.stations.iter().find(|s| s.name == name)
    }

    /// The per-station counters as an aligned text table.
    pub fn station_table(&self) -> StationTable<'_> {
        StationTable(self)
    }
}

pub struct StationTable<'a>(&'a Report);

impl fmt::Display for StationTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .0
            .stations
            .iter()
            .map(|s| s.name.len())
            .max()
            .unwrap_or(0)
            .max("station".len());
        writeln!(
            f,
            "{:<width$} {:>8} {:>8} {:>9} {:>9} {:>9} {:>9} {:>8}",
            "station", "capacity", "buffered", "admitted", "rejected", "routed", "dropped", "exited",
        )?;
        for s in &self.0.stations {
            writeln!(
                f,
                "{:<width$} {:>8} {:>8} {:>9} {:>9} {:>9} {:>9} {:>8}",
                s.name,
                s.capacity,
                s.buffered,
                s.admitted,
                s.rejected,
                s.routed_in,
                s.routed_rejected,
                s.exited,
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation finished.")?;
        writeln!(f, "Global simulation time: {}", self.current_time)?;
        write!(f, "Lost customers: {}", self.lost)
    }
}

/// A snapshot of one station at the end of a run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StationRecord {
    pub name: String,
    pub servers: usize,
    pub capacity: usize,
    /// Customers held in the buffer.
    pub buffered: usize,
    /// Arrival stamp of the first customer admitted, if any.
    pub oldest: Option<Time>,
    pub admitted: u64,
    pub rejected: u64,
    pub routed_in: u64,
    pub routed_rejected: u64,
    pub exited: u64,
}

impl StationRecord {
    pub(crate) fn new(name: String, station: &Station) -> Self {
        let counters = station.counters();
        Self {
            name,
            servers: station.servers(),
            capacity: station.capacity(),
            buffered: station.buffer().len(),
            oldest: station.buffer().oldest().copied(),
            admitted: counters.admitted,
            rejected: counters.rejected,
            routed_in: counters.routed_in,
            routed_rejected: counters.routed_rejected,
            exited: counters.exited,
        }
    }
}
