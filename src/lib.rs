#[macro_use]
mod ident;

pub mod config;
pub mod driver;
pub mod queue;
pub mod time;

pub(crate) mod data;
pub(crate) mod entities;
pub(crate) mod network;

pub use config::NetworkDesc;
pub use data::{Report, StationRecord, StationTable};
pub use driver::{read_config, run, Config, Error};
pub use entities::station::{
    Counters, Destination, Interval, Route, RouteDesc, Station, StationDesc, StationId, EXIT,
};
pub use network::{Network, RoutedRejection};
