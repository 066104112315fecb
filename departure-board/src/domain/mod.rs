//! Domain types for the departure board.
//!
//! These are the validated, API-independent types the rest of the crate
//! works with. Station ids are checked at construction, so code that holds
//! a `Route` can trust its endpoints.

mod departure;
mod route;
mod station;
mod transport;

pub use departure::{Departure, cutoff, format_duration, sort_departures, truncate_destination};
pub use route::{Route, destination_label};
pub use station::{InvalidStationId, StationId};
pub use transport::{ProductsMask, TransportType, VehicleIcon};
