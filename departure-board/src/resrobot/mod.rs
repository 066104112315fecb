//! ResRobot trip search client.
//!
//! This module provides an HTTP client for the ResRobot v2 `trip`
//! endpoint and the conversion of its responses into departures.
//!
//! Key characteristics of ResRobot:
//! - Stop ids are numeric strings (e.g. `740020749`)
//! - Dates and times are separate `YYYY-MM-DD` / `HH:MM:SS` fields in
//!   Swedish local time
//! - The `products` mask narrows results to selected vehicle categories

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, ResRobotClient, ResRobotConfig};
pub use convert::{ConversionError, NormalizeOptions, convert_trip, normalize};
pub use error::ResRobotError;
pub use mock::MockResRobotClient;
pub use types::{Leg, LegList, StopPoint, Trip, TripList};
