//! Conversion from ResRobot trips to departures.
//!
//! Each trip is converted on its own. A trip with missing or unparsable
//! fields is skipped and logged; the rest of the response still counts.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, trace};

use crate::domain::{
    Departure, Route, cutoff, destination_label, format_duration, sort_departures,
    truncate_destination,
};

use super::types::{StopPoint, Trip, TripList};

/// Error during trip to departure conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Trip JSON did not match the expected shape
    #[error("malformed trip: {0}")]
    Malformed(String),

    /// Trip has no legs
    #[error("trip has no legs")]
    EmptyLegList,

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Failed to parse a date or time
    #[error("invalid time: {0}")]
    InvalidTime(String),
}

/// Settings that shape the departures produced from a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    /// Departures earlier than now plus this many minutes are dropped.
    pub skip_minutes: i64,
    /// Destination names are cut at the first space after this many
    /// characters. Zero disables truncation.
    pub truncate_after: usize,
}

/// Convert a trip search response into departures.
///
/// Uses the first leg of every trip, drops departures before
/// `now + skip_minutes`, and returns the rest sorted by time.
pub fn normalize(
    list: &TripList,
    routes: &[Route],
    options: &NormalizeOptions,
    now: NaiveDateTime,
) -> Vec<Departure> {
    let cutoff = cutoff(now, options.skip_minutes);
    let mut departures = Vec::with_capacity(list.trips.len());

    for (idx, trip) in list.trips.iter().enumerate() {
        match convert_trip(trip, routes, options.truncate_after) {
            Ok(departure) if departure.timestamp >= cutoff => departures.push(departure),
            Ok(departure) => {
                trace!(trip = idx, departs = %departure.timestamp, "Dropping departure before cutoff");
            }
            Err(e) => {
                debug!(trip = idx, error = %e, "Skipping malformed trip");
            }
        }
    }

    sort_departures(&mut departures);
    departures
}

/// Convert a single trip, using its first leg.
pub fn convert_trip(
    trip: &Trip,
    routes: &[Route],
    truncate_after: usize,
) -> Result<Departure, ConversionError> {
    if let Some(message) = &trip.malformed {
        return Err(ConversionError::Malformed(message.clone()));
    }
    let leg = trip.first_leg().ok_or(ConversionError::EmptyLegList)?;

    let origin = leg
        .origin
        .as_ref()
        .ok_or(ConversionError::MissingField("Origin"))?;
    let destination = leg
        .destination
        .as_ref()
        .ok_or(ConversionError::MissingField("Destination"))?;

    let departs = stop_datetime(origin, "Origin")?;
    let arrives = stop_datetime(destination, "Destination")?;

    let stop_name = destination
        .name
        .as_deref()
        .ok_or(ConversionError::MissingField("Destination.name"))?;
    let name = destination
        .id
        .as_deref()
        .and_then(|id| destination_label(routes, id))
        .unwrap_or(stop_name);

    let line = leg
        .transport_number
        .clone()
        .or_else(|| leg.name.clone())
        .unwrap_or_default();

    Ok(Departure {
        timestamp: departs,
        departure_time_text: departs.format("%H:%M").to_string(),
        duration_text: format_duration(departs, arrives),
        line,
        type_code: leg.transport_category.clone().unwrap_or_default(),
        destination_text: truncate_destination(name, truncate_after).to_string(),
    })
}

/// Combine a stop's `date` and `time` fields into a local timestamp.
fn stop_datetime(stop: &StopPoint, which: &'static str) -> Result<NaiveDateTime, ConversionError> {
    let date = stop
        .date
        .as_deref()
        .ok_or(ConversionError::MissingField(which))?;
    let time = stop
        .time
        .as_deref()
        .ok_or(ConversionError::MissingField(which))?;

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ConversionError::InvalidTime(date.to_string()))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| ConversionError::InvalidTime(time.to_string()))?;

    Ok(date.and_time(time))
}
