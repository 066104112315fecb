//! The canonical departure record and the text rules applied to it.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use super::VehicleIcon;

/// One upcoming departure, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    /// Departure instant in local time. Used for ordering and cutoffs.
    pub timestamp: NaiveDateTime,

    /// `HH:MM` rendering of `timestamp`.
    pub departure_time_text: String,

    /// Travel time to the destination stop, see [`format_duration`].
    pub duration_text: String,

    /// Line number or name.
    pub line: String,

    /// Vehicle category code, e.g. `"BLT"` for a local bus.
    pub type_code: String,

    /// Destination display name.
    pub destination_text: String,
}

impl Departure {
    /// Icon for this departure's vehicle category.
    pub fn icon(&self) -> Option<VehicleIcon> {
        VehicleIcon::from_type_code(&self.type_code)
    }
}

/// The instant before which departures are no longer shown.
///
/// Saturates at the representable range instead of overflowing.
pub fn cutoff(now: NaiveDateTime, skip_minutes: i64) -> NaiveDateTime {
    Duration::try_minutes(skip_minutes)
        .and_then(|skip| now.checked_add_signed(skip))
        .unwrap_or(if skip_minutes < 0 {
            NaiveDateTime::MIN
        } else {
            NaiveDateTime::MAX
        })
}

/// Format the travel time between departure and arrival as `HH:MM`.
///
/// Hours and minutes are both whole totals over the same interval, so a
/// 65 minute trip renders as `01:65`. Existing displays were built against
/// that output and it is kept as is.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use departure_board::domain::format_duration;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let dep = day.and_hms_opt(10, 0, 0).unwrap();
/// let arr = day.and_hms_opt(11, 5, 0).unwrap();
/// assert_eq!(format_duration(dep, arr), "01:65");
/// ```
pub fn format_duration(departure: NaiveDateTime, arrival: NaiveDateTime) -> String {
    let elapsed = arrival.signed_duration_since(departure);
    format!("{:02}:{:02}", elapsed.num_hours(), elapsed.num_minutes())
}

/// Shorten a destination name at the first space found at or after
/// character `after`.
///
/// `after == 0` disables truncation. Names without such a space are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use departure_board::domain::truncate_destination;
///
/// assert_eq!(truncate_destination("Stockholm Centralstation", 5), "Stockholm");
/// assert_eq!(truncate_destination("Slussen", 3), "Slussen");
/// assert_eq!(truncate_destination("T-Centralen spår 2", 0), "T-Centralen spår 2");
/// ```
pub fn truncate_destination(text: &str, after: usize) -> &str {
    if after == 0 {
        return text;
    }

    text.char_indices()
        .skip(after)
        .find(|(_, c)| *c == ' ')
        .map_or(text, |(byte_idx, _)| &text[..byte_idx])
}

/// Sort departures by time. Equal timestamps keep their relative order.
pub fn sort_departures(departures: &mut [Departure]) {
    departures.sort_by_key(|d| d.timestamp);
}
