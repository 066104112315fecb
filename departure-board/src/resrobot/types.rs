//! ResRobot trip search response DTOs.
//!
//! These map directly to the JSON returned by the `trip` endpoint. Every
//! field is optional and each trip is decoded on its own: a trip with a
//! missing or mistyped piece is rejected during conversion, one trip at a
//! time, instead of failing the whole response.

use serde::{Deserialize, Deserializer};

/// Top-level `trip` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripList {
    /// Trips, earliest first. Absent when nothing matched.
    #[serde(rename = "Trip", default, deserialize_with = "trips_each")]
    pub trips: Vec<Trip>,
}

/// One suggested journey between the requested stops.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trip {
    #[serde(rename = "LegList")]
    pub leg_list: Option<LegList>,

    /// Decode error when this trip's JSON did not match the expected shape.
    #[serde(skip)]
    pub malformed: Option<String>,
}

impl Trip {
    /// A placeholder for a trip whose JSON could not be decoded.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            leg_list: None,
            malformed: Some(message.into()),
        }
    }

    /// The first leg, if the trip has any.
    pub fn first_leg(&self) -> Option<&Leg> {
        self.leg_list.as_ref()?.legs.first()
    }
}

/// Wrapper around a trip's legs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegList {
    #[serde(rename = "Leg", default)]
    pub legs: Vec<Leg>,
}

/// One directed segment of a trip.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    #[serde(rename = "Origin")]
    pub origin: Option<StopPoint>,

    #[serde(rename = "Destination")]
    pub destination: Option<StopPoint>,

    /// Full product name, e.g. "Länstrafik - Buss 4".
    pub name: Option<String>,

    /// Leg kind: "JNY" for a vehicle, "WALK"/"TRSF" for walks.
    #[serde(rename = "type")]
    pub leg_type: Option<String>,

    /// Vehicle category code, e.g. "BLT".
    pub transport_category: Option<String>,

    /// Line number. Sent as a string, but some feeds use a bare number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub transport_number: Option<String>,
}

/// A stop with its scheduled time on a leg.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopPoint {
    pub name: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,

    /// `YYYY-MM-DD`, local.
    pub date: Option<String>,

    /// `HH:MM:SS`, local.
    pub time: Option<String>,
}

/// Decode the `Trip` array element by element, keeping undecodable
/// trips as placeholders.
fn trips_each<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Trip>, D::Error> {
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|e| Trip::malformed(e.to_string()))
        })
        .collect())
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
