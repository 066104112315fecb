//! Row selection and fading for a rendered board.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{Departure, VehicleIcon, cutoff};

/// How the board is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Rows shown at most.
    pub max_rows: usize,

    /// Rows departing sooner than this many minutes from now are hidden.
    pub skip_minutes: i64,

    /// Fade out the lower part of the board.
    pub fade: bool,

    /// Fraction of `max_rows` after which fading starts.
    pub fade_point: f64,

    /// CSS class overrides per icon.
    pub icon_classes: HashMap<VehicleIcon, String>,
}

impl DisplayConfig {
    /// CSS class for an icon, falling back to the built-in class.
    pub fn icon_class(&self, icon: VehicleIcon) -> &str {
        self.icon_classes
            .get(&icon)
            .map_or(icon.default_class(), String::as_str)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_rows: 6,
            skip_minutes: 0,
            fade: true,
            fade_point: 0.25,
            icon_classes: HashMap::new(),
        }
    }
}

/// One rendered board row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRow {
    pub departure_time: String,
    pub icon: Option<VehicleIcon>,
    pub icon_class: Option<String>,
    pub line: String,
    pub duration: String,
    pub destination: String,
    /// 1.0 is fully visible.
    pub opacity: f64,
}

/// Pick the rows to show at `now` and compute their opacity.
///
/// Departures before the cutoff are hidden; at most `max_rows` remain.
/// With fading on, rows from `max_rows * fade_point` onwards fade linearly
/// towards the last shown row.
pub fn visible_rows(
    departures: &[Departure],
    config: &DisplayConfig,
    now: NaiveDateTime,
) -> Vec<BoardRow> {
    let limit = cutoff(now, config.skip_minutes);
    let shown: Vec<&Departure> = departures
        .iter()
        .filter(|d| d.timestamp >= limit)
        .take(config.max_rows)
        .collect();

    let count = shown.len();
    shown
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            let icon = d.icon();
            BoardRow {
                departure_time: d.departure_time_text.clone(),
                icon,
                icon_class: icon.map(|icon| config.icon_class(icon).to_string()),
                line: d.line.clone(),
                duration: d.duration_text.clone(),
                destination: d.destination_text.clone(),
                opacity: row_opacity(i, count, config),
            }
        })
        .collect()
}

fn row_opacity(index: usize, shown: usize, config: &DisplayConfig) -> f64 {
    if !config.fade || config.fade_point >= 1.0 {
        return 1.0;
    }

    let start = config.max_rows as f64 * config.fade_point.max(0.0);
    let steps = shown.min(config.max_rows) as f64 - start;
    let position = index as f64;

    if position < start {
        1.0
    } else {
        1.0 - (position - start) / steps
    }
}
