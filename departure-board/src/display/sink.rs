//! Where published departures go.

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::Departure;

use super::rows::{DisplayConfig, visible_rows};

/// Receives the departure list whenever a refresh produces one.
///
/// Publishing is one-way: sinks cannot fail the refresh loop.
pub trait DisplaySink {
    /// Show a new sorted, non-empty departure list.
    fn publish(&self, departures: &[Departure]);

    /// No routes are configured; show a hint instead of departures.
    fn needs_configuration(&self);
}

impl<A: DisplaySink, B: DisplaySink> DisplaySink for (A, B) {
    fn publish(&self, departures: &[Departure]) {
        self.0.publish(departures);
        self.1.publish(departures);
    }

    fn needs_configuration(&self) {
        self.0.needs_configuration();
        self.1.needs_configuration();
    }
}

/// What the board currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    /// Nothing published yet.
    Loading,
    /// No routes configured.
    NeedsConfiguration,
    /// Latest published list.
    Departures {
        departures: Vec<Departure>,
        updated_at: NaiveDateTime,
    },
}

/// Prints the board to stdout.
#[derive(Debug, Clone)]
pub struct TerminalSink {
    config: DisplayConfig,
}

impl TerminalSink {
    pub fn new(config: DisplayConfig) -> Self {
        Self { config }
    }
}

impl DisplaySink for TerminalSink {
    fn publish(&self, departures: &[Departure]) {
        let now = chrono::Local::now().naive_local();
        let rows = visible_rows(departures, &self.config, now);
        info!(count = departures.len(), shown = rows.len(), "Departures updated");

        println!();
        for row in rows {
            let icon = row.icon.map(|i| i.to_string()).unwrap_or_default();
            println!(
                "{}  {:<6} {:>5}  {}  {}",
                row.departure_time, icon, row.line, row.duration, row.destination
            );
        }
    }

    fn needs_configuration(&self) {
        warn!("Please set at least one route to watch");
        println!("Please set at least one route to watch.");
    }
}

/// Keeps the latest state in a `watch` channel for other tasks to read.
#[derive(Debug)]
pub struct WatchSink {
    tx: watch::Sender<DisplayState>,
}

impl WatchSink {
    /// Create a sink and a receiver that starts in the loading state.
    pub fn new() -> (Self, watch::Receiver<DisplayState>) {
        let (tx, rx) = watch::channel(DisplayState::Loading);
        (Self { tx }, rx)
    }

    /// Another receiver for the same state.
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.tx.subscribe()
    }
}

impl DisplaySink for WatchSink {
    fn publish(&self, departures: &[Departure]) {
        self.tx.send_replace(DisplayState::Departures {
            departures: departures.to_vec(),
            updated_at: chrono::Local::now().naive_local(),
        });
    }

    fn needs_configuration(&self) {
        self.tx.send_replace(DisplayState::NeedsConfiguration);
    }
}
