//! Refresh configuration for the scheduler.

use std::time::Duration;

use crate::resrobot::NormalizeOptions;

/// Longest the scheduler ever waits between refreshes.
pub const MAX_POLL_DELAY: Duration = Duration::from_secs(60 * 60);

/// Configuration parameters for the refresh loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Base polling interval. Also the floor for adaptive delays.
    pub update_interval: Duration,

    /// Departures sooner than this many minutes from now are dropped.
    pub skip_minutes: i64,

    /// Number of rows the display shows. When more than this many cached
    /// departures are still ahead of the cutoff, a refresh skips the API.
    pub maximum_entries: usize,

    /// Destination names are cut at the first space after this many
    /// characters. Zero disables truncation.
    pub truncate_after: usize,
}

impl SchedulerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        update_interval: Duration,
        skip_minutes: i64,
        maximum_entries: usize,
        truncate_after: usize,
    ) -> Self {
        Self {
            update_interval,
            skip_minutes,
            maximum_entries,
            truncate_after,
        }
    }

    /// Options passed to the normalizer.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            skip_minutes: self.skip_minutes,
            truncate_after: self.truncate_after,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(5 * 60),
            skip_minutes: 0,
            maximum_entries: 6,
            truncate_after: 0,
        }
    }
}
