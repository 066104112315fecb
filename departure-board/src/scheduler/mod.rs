//! Adaptive departure refresh.
//!
//! The scheduler polls every configured route, merges the results into one
//! sorted list and republishes it. Polling is timed from the earliest
//! departure shown, bounded below by the update interval and above by an
//! hour, and skipped entirely while enough cached departures remain.

mod config;
mod refresh;

pub use config::{MAX_POLL_DELAY, SchedulerConfig};
pub use refresh::{
    Clock, CycleReport, CycleSource, Scheduler, SystemClock, TripProvider, schedule_next,
};
