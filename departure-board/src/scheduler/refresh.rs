//! The refresh loop.
//!
//! Each cycle either reuses the departures already held (when enough of
//! them are still ahead of the cutoff) or queries every route, merges the
//! results and publishes them. The next cycle is timed from the earliest
//! departure shown.

use std::time::Duration;

use chrono::NaiveDateTime;
use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::display::DisplaySink;
use crate::domain::{Departure, Route, cutoff, sort_departures};
use crate::resrobot::{ResRobotError, TripList, normalize};

use super::config::{MAX_POLL_DELAY, SchedulerConfig};

/// Source of trip search results.
///
/// This abstraction allows the scheduler to be tested with mock data.
#[allow(async_fn_in_trait)]
pub trait TripProvider {
    /// Search trips between a route's stops, starting now.
    async fn search_trips(&self, route: &Route) -> Result<TripList, ResRobotError>;
}

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone, which is the timezone the API reports
/// departure times in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Where a cycle's departures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleSource {
    /// Held departures were reused; no requests were made.
    Cache,
    /// Every route was queried.
    Network,
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub source: CycleSource,
    /// Departures held after the cycle.
    pub departures: usize,
    /// Routes whose request failed this cycle.
    pub failed_routes: usize,
    /// Whether the display was updated.
    pub published: bool,
    /// Wait before the next cycle.
    pub next_delay: Duration,
}

/// Compute the wait before the next refresh.
///
/// Aims for the moment the earliest departure passes the cutoff, but never
/// sooner than the update interval and never later than an hour. An empty
/// list waits exactly the update interval.
pub fn schedule_next(
    departures: &[Departure],
    now: NaiveDateTime,
    config: &SchedulerConfig,
) -> Duration {
    let Some(first) = departures.first() else {
        return config.update_interval;
    };

    let raw = first
        .timestamp
        .signed_duration_since(cutoff(now, config.skip_minutes))
        .to_std()
        .unwrap_or(Duration::ZERO);

    raw.min(MAX_POLL_DELAY).max(config.update_interval)
}

/// Owns the departure list and drives the refresh loop.
pub struct Scheduler<P, D, C = SystemClock> {
    provider: P,
    sink: D,
    clock: C,
    routes: Vec<Route>,
    config: SchedulerConfig,
    departures: Vec<Departure>,
}

impl<P: TripProvider, D: DisplaySink> Scheduler<P, D, SystemClock> {
    /// Create a scheduler using the system clock.
    pub fn new(provider: P, sink: D, routes: Vec<Route>, config: SchedulerConfig) -> Self {
        Self {
            provider,
            sink,
            clock: SystemClock,
            routes,
            config,
            departures: Vec::new(),
        }
    }
}

impl<P: TripProvider, D: DisplaySink, C: Clock> Scheduler<P, D, C> {
    /// Replace the clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Scheduler<P, D, C2> {
        Scheduler {
            provider: self.provider,
            sink: self.sink,
            clock,
            routes: self.routes,
            config: self.config,
            departures: self.departures,
        }
    }

    /// Departures currently held, sorted by time.
    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Run one refresh cycle and report what happened.
    ///
    /// The caller is responsible for waiting `next_delay` before the next
    /// cycle; [`Scheduler::run`] does this.
    pub async fn refresh_cycle(&mut self) -> CycleReport {
        let limit = cutoff(self.clock.now(), self.config.skip_minutes);

        let mut held = std::mem::take(&mut self.departures);
        held.retain(|d| d.timestamp > limit);

        let (source, failed_routes) = if held.len() > self.config.maximum_entries {
            info!(count = held.len(), "Reusing cached departures");
            self.departures = held;
            (CycleSource::Cache, 0)
        } else {
            info!(routes = self.routes.len(), "Fetching new departure data");
            let (fresh, failed) = self.fetch_all().await;
            self.departures = fresh;
            (CycleSource::Network, failed)
        };

        let published = !self.departures.is_empty();
        if published {
            self.sink.publish(&self.departures);
        } else {
            debug!("No usable departures, display left unchanged");
        }

        let next_delay = schedule_next(&self.departures, self.clock.now(), &self.config);
        debug!(
            delay_secs = next_delay.as_secs(),
            departures = self.departures.len(),
            "Next refresh scheduled"
        );

        CycleReport {
            source,
            departures: self.departures.len(),
            failed_routes,
            published,
            next_delay,
        }
    }

    /// Query every route concurrently, then merge the results.
    ///
    /// Nothing is sorted or returned until every request has settled. A
    /// failed route contributes no departures.
    async fn fetch_all(&self) -> (Vec<Departure>, usize) {
        let provider = &self.provider;
        let requests = self.routes.iter().map(|route| async move {
            let result = provider.search_trips(route).await;
            (route, result)
        });

        let results = join_all(requests).await;

        let now = self.clock.now();
        let options = self.config.normalize_options();
        let mut merged = Vec::new();
        let mut failed = 0;

        for (route, result) in results {
            match result {
                Ok(list) => {
                    let batch = normalize(&list, &self.routes, &options, now);
                    debug!(
                        from = %route.from,
                        to = %route.to,
                        count = batch.len(),
                        "Route refreshed"
                    );
                    merged.extend(batch);
                }
                Err(e) => {
                    failed += 1;
                    warn!(
                        from = %route.from,
                        to = %route.to,
                        error = %e,
                        "Failed to fetch departures, using none for this route"
                    );
                }
            }
        }

        sort_departures(&mut merged);
        (merged, failed)
    }

    /// Refresh forever.
    ///
    /// A single timer is kept and re-armed after every cycle, so there is
    /// never more than one refresh pending. Returns immediately, after
    /// telling the display, when no routes are configured.
    pub async fn run(&mut self) {
        if self.routes.is_empty() {
            warn!("No routes configured, not polling");
            self.sink.needs_configuration();
            return;
        }

        let timer = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(timer);

        loop {
            timer.as_mut().await;
            let report = self.refresh_cycle().await;
            timer.as_mut().reset(Instant::now() + report.next_delay);
        }
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
