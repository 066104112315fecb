//! Unit tests for the refresh loop.

use super::*;
use crate::domain::StationId;
use crate::resrobot::{Leg, LegList, StopPoint, Trip};
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn id(s: &str) -> StationId {
    StationId::parse(s).unwrap()
}

fn route(from: &str, to: &str) -> Route {
    Route::new(id(from), id(to))
}

fn stop(name: &str, stop_id: &str, ts: NaiveDateTime) -> StopPoint {
    StopPoint {
        name: Some(name.to_string()),
        id: Some(stop_id.to_string()),
        date: Some(ts.format("%Y-%m-%d").to_string()),
        time: Some(ts.format("%H:%M:%S").to_string()),
    }
}

/// Build a response with one single-leg trip per departure time.
fn trips(dest_name: &str, dest_id: &str, line: &str, departs: &[NaiveDateTime]) -> TripList {
    TripList {
        trips: departs
            .iter()
            .map(|dep| Trip {
                leg_list: Some(LegList {
                    legs: vec![Leg {
                        origin: Some(stop("Origin", "1", *dep)),
                        destination: Some(stop(
                            dest_name,
                            dest_id,
                            *dep + chrono::Duration::minutes(10),
                        )),
                        transport_category: Some("BLT".to_string()),
                        transport_number: Some(line.to_string()),
                        ..Leg::default()
                    }],
                }),
                malformed: None,
            })
            .collect(),
    }
}

/// Mock trip provider for testing.
struct MockProvider {
    responses: HashMap<(String, String), TripList>,
    call_count: Cell<usize>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
            call_count: Cell::new(0),
        }
    }

    fn add(&mut self, from: &str, to: &str, list: TripList) {
        self.responses
            .insert((from.to_string(), to.to_string()), list);
    }

    fn api_call_count(&self) -> usize {
        self.call_count.get()
    }
}

impl TripProvider for MockProvider {
    async fn search_trips(&self, route: &Route) -> Result<TripList, ResRobotError> {
        self.call_count.set(self.call_count.get() + 1);
        self.responses
            .get(&(route.from.to_string(), route.to.to_string()))
            .cloned()
            .ok_or_else(|| ResRobotError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
    }
}

/// Display sink that records everything it is given.
#[derive(Default)]
struct RecordingSink {
    published: RefCell<Vec<Vec<Departure>>>,
    needs_configuration: Cell<bool>,
}

impl DisplaySink for RecordingSink {
    fn publish(&self, departures: &[Departure]) {
        self.published.borrow_mut().push(departures.to_vec());
    }

    fn needs_configuration(&self) {
        self.needs_configuration.set(true);
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
struct ManualClock(Rc<Cell<NaiveDateTime>>);

impl ManualClock {
    fn new(start: NaiveDateTime) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    fn set(&self, t: NaiveDateTime) {
        self.0.set(t);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.0.get()
    }
}

fn scheduler(
    provider: MockProvider,
    routes: Vec<Route>,
    config: SchedulerConfig,
    clock: &ManualClock,
) -> Scheduler<MockProvider, RecordingSink, ManualClock> {
    Scheduler::new(provider, RecordingSink::default(), routes, config).with_clock(clock.clone())
}

fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

fn lines(departures: &[Departure]) -> Vec<&str> {
    departures.iter().map(|d| d.line.as_str()).collect()
}

#[test]
fn schedule_next_empty_list_uses_base_interval() {
    let config = SchedulerConfig::default();
    assert_eq!(schedule_next(&[], at(10, 0), &config), minutes(5));
}

#[test]
fn schedule_next_within_bounds() {
    let config = SchedulerConfig::default();
    let list = normalize(
        &trips("X", "2", "1", &[at(10, 10)]),
        &[],
        &config.normalize_options(),
        at(10, 0),
    );
    assert_eq!(schedule_next(&list, at(10, 0), &config), minutes(10));
}

#[test]
fn schedule_next_caps_at_one_hour() {
    let config = SchedulerConfig::default();
    let list = normalize(
        &trips("X", "2", "1", &[at(13, 0)]),
        &[],
        &config.normalize_options(),
        at(10, 0),
    );
    assert_eq!(schedule_next(&list, at(10, 0), &config), MAX_POLL_DELAY);
}

#[test]
fn schedule_next_floors_at_base_interval() {
    let config = SchedulerConfig::default();
    let list = normalize(
        &trips("X", "2", "1", &[at(10, 2)]),
        &[],
        &config.normalize_options(),
        at(10, 0),
    );
    assert_eq!(schedule_next(&list, at(10, 0), &config), minutes(5));

    // A departure already behind the cutoff also waits the base interval.
    assert_eq!(schedule_next(&list, at(10, 30), &config), minutes(5));
}

#[test]
fn schedule_next_counts_from_cutoff() {
    let config = SchedulerConfig::new(minutes(5), 10, 6, 0);
    let list = normalize(
        &trips("X", "2", "1", &[at(10, 30)]),
        &[],
        &config.normalize_options(),
        at(10, 0),
    );
    assert_eq!(schedule_next(&list, at(10, 0), &config), minutes(20));
}

#[test]
fn schedule_next_base_interval_above_ceiling_wins() {
    let config = SchedulerConfig::new(minutes(90), 0, 6, 0);
    let list = normalize(
        &trips("X", "2", "1", &[at(10, 10)]),
        &[],
        &config.normalize_options(),
        at(10, 0),
    );
    assert_eq!(schedule_next(&list, at(10, 0), &config), minutes(90));
}

#[tokio::test]
async fn fetch_merges_routes_and_sorts() {
    let mut provider = MockProvider::new();
    provider.add("1", "2", trips("Slussen", "2", "A", &[at(10, 20), at(10, 5)]));
    provider.add("1", "3", trips("Ropsten", "3", "B", &[at(10, 10), at(10, 30)]));

    let clock = ManualClock::new(at(10, 0));
    let mut s = scheduler(
        provider,
        vec![route("1", "2"), route("1", "3")],
        SchedulerConfig::default(),
        &clock,
    );

    let report = s.refresh_cycle().await;

    assert_eq!(report.source, CycleSource::Network);
    assert_eq!(report.departures, 4);
    assert_eq!(report.failed_routes, 0);
    assert!(report.published);
    assert_eq!(s.provider().api_call_count(), 2);

    let times: Vec<_> = s.departures().iter().map(|d| d.timestamp).collect();
    assert_eq!(times, vec![at(10, 5), at(10, 10), at(10, 20), at(10, 30)]);
    assert_eq!(lines(s.departures()), vec!["A", "B", "A", "B"]);

    let published = s.sink().published.borrow();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0], s.departures());

    // Earliest departure is 5 minutes out, floored to the base interval.
    assert_eq!(report.next_delay, minutes(5));
}

#[tokio::test]
async fn failed_route_does_not_block_others() {
    let mut provider = MockProvider::new();
    provider.add("1", "2", trips("Slussen", "2", "A", &[at(10, 20)]));

    let clock = ManualClock::new(at(10, 0));
    let mut s = scheduler(
        provider,
        vec![route("1", "9"), route("1", "2")],
        SchedulerConfig::default(),
        &clock,
    );

    let report = s.refresh_cycle().await;

    assert_eq!(report.failed_routes, 1);
    assert_eq!(report.departures, 1);
    assert!(report.published);
    assert_eq!(report.next_delay, minutes(20));
    assert_eq!(s.provider().api_call_count(), 2);
}

#[tokio::test]
async fn empty_cycle_reschedules_without_publishing() {
    let clock = ManualClock::new(at(10, 0));
    let mut s = scheduler(
        MockProvider::new(),
        vec![route("1", "2")],
        SchedulerConfig::default(),
        &clock,
    );

    let report = s.refresh_cycle().await;

    assert_eq!(report.failed_routes, 1);
    assert!(!report.published);
    assert!(s.departures().is_empty());
    assert!(s.sink().published.borrow().is_empty());
    assert_eq!(report.next_delay, minutes(5));
}

#[tokio::test]
async fn reuses_cache_when_more_than_maximum_entries_remain() {
    let departs: Vec<_> = (1..=7).map(|i| at(10, i * 5)).collect();
    let mut provider = MockProvider::new();
    provider.add("1", "2", trips("Slussen", "2", "A", &departs));

    let clock = ManualClock::new(at(10, 0));
    let mut s = scheduler(
        provider,
        vec![route("1", "2")],
        SchedulerConfig::default(),
        &clock,
    );

    let first = s.refresh_cycle().await;
    assert_eq!(first.source, CycleSource::Network);
    assert_eq!(first.departures, 7);

    let second = s.refresh_cycle().await;
    assert_eq!(second.source, CycleSource::Cache);
    assert_eq!(second.departures, 7);
    assert!(second.published);
    assert_eq!(s.provider().api_call_count(), 1);

    let published = s.sink().published.borrow();
    assert_eq!(published.len(), 2);
    assert_eq!(published[1], published[0]);
    assert!(
        published[1]
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    );
}

#[tokio::test]
async fn fetches_again_when_cache_runs_low() {
    let departs: Vec<_> = (1..=7).map(|i| at(10, i * 5)).collect();
    let mut provider = MockProvider::new();
    provider.add("1", "2", trips("Slussen", "2", "A", &departs));

    let clock = ManualClock::new(at(10, 0));
    let mut s = scheduler(
        provider,
        vec![route("1", "2")],
        SchedulerConfig::default(),
        &clock,
    );
    s.refresh_cycle().await;

    // At 10:05 the first departure is no longer strictly after the cutoff,
    // leaving exactly six: not enough to skip the API.
    clock.set(at(10, 5));
    let report = s.refresh_cycle().await;

    assert_eq!(report.source, CycleSource::Network);
    assert_eq!(s.provider().api_call_count(), 2);
    // The canned response is re-normalized against the new time.
    assert_eq!(report.departures, 7);
    assert_eq!(s.departures()[0].timestamp, at(10, 5));
}

#[tokio::test]
async fn cached_departures_respect_skip_minutes() {
    let departs: Vec<_> = (1..=10).map(|i| at(10, i * 5)).collect();
    let mut provider = MockProvider::new();
    provider.add("1", "2", trips("Slussen", "2", "A", &departs));

    let clock = ManualClock::new(at(10, 0));
    let config = SchedulerConfig::new(minutes(5), 10, 6, 0);
    let mut s = scheduler(provider, vec![route("1", "2")], config, &clock);

    let first = s.refresh_cycle().await;
    // 10:05 is before the 10:10 cutoff.
    assert_eq!(first.departures, 9);

    clock.set(at(10, 2));
    let second = s.refresh_cycle().await;
    // Cutoff 10:12 drops 10:10; eight remain, more than six.
    assert_eq!(second.source, CycleSource::Cache);
    assert_eq!(second.departures, 8);
    assert_eq!(s.departures()[0].timestamp, at(10, 15));
    assert!(s.departures().iter().all(|d| d.timestamp > at(10, 12)));
}

#[tokio::test]
async fn label_from_any_route_applies_to_merged_list() {
    let mut provider = MockProvider::new();
    provider.add("1", "2", trips("Odenplan", "2", "A", &[at(10, 20)]));

    let clock = ManualClock::new(at(10, 0));
    let routes = vec![route("1", "2").with_label("Downtown")];
    let mut s = scheduler(provider, routes, SchedulerConfig::default(), &clock);

    s.refresh_cycle().await;
    assert_eq!(s.departures()[0].destination_text, "Downtown");
}

#[tokio::test]
async fn run_without_routes_requests_configuration() {
    let clock = ManualClock::new(at(10, 0));
    let mut s = scheduler(MockProvider::new(), vec![], SchedulerConfig::default(), &clock);

    s.run().await;

    assert!(s.sink().needs_configuration.get());
    assert_eq!(s.provider().api_call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn run_polls_at_base_interval_while_failing() {
    let clock = ManualClock::new(at(10, 0));
    let mut s = scheduler(
        MockProvider::new(),
        vec![route("1", "2"), route("1", "3")],
        SchedulerConfig::default(),
        &clock,
    );

    // Cycles at 0, 5 and 10 minutes; the next would be at 15.
    let result = tokio::time::timeout(minutes(11), s.run()).await;

    assert!(result.is_err());
    assert_eq!(s.provider().api_call_count(), 6);
    assert!(s.sink().published.borrow().is_empty());
}

#[tokio::test(start_paused = true)]
async fn run_waits_for_first_departure() {
    let mut provider = MockProvider::new();
    provider.add("1", "2", trips("Slussen", "2", "A", &[at(10, 20)]));

    let clock = ManualClock::new(at(10, 0));
    let mut s = scheduler(
        provider,
        vec![route("1", "2")],
        SchedulerConfig::default(),
        &clock,
    );

    // The clock is frozen, so every cycle sees a 20 minute wait.
    let result = tokio::time::timeout(minutes(39), s.run()).await;

    assert!(result.is_err());
    assert_eq!(s.provider().api_call_count(), 2);
    assert_eq!(s.sink().published.borrow().len(), 2);
}
