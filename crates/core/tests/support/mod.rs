//! Shared test helpers for `fids-core` integration tests.
//!
//! Fixtures build realistic flight pairs at fixed instants and the mock
//! repository stands in for the flight store.

#![allow(dead_code)]

pub mod repositories;

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use fids_core::testing::{ManualClock, RecordingNotifier};
use fids_core::SyncEngine;
use fids_domain::{FlightPair, NewFlightPair};

pub use repositories::MockFlightRepository;

/// 10:00 UTC on a fixed test day.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap()
}

/// A MAD -> CDG pair departing at `departure` with a two hour block.
pub fn pair_departing(flight_number: &str, departure: DateTime<Utc>) -> FlightPair {
    FlightPair::new(NewFlightPair {
        flight_number: flight_number.into(),
        airline_ref: "IBE".into(),
        origin_code: "MAD".into(),
        destination_code: "CDG".into(),
        scheduled_departure: departure,
        scheduled_arrival: departure + TimeDelta::hours(2),
        estimated_departure: None,
        estimated_arrival: None,
    })
    .unwrap()
}

/// Engine wired to a fresh mock repository, a pinned clock and a recording
/// notifier.
pub struct Harness {
    pub repository: MockFlightRepository,
    pub clock: ManualClock,
    pub notifier: RecordingNotifier,
    pub engine: Arc<SyncEngine>,
}

impl Harness {
    pub fn new(now: DateTime<Utc>) -> Self {
        let repository = MockFlightRepository::new();
        let clock = ManualClock::new(now);
        let notifier = RecordingNotifier::new();
        let engine = Arc::new(SyncEngine::new(
            Arc::new(repository.clone()),
            Arc::new(clock.clone()),
            Arc::new(notifier.clone()),
        ));
        Self { repository, clock, notifier, engine }
    }

    pub fn seed(&self, pair: &FlightPair) {
        self.repository.insert(pair.departure.clone());
        self.repository.insert(pair.arrival.clone());
    }
}
