//! Test doubles for the core ports
//!
//! Enabled with the `test-utils` feature so that `fids-infra` and integration
//! tests can drive the engine with pinned time and inspect published events.

#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};
use fids_domain::{FidsError, Result};
use serde_json::Value;

use crate::clock_ports::Clock;
use crate::notifier_ports::Notifier;

/// Clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use fids_core::testing::ManualClock;
/// use fids_core::Clock;
///
/// let start = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(TimeDelta::minutes(11));
/// assert_eq!(clock.now(), start + TimeDelta::minutes(11));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Clock pinned at `at`
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(at)) }
    }

    /// Jump to an absolute instant
    pub fn set(&self, at: DateTime<Utc>) {
        // Test utility: panic on poisoned mutex to fail tests early
        *self.now.lock().expect("mutex poisoned") = at;
    }

    /// Move forward (or backward, for a negative delta)
    pub fn advance(&self, by: TimeDelta) {
        // Test utility: panic on poisoned mutex to fail tests early
        let mut now = self.now.lock().expect("mutex poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        // Test utility: panic on poisoned mutex to fail tests early
        *self.now.lock().expect("mutex poisoned")
    }
}

/// A `(topic, payload)` pair captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Topic the event was published on.
    pub topic: String,
    /// Payload as published.
    pub payload: Value,
}

/// Notifier that keeps every published event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
    failing: Arc<Mutex<bool>>,
}

impl RecordingNotifier {
    /// Notifier with no recorded events
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent publish fail (events are still not recorded).
    pub fn fail_publishes(&self, failing: bool) {
        *self.failing.lock().expect("mutex poisoned") = failing;
    }

    /// Every recorded event in publish order
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().expect("mutex poisoned").clone()
    }

    /// Topics in publish order
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.events().into_iter().map(|event| event.topic).collect()
    }

    /// Payloads published on `topic`, in publish order
    #[must_use]
    pub fn events_for(&self, topic: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|event| event.topic == topic)
            .map(|event| event.payload)
            .collect()
    }

    /// Forget every recorded event
    pub fn clear(&self) {
        self.events.lock().expect("mutex poisoned").clear();
    }
}

impl Notifier for RecordingNotifier {
    fn publish(&self, topic: &str, payload: Value) -> Result<()> {
        if *self.failing.lock().expect("mutex poisoned") {
            return Err(FidsError::Internal(format!("publish to {topic} refused")));
        }
        self.events
            .lock()
            .expect("mutex poisoned")
            .push(RecordedEvent { topic: topic.to_string(), payload });
        Ok(())
    }
}
