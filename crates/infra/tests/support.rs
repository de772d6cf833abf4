#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use fids_domain::{FlightPair, NewFlightPair};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

type LogRecord = (Level, String);
type LogBuffer = Vec<LogRecord>;

/// Monday morning used as "now" across the infra tests.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 7, 30, 0).unwrap()
}

/// A LIS→FNC pair departing at `departure` with a 1h45 block time.
pub fn pair_departing(flight_number: &str, departure: DateTime<Utc>) -> FlightPair {
    FlightPair::new(NewFlightPair {
        flight_number: flight_number.to_string(),
        airline_ref: "TAP".to_string(),
        origin_code: "LIS".to_string(),
        destination_code: "FNC".to_string(),
        scheduled_departure: departure,
        scheduled_arrival: departure + TimeDelta::minutes(105),
        estimated_departure: None,
        estimated_arrival: None,
    })
    .expect("valid flight pair")
}

/// Handle for inspecting captured log records during tests.
///
/// Records are kept for as long as the handle lives; dropping it restores
/// the previous thread-local subscriber.
pub struct LogHandle {
    records: Arc<Mutex<LogBuffer>>,
    _guard: DefaultGuard,
}

impl LogHandle {
    /// Return all captured log messages.
    pub fn entries(&self) -> LogBuffer {
        self.records.lock().expect("log mutex poisoned").clone()
    }

    /// Check whether a log message matching the pattern exists.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries().into_iter().any(|(lvl, msg)| lvl == level && msg.contains(needle))
    }

    pub fn count(&self, needle: &str) -> usize {
        self.entries().into_iter().filter(|(_, msg)| msg.contains(needle)).count()
    }
}

struct CaptureLayer {
    records: Arc<Mutex<LogBuffer>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let mut guard = self.records.lock().expect("log mutex poisoned");
        guard.push((*event.metadata().level(), visitor.message));
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

/// Capture every event emitted on the current thread.
///
/// Pair with a current-thread runtime so spawned tasks log through the
/// same subscriber.
pub fn capture_logs() -> LogHandle {
    let records = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(CaptureLayer { records: Arc::clone(&records) });
    let guard = tracing::subscriber::set_default(subscriber);
    LogHandle { records, _guard: guard }
}
