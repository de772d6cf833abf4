//! Domain constants
//!
//! Centralized thresholds and topic names used by the reconciliation engine.

// Status calculator windows (minutes)
/// Estimate later than schedule by more than this marks a leg delayed
pub const DELAY_THRESHOLD_MINUTES: i64 = 15;
/// Scheduled leg goes on-time this long before its scheduled time
pub const ON_TIME_WINDOW_MINUTES: i64 = 120;
/// On-time departure boards this long before scheduled departure
pub const BOARDING_WINDOW_MINUTES: i64 = 45;
/// Delayed departure boards this long before its estimate
pub const DELAYED_BOARDING_WINDOW_MINUTES: i64 = 30;
/// Boarding departure is departed this long after its expected time
pub const DEPARTED_GRACE_MINUTES: i64 = 15;
/// On-time arrival is in flight this long before scheduled arrival
pub const IN_FLIGHT_WINDOW_MINUTES: i64 = 60;
/// Delayed arrival is in flight this long before its estimate
pub const DELAYED_IN_FLIGHT_WINDOW_MINUTES: i64 = 45;

// Visibility (minutes)
/// Departed and landed legs stay on the boards this long
pub const CONCLUDED_VISIBLE_MINUTES: i64 = 30;
/// Cancelled legs stay on the boards this long after their scheduled time
pub const CANCELLED_VISIBLE_MINUTES: i64 = 120;

// Public display window contract (minutes)
/// Departure board shows legs scheduled up to this long ago
pub const DEPARTURE_BOARD_LOOKBACK_MINUTES: i64 = 120;
/// Arrival board shows legs scheduled up to this long ago
pub const ARRIVAL_BOARD_LOOKBACK_MINUTES: i64 = 60;
/// Both boards show legs scheduled up to this far ahead
pub const BOARD_LOOKAHEAD_MINUTES: i64 = 24 * 60;

// Reconciler defaults
/// Default seconds between reconciliation ticks
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 300;
/// Default bound on flights updated concurrently within a tick
pub const DEFAULT_MAX_CONCURRENT_UPDATES: usize = 8;
/// Default airport time zone
pub const DEFAULT_AIRPORT_TIMEZONE: &str = "UTC";

// Notification topics
/// Published once per leg whose status changed
pub const TOPIC_FLIGHT_STATUS_CHANGED: &str = "flight:status-changed";
/// Published once per sync operation
pub const TOPIC_FLIGHTS_SYNC_COMPLETED: &str = "flights:sync-completed";
