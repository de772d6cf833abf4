//! Inputs and results of status syncs and reconciliation ticks

use chrono::{DateTime, Days, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::flight::Flight;
use super::status::FlightStatus;
use crate::errors::PartialSyncWarning;

/// Result of applying a status to a primary leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Primary leg as persisted.
    pub primary: Flight,
    /// Linked leg after propagation; `None` when nothing was propagated.
    pub linked: Option<Flight>,
    /// Set when the linked leg could not be updated.
    pub warning: Option<PartialSyncWarning>,
}

/// Aggregate counts reported by one reconciliation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// Candidates examined.
    pub total_flights: usize,
    /// Candidates whose status changed.
    pub updated_count: usize,
    /// Candidates that failed, panics included.
    pub error_count: usize,
    /// Updates that committed the primary leg but not its linked leg.
    #[serde(default)]
    pub warning_count: usize,
}

/// Repository query used to select reconciliation candidates.
///
/// The scheduled-departure range is half-open: `from <= t < to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilter {
    /// Inclusive lower bound on scheduled departure.
    pub scheduled_from: DateTime<Utc>,
    /// Exclusive upper bound on scheduled departure.
    pub scheduled_to: DateTime<Utc>,
    /// Statuses never selected.
    pub exclude_statuses: Vec<FlightStatus>,
}

impl CandidateFilter {
    /// Active, non-cancelled flights departing between the start of today and
    /// the end of tomorrow, where "today" is the local date in `tz`.
    pub fn for_reconcile(now: DateTime<Utc>, tz: Tz) -> Self {
        let today = now.with_timezone(&tz).date_naive();
        let day_after_tomorrow = today.checked_add_days(Days::new(2)).unwrap_or(today);
        Self {
            scheduled_from: local_midnight(tz, today),
            scheduled_to: local_midnight(tz, day_after_tomorrow),
            exclude_statuses: vec![FlightStatus::Cancelled],
        }
    }

    /// Whether `flight` is a candidate under this filter
    pub fn matches(&self, flight: &Flight) -> bool {
        flight.is_active
            && flight.scheduled_departure >= self.scheduled_from
            && flight.scheduled_departure < self.scheduled_to
            && !self.exclude_statuses.contains(&flight.status)
    }
}

/// First instant of `date` in `tz`. Midnights skipped by a DST change resolve
/// to the first valid instant after them.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + TimeDelta::hours(1))).earliest())
        .map_or_else(|| Utc.from_utc_datetime(&midnight), |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::types::{FlightPair, NewFlightPair};

    fn flight_departing(at: DateTime<Utc>) -> Flight {
        FlightPair::new(NewFlightPair {
            flight_number: "LH400".into(),
            airline_ref: "DLH".into(),
            origin_code: "FRA".into(),
            destination_code: "JFK".into(),
            scheduled_departure: at,
            scheduled_arrival: at + Duration::hours(8),
            estimated_departure: None,
            estimated_arrival: None,
        })
        .unwrap()
        .departure
    }

    #[test]
    fn utc_window_spans_today_and_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap();
        let filter = CandidateFilter::for_reconcile(now, Tz::UTC);
        assert_eq!(filter.scheduled_from, Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap());
        assert_eq!(filter.scheduled_to, Utc.with_ymd_and_hms(2026, 10, 21, 0, 0, 0).unwrap());
        assert_eq!(filter.exclude_statuses, vec![FlightStatus::Cancelled]);
    }

    #[test]
    fn local_day_is_used_for_airport_timezone() {
        // 23:30 UTC is already the next day in Madrid (UTC+2 in October).
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        let filter = CandidateFilter::for_reconcile(now, Tz::Europe__Madrid);
        assert_eq!(filter.scheduled_from, Utc.with_ymd_and_hms(2026, 10, 19, 22, 0, 0).unwrap());
    }

    #[test]
    fn matches_respects_bounds_status_and_activity() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let filter = CandidateFilter::for_reconcile(now, Tz::UTC);

        assert!(filter.matches(&flight_departing(now)));
        assert!(filter.matches(&flight_departing(filter.scheduled_from)));
        assert!(!filter.matches(&flight_departing(filter.scheduled_to)));
        assert!(!filter.matches(&flight_departing(filter.scheduled_from - Duration::seconds(1))));

        let mut cancelled = flight_departing(now);
        cancelled.status = FlightStatus::Cancelled;
        assert!(!filter.matches(&cancelled));

        let mut inactive = flight_departing(now);
        inactive.is_active = false;
        assert!(!filter.matches(&inactive));
    }
}
