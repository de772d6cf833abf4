//! Public display visibility
//!
//! The public read path first restricts each board to its display window and
//! then drops flights that concluded (departed, landed) or were cancelled long
//! enough ago. [`VisibilityFilter::should_hide`] implements only the second
//! step; [`DisplayWindow`] documents the first so that readers apply the same
//! bounds everywhere.

use chrono::{DateTime, TimeDelta, Utc};
use fids_domain::constants::{
    ARRIVAL_BOARD_LOOKBACK_MINUTES, BOARD_LOOKAHEAD_MINUTES, CANCELLED_VISIBLE_MINUTES,
    CONCLUDED_VISIBLE_MINUTES, DEPARTURE_BOARD_LOOKBACK_MINUTES,
};
use fids_domain::{Flight, FlightStatus, LegType};

/// Inclusive time range a public board shows, keyed on the leg's scheduled
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    /// Inclusive lower bound.
    pub from: DateTime<Utc>,
    /// Exclusive upper bound.
    pub to: DateTime<Utc>,
}

impl DisplayWindow {
    /// Departures: `[now - 2h, now + 24h]`. Arrivals: `[now - 1h, now + 24h]`.
    pub fn for_leg(leg: LegType, now: DateTime<Utc>) -> Self {
        let lookback = match leg {
            LegType::Departure => DEPARTURE_BOARD_LOOKBACK_MINUTES,
            LegType::Arrival => ARRIVAL_BOARD_LOOKBACK_MINUTES,
        };
        Self {
            from: now - TimeDelta::minutes(lookback),
            to: now + TimeDelta::minutes(BOARD_LOOKAHEAD_MINUTES),
        }
    }

    /// Whether `at` falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && at <= self.to
    }
}

/// Decides when a concluded or cancelled flight leaves the public boards.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityFilter {
    concluded_visible_for: TimeDelta,
    cancelled_visible_for: TimeDelta,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self {
            concluded_visible_for: TimeDelta::minutes(CONCLUDED_VISIBLE_MINUTES),
            cancelled_visible_for: TimeDelta::minutes(CANCELLED_VISIBLE_MINUTES),
        }
    }
}

impl VisibilityFilter {
    /// Filter with the default visibility periods
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `flight` must be hidden from public output at `now`.
    pub fn should_hide(&self, flight: &Flight, now: DateTime<Utc>) -> bool {
        match flight.status {
            FlightStatus::Departed => flight
                .actual_departure
                .is_some_and(|at| now - at > self.concluded_visible_for),
            FlightStatus::Landed => flight
                .actual_arrival
                .is_some_and(|at| now - at > self.concluded_visible_for),
            FlightStatus::Cancelled => now - flight.scheduled_time() > self.cancelled_visible_for,
            _ => false,
        }
    }

    /// Build one public board: active legs of `leg` type inside the display
    /// window that are not hidden, ordered by scheduled time.
    pub fn visible_board<I>(&self, flights: I, leg: LegType, now: DateTime<Utc>) -> Vec<Flight>
    where
        I: IntoIterator<Item = Flight>,
    {
        let window = DisplayWindow::for_leg(leg, now);
        let mut board: Vec<Flight> = flights
            .into_iter()
            .filter(|flight| flight.is_active && flight.leg_type == leg)
            .filter(|flight| window.contains(flight.scheduled_time()))
            .filter(|flight| !self.should_hide(flight, now))
            .collect();
        board.sort_by_key(Flight::scheduled_time);
        board
    }
}
