//! Time-driven status calculation
//!
//! Decides, for a single leg at a single instant, whether the leg should move
//! to a new status. The calculator is pure: it reads only the flight snapshot
//! and `now`, and it never fails. Anything it cannot decide yields `None`.
//!
//! Windows are evaluated once per tick. A rule fires when `now` has entered
//! its window and has not yet reached the boundary of the rule that follows
//! it, so consecutive windows never overlap and a second evaluation at the
//! same instant yields `None`. There is no catch-up for windows a tick never
//! observed.

use chrono::{DateTime, TimeDelta, Utc};
use fids_domain::constants::{
    BOARDING_WINDOW_MINUTES, DELAYED_BOARDING_WINDOW_MINUTES, DELAYED_IN_FLIGHT_WINDOW_MINUTES,
    DELAY_THRESHOLD_MINUTES, DEPARTED_GRACE_MINUTES, IN_FLIGHT_WINDOW_MINUTES,
    ON_TIME_WINDOW_MINUTES,
};
use fids_domain::{Flight, FlightStatus, LegType};

/// Windows and grace periods used by [`StatusCalculator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusThresholds {
    /// Estimate later than schedule by more than this marks the leg delayed.
    pub delay_threshold: TimeDelta,
    /// Lead time before the scheduled time at which a leg goes on-time.
    pub on_time_window: TimeDelta,
    /// Lead time before departure at which an on-time departure boards.
    pub boarding_window: TimeDelta,
    /// Lead time before the estimate at which a delayed departure boards.
    pub delayed_boarding_window: TimeDelta,
    /// Time after the expected departure before a boarding leg is departed.
    pub departed_grace: TimeDelta,
    /// Lead time before arrival at which an on-time arrival is in flight.
    pub in_flight_window: TimeDelta,
    /// Lead time before the estimate at which a delayed arrival is in flight.
    pub delayed_in_flight_window: TimeDelta,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            delay_threshold: TimeDelta::minutes(DELAY_THRESHOLD_MINUTES),
            on_time_window: TimeDelta::minutes(ON_TIME_WINDOW_MINUTES),
            boarding_window: TimeDelta::minutes(BOARDING_WINDOW_MINUTES),
            delayed_boarding_window: TimeDelta::minutes(DELAYED_BOARDING_WINDOW_MINUTES),
            departed_grace: TimeDelta::minutes(DEPARTED_GRACE_MINUTES),
            in_flight_window: TimeDelta::minutes(IN_FLIGHT_WINDOW_MINUTES),
            delayed_in_flight_window: TimeDelta::minutes(DELAYED_IN_FLIGHT_WINDOW_MINUTES),
        }
    }
}

/// Pure status state machine driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCalculator {
    thresholds: StatusThresholds,
}

impl StatusCalculator {
    /// Calculator with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator with custom thresholds
    pub fn with_thresholds(thresholds: StatusThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use
    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    /// Status the leg should move to at `now`, if any.
    ///
    /// The result is always an edge of the leg's transition graph from its
    /// current status. Terminal legs (landed, cancelled, departed departures)
    /// always yield `None`.
    pub fn next_status(&self, flight: &Flight, now: DateTime<Utc>) -> Option<FlightStatus> {
        if flight.is_terminal() {
            return None;
        }

        let next = if self.should_mark_delayed(flight, now) {
            Some(FlightStatus::Delayed)
        } else {
            match flight.leg_type {
                LegType::Departure => self.next_departure_status(flight, now),
                LegType::Arrival => self.next_arrival_status(flight, now),
            }
        };

        next.filter(|status| flight.status.can_transition_to(*status, flight.leg_type))
    }

    fn should_mark_delayed(&self, flight: &Flight, now: DateTime<Utc>) -> bool {
        if matches!(
            flight.status,
            FlightStatus::Delayed | FlightStatus::Boarding | FlightStatus::InFlight
        ) {
            return false;
        }
        if !flight.status.can_transition_to(FlightStatus::Delayed, flight.leg_type) {
            return false;
        }
        let Some(estimated) = flight.estimated_time() else {
            return false;
        };
        // Past this point the delayed leg would already be due for its next
        // rule, so the delay is left to the regular windows.
        let delayed_window = match flight.leg_type {
            LegType::Departure => self.thresholds.delayed_boarding_window,
            LegType::Arrival => self.thresholds.delayed_in_flight_window,
        };
        estimated - flight.scheduled_time() > self.thresholds.delay_threshold
            && now < estimated - delayed_window
    }

    fn next_departure_status(&self, flight: &Flight, now: DateTime<Utc>) -> Option<FlightStatus> {
        let t = &self.thresholds;
        match flight.status {
            FlightStatus::Scheduled
                if within(
                    now,
                    flight.scheduled_departure - t.on_time_window,
                    flight.scheduled_departure - t.boarding_window,
                ) =>
            {
                Some(FlightStatus::OnTime)
            }
            FlightStatus::OnTime
                if within(
                    now,
                    flight.scheduled_departure - t.boarding_window,
                    flight.scheduled_departure.min(flight.expected_time() + t.departed_grace),
                ) =>
            {
                Some(FlightStatus::Boarding)
            }
            FlightStatus::Delayed
                if within_before(now, flight.expected_time(), t.delayed_boarding_window) =>
            {
                Some(FlightStatus::Boarding)
            }
            FlightStatus::Boarding
                if flight.actual_departure.is_none()
                    && now >= flight.expected_time() + t.departed_grace =>
            {
                Some(FlightStatus::Departed)
            }
            _ => None,
        }
    }

    fn next_arrival_status(&self, flight: &Flight, now: DateTime<Utc>) -> Option<FlightStatus> {
        let t = &self.thresholds;
        match flight.status {
            FlightStatus::Scheduled
                if within(
                    now,
                    flight.scheduled_arrival - t.on_time_window,
                    flight.scheduled_arrival - t.in_flight_window,
                ) =>
            {
                Some(FlightStatus::OnTime)
            }
            FlightStatus::OnTime
                if within(
                    now,
                    flight.scheduled_arrival - t.in_flight_window,
                    flight.scheduled_arrival.min(flight.expected_time()),
                ) =>
            {
                Some(FlightStatus::InFlight)
            }
            FlightStatus::Delayed
                if within_before(now, flight.expected_time(), t.delayed_in_flight_window) =>
            {
                Some(FlightStatus::InFlight)
            }
            FlightStatus::InFlight
                if flight.actual_arrival.is_none() && now >= flight.expected_time() =>
            {
                Some(FlightStatus::Landed)
            }
            _ => None,
        }
    }
}

/// `target - window <= now < target`
fn within_before(now: DateTime<Utc>, target: DateTime<Utc>, window: TimeDelta) -> bool {
    within(now, target - window, target)
}

/// `from <= now < until`
fn within(now: DateTime<Utc>, from: DateTime<Utc>, until: DateTime<Utc>) -> bool {
    from <= now && now < until
}
