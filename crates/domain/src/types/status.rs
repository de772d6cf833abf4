//! Flight status and leg type
//!
//! The transition graph is leg-aware. Both legs share the base graph; arrival
//! legs additionally move from `on-time` or `delayed` straight to `in-flight`
//! because an arrival never boards at this airport.

use serde::{Deserialize, Serialize};

use crate::impl_status_conversions;

/// Which half of a physical flight a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegType {
    /// Leg leaving this airport.
    Departure,
    /// Leg arriving at this airport.
    Arrival,
}

impl_status_conversions!(LegType {
    Departure => "departure",
    Arrival => "arrival",
});

impl LegType {
    /// The leg type a linked record must have.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Departure => Self::Arrival,
            Self::Arrival => Self::Departure,
        }
    }
}

/// Public status of a flight leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlightStatus {
    /// Initial status of every leg.
    #[default]
    Scheduled,
    /// Inside the on-time window with no significant delay.
    OnTime,
    /// Estimate exceeds schedule by more than the delay threshold.
    Delayed,
    /// Departure is boarding.
    Boarding,
    /// Departure has left; final for departures.
    Departed,
    /// Airborne.
    InFlight,
    /// Arrival is on the ground; final.
    Landed,
    /// Cancelled; final.
    Cancelled,
}

impl_status_conversions!(FlightStatus {
    Scheduled => "scheduled",
    OnTime => "on-time",
    Delayed => "delayed",
    Boarding => "boarding",
    Departed => "departed",
    InFlight => "in-flight",
    Landed => "landed",
    Cancelled => "cancelled",
});

impl FlightStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 8] = [
        Self::Scheduled,
        Self::OnTime,
        Self::Delayed,
        Self::Boarding,
        Self::Departed,
        Self::InFlight,
        Self::Landed,
        Self::Cancelled,
    ];

    /// Statuses reachable from `self` on a leg of the given type.
    pub const fn successors(self, leg: LegType) -> &'static [Self] {
        use FlightStatus::{
            Boarding, Cancelled, Delayed, Departed, InFlight, Landed, OnTime, Scheduled,
        };

        match (self, leg) {
            (Scheduled, _) => &[OnTime, Delayed, Cancelled],
            (OnTime, LegType::Departure) => &[Delayed, Boarding, Cancelled],
            (OnTime, LegType::Arrival) => &[Delayed, Boarding, InFlight, Cancelled],
            (Delayed, LegType::Departure) => &[OnTime, Boarding, Cancelled],
            (Delayed, LegType::Arrival) => &[OnTime, Boarding, InFlight, Cancelled],
            (Boarding, _) => &[Departed, Delayed, Cancelled],
            (Departed, _) => &[InFlight],
            (InFlight, _) => &[Landed],
            (Landed | Cancelled, _) => &[],
        }
    }

    /// Whether `next` is an edge of the transition graph from `self`.
    pub fn can_transition_to(self, next: Self, leg: LegType) -> bool {
        self.successors(leg).contains(&next)
    }

    /// Landed and cancelled flights never change again.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Landed | Self::Cancelled)
    }

    /// Whether the status calculator is done with a leg in this status.
    ///
    /// A departed departure leg is finished from the calculator's point of
    /// view even though the graph still has a `departed -> in-flight` edge.
    pub const fn is_terminal_for(self, leg: LegType) -> bool {
        match (self, leg) {
            (Self::Landed | Self::Cancelled, _) | (Self::Departed, LegType::Departure) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_kebab_case() {
        assert_eq!(serde_json::to_string(&FlightStatus::OnTime).unwrap(), "\"on-time\"");
        assert_eq!(serde_json::to_string(&FlightStatus::InFlight).unwrap(), "\"in-flight\"");
        let parsed: FlightStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, FlightStatus::Cancelled);
        assert_eq!(serde_json::to_string(&LegType::Arrival).unwrap(), "\"arrival\"");
    }

    #[test]
    fn display_and_parse_agree() {
        for status in FlightStatus::ALL {
            assert_eq!(status.as_str().parse::<FlightStatus>().unwrap(), status);
        }
        assert_eq!("ON_TIME".parse::<FlightStatus>().unwrap(), FlightStatus::OnTime);
        assert!("taxiing".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn base_graph_edges() {
        let leg = LegType::Departure;
        assert!(FlightStatus::Scheduled.can_transition_to(FlightStatus::OnTime, leg));
        assert!(FlightStatus::Scheduled.can_transition_to(FlightStatus::Cancelled, leg));
        assert!(!FlightStatus::Scheduled.can_transition_to(FlightStatus::Boarding, leg));
        assert!(FlightStatus::Boarding.can_transition_to(FlightStatus::Departed, leg));
        assert!(FlightStatus::Departed.can_transition_to(FlightStatus::InFlight, leg));
        assert!(!FlightStatus::Departed.can_transition_to(FlightStatus::Cancelled, leg));
        assert!(FlightStatus::InFlight.can_transition_to(FlightStatus::Landed, leg));
    }

    #[test]
    fn arrivals_may_go_straight_to_in_flight() {
        assert!(FlightStatus::OnTime.can_transition_to(FlightStatus::InFlight, LegType::Arrival));
        assert!(FlightStatus::Delayed.can_transition_to(FlightStatus::InFlight, LegType::Arrival));
        assert!(!FlightStatus::OnTime.can_transition_to(FlightStatus::InFlight, LegType::Departure));
        assert!(!FlightStatus::Delayed.can_transition_to(FlightStatus::InFlight, LegType::Departure));
    }

    #[test]
    fn final_statuses_have_no_successors() {
        for leg in [LegType::Departure, LegType::Arrival] {
            assert!(FlightStatus::Landed.successors(leg).is_empty());
            assert!(FlightStatus::Cancelled.successors(leg).is_empty());
        }
        assert!(FlightStatus::Landed.is_final());
        assert!(!FlightStatus::Departed.is_final());
    }

    #[test]
    fn departed_is_terminal_only_for_departures() {
        assert!(FlightStatus::Departed.is_terminal_for(LegType::Departure));
        assert!(!FlightStatus::Departed.is_terminal_for(LegType::Arrival));
        assert!(FlightStatus::Cancelled.is_terminal_for(LegType::Arrival));
        assert!(!FlightStatus::InFlight.is_terminal_for(LegType::Arrival));
    }

    #[test]
    fn opposite_leg() {
        assert_eq!(LegType::Departure.opposite(), LegType::Arrival);
        assert_eq!(LegType::Arrival.opposite(), LegType::Departure);
    }
}
