//! Integration tests for flight pairing and status types
//!
//! Scenarios cover how a pair is created from operator input, how both legs
//! serialize for the display layer, and how the transition graph constrains
//! each leg.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use fids_domain::{
    CandidateFilter, FidsError, Flight, FlightPair, FlightStatus, LegType, NewFlightPair,
    PairKey,
};

fn departure_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 21, 30, 0).unwrap()
}

fn input() -> NewFlightPair {
    NewFlightPair {
        flight_number: " ux1097 ".into(),
        airline_ref: "AEA".into(),
        origin_code: "pmi".into(),
        destination_code: "Mad".into(),
        scheduled_departure: departure_time(),
        scheduled_arrival: departure_time() + TimeDelta::minutes(75),
        estimated_departure: Some(departure_time() + TimeDelta::minutes(5)),
        estimated_arrival: None,
    }
}

// ============================================================================
// Pair creation
// ============================================================================

/// Scenario: an operator enters a late-evening domestic rotation
#[test]
fn test_pair_creation_normalizes_and_links_both_legs() {
    let pair = FlightPair::new(input()).unwrap();

    for leg in [&pair.departure, &pair.arrival] {
        assert_eq!(leg.flight_number, "UX1097");
        assert_eq!(leg.origin_code, "PMI");
        assert_eq!(leg.destination_code, "MAD");
        assert_eq!(leg.status, FlightStatus::Scheduled);
        assert!(leg.is_active);
        assert_eq!(leg.version, 0);
    }
    assert!(pair.is_symmetric());
    assert_eq!(pair.departure.linked_flight_id, Some(pair.arrival.id));
    assert_eq!(pair.arrival.linked_flight_id, Some(pair.departure.id));
    assert_eq!(pair.departure.pair_key(), pair.arrival.pair_key());
    assert_eq!(pair.departure.expected_time(), departure_time() + TimeDelta::minutes(5));
    assert_eq!(pair.arrival.expected_time(), departure_time() + TimeDelta::minutes(75));
}

#[test]
fn test_pair_creation_rejects_bad_input() {
    let cases: Vec<(&str, Box<dyn Fn(&mut NewFlightPair)>)> = vec![
        ("empty flight number", Box::new(|i| i.flight_number = "  ".into())),
        ("short code", Box::new(|i| i.origin_code = "PM".into())),
        ("non-alphabetic code", Box::new(|i| i.destination_code = "M4D".into())),
        ("same airports", Box::new(|i| i.destination_code = "PMI".into())),
        ("arrival before departure", Box::new(|i| i.scheduled_arrival = i.scheduled_departure)),
    ];

    for (name, mutate) in cases {
        let mut bad = input();
        mutate(&mut bad);
        assert!(
            matches!(FlightPair::new(bad), Err(FidsError::Validation(_))),
            "{name} accepted"
        );
    }
}

#[test]
fn test_deactivated_pair_is_never_a_candidate() {
    let mut pair = FlightPair::new(input()).unwrap();
    let filter = CandidateFilter::for_reconcile(departure_time() - TimeDelta::hours(3), Tz::UTC);
    assert!(filter.matches(&pair.departure));

    pair.deactivate();
    assert!(!pair.departure.is_active && !pair.arrival.is_active);
    assert!(!filter.matches(&pair.departure));
    assert!(!filter.matches(&pair.arrival));
}

// ============================================================================
// Serialization for the display layer
// ============================================================================

#[test]
fn test_flight_json_uses_kebab_case_statuses() {
    let mut pair = FlightPair::new(input()).unwrap();
    pair.arrival.status = FlightStatus::InFlight;

    let json = serde_json::to_value(&pair.arrival).unwrap();
    assert_eq!(json["status"], "in-flight");
    assert_eq!(json["leg_type"], "arrival");

    let back: Flight = serde_json::from_value(json).unwrap();
    assert_eq!(back, pair.arrival);
}

#[test]
fn test_flight_without_version_deserializes_at_zero() {
    let pair = FlightPair::new(input()).unwrap();
    let mut json = serde_json::to_value(&pair.departure).unwrap();
    json.as_object_mut().unwrap().remove("version");

    let flight: Flight = serde_json::from_value(json).unwrap();
    assert_eq!(flight.version, 0);
}

// ============================================================================
// Transition graph per leg
// ============================================================================

#[test]
fn test_only_arrivals_skip_boarding_into_flight() {
    assert!(FlightStatus::OnTime.can_transition_to(FlightStatus::InFlight, LegType::Arrival));
    assert!(FlightStatus::Delayed.can_transition_to(FlightStatus::InFlight, LegType::Arrival));
    assert!(!FlightStatus::OnTime.can_transition_to(FlightStatus::InFlight, LegType::Departure));
    assert!(!FlightStatus::Delayed.can_transition_to(FlightStatus::InFlight, LegType::Departure));
}

#[test]
fn test_final_statuses_have_no_successors() {
    for leg in [LegType::Departure, LegType::Arrival] {
        for status in FlightStatus::ALL {
            assert!(!FlightStatus::Landed.can_transition_to(status, leg));
            assert!(!FlightStatus::Cancelled.can_transition_to(status, leg));
        }
    }
}

#[test]
fn test_set_status_stamps_actual_times() {
    let mut pair = FlightPair::new(input()).unwrap();
    let at = departure_time() + TimeDelta::minutes(12);

    pair.departure.set_status(FlightStatus::Departed, at);
    assert_eq!(pair.departure.actual_departure, Some(at));
    assert!(pair.departure.is_terminal());

    pair.arrival.set_status(FlightStatus::InFlight, at);
    assert!(pair.arrival.actual_departure.is_none());
    assert!(!pair.arrival.is_terminal());

    pair.arrival.set_status(FlightStatus::Landed, at + TimeDelta::minutes(70));
    assert_eq!(pair.arrival.actual_arrival, Some(at + TimeDelta::minutes(70)));
}

#[test]
fn test_pair_key_for_unpaired_flight() {
    let pair = FlightPair::new(input()).unwrap();
    let mut orphan = pair.departure.clone();
    orphan.linked_flight_id = None;

    assert_eq!(orphan.pair_key(), PairKey::new(orphan.id, None));
    assert_ne!(orphan.pair_key(), pair.departure.pair_key());
    assert_eq!(orphan.pair_key().to_string(), orphan.id.to_string());
}
