//! Flight legs and the pairing between them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{FlightStatus, LegType};
use crate::errors::{FidsError, Result};

/// One leg (departure or arrival) of a physical flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Record identifier.
    pub id: Uuid,
    /// Commercial flight number, e.g. `IB3166`.
    pub flight_number: String,
    /// Operating airline reference.
    pub airline_ref: String,
    /// Which half of the physical flight this record is.
    pub leg_type: LegType,
    /// IATA code of the departure airport.
    pub origin_code: String,
    /// IATA code of the arrival airport.
    pub destination_code: String,
    /// Scheduled off-block time.
    pub scheduled_departure: DateTime<Utc>,
    /// Scheduled on-block time.
    pub scheduled_arrival: DateTime<Utc>,
    /// Published departure estimate.
    pub estimated_departure: Option<DateTime<Utc>>,
    /// Published arrival estimate.
    pub estimated_arrival: Option<DateTime<Utc>>,
    /// Stamped when the departure is marked departed.
    pub actual_departure: Option<DateTime<Utc>>,
    /// Stamped when the arrival is marked landed.
    pub actual_arrival: Option<DateTime<Utc>>,
    /// Current public status.
    pub status: FlightStatus,
    /// Lookup key of the paired leg. Never reassigned after creation.
    pub linked_flight_id: Option<Uuid>,
    /// Soft-delete flag; inactive legs are invisible to the engine.
    pub is_active: bool,
    /// Revision counter checked by repositories on save.
    #[serde(default)]
    pub version: u64,
}

impl Flight {
    /// True for the departure leg
    pub fn is_departure(&self) -> bool {
        self.leg_type == LegType::Departure
    }

    /// True for the arrival leg
    pub fn is_arrival(&self) -> bool {
        self.leg_type == LegType::Arrival
    }

    /// Scheduled time relevant to this leg's board.
    pub fn scheduled_time(&self) -> DateTime<Utc> {
        match self.leg_type {
            LegType::Departure => self.scheduled_departure,
            LegType::Arrival => self.scheduled_arrival,
        }
    }

    /// Estimated time relevant to this leg's board, if one was published.
    pub fn estimated_time(&self) -> Option<DateTime<Utc>> {
        match self.leg_type {
            LegType::Departure => self.estimated_departure,
            LegType::Arrival => self.estimated_arrival,
        }
    }

    /// Best known time for this leg: the estimate, falling back to the
    /// schedule.
    pub fn expected_time(&self) -> DateTime<Utc> {
        self.estimated_time().unwrap_or_else(|| self.scheduled_time())
    }

    /// Whether the status calculator has nothing left to do for this leg.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal_for(self.leg_type)
    }

    /// Key shared by both legs of a pair.
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.id, self.linked_flight_id)
    }

    /// Set `status`, stamping the actual time when the leg departs or lands.
    pub fn set_status(&mut self, status: FlightStatus, now: DateTime<Utc>) {
        match status {
            FlightStatus::Departed => self.actual_departure = Some(now),
            FlightStatus::Landed => self.actual_arrival = Some(now),
            _ => {}
        }
        self.status = status;
    }
}

/// Order-independent identifier of a departure/arrival pair.
///
/// Both legs of a pair produce the same key; an unpaired flight keys on its
/// own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(Uuid, Uuid);

impl PairKey {
    /// Key of the pair `id` belongs to
    pub fn new(id: Uuid, linked: Option<Uuid>) -> Self {
        match linked {
            Some(other) if other < id => Self(other, id),
            Some(other) => Self(id, other),
            None => Self(id, id),
        }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == self.1 {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{}+{}", self.0, self.1)
        }
    }
}

/// Input for creating the two legs of a flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFlightPair {
    /// Commercial flight number.
    pub flight_number: String,
    /// Operating airline reference.
    pub airline_ref: String,
    /// IATA code of the departure airport.
    pub origin_code: String,
    /// IATA code of the arrival airport.
    pub destination_code: String,
    /// Scheduled off-block time.
    pub scheduled_departure: DateTime<Utc>,
    /// Scheduled on-block time; must be after departure.
    pub scheduled_arrival: DateTime<Utc>,
    /// Initial departure estimate.
    #[serde(default)]
    pub estimated_departure: Option<DateTime<Utc>>,
    /// Initial arrival estimate.
    #[serde(default)]
    pub estimated_arrival: Option<DateTime<Utc>>,
}

/// A departure leg and its arrival leg, created together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightPair {
    /// Departure leg.
    pub departure: Flight,
    /// Arrival leg.
    pub arrival: Flight,
}

impl FlightPair {
    /// Validate `input` and build both legs with symmetric links.
    ///
    /// # Errors
    /// Returns [`FidsError::Validation`] when the flight number is empty, an
    /// airport code is not three letters, origin equals destination, or the
    /// scheduled arrival is not after the scheduled departure.
    pub fn new(input: NewFlightPair) -> Result<Self> {
        let flight_number = input.flight_number.trim().to_uppercase();
        if flight_number.is_empty() {
            return Err(FidsError::Validation("flight number must not be empty".into()));
        }
        let origin_code = normalize_airport_code("origin", &input.origin_code)?;
        let destination_code = normalize_airport_code("destination", &input.destination_code)?;
        if origin_code == destination_code {
            return Err(FidsError::Validation(format!(
                "origin and destination must differ (both {origin_code})"
            )));
        }
        if input.scheduled_arrival <= input.scheduled_departure {
            return Err(FidsError::Validation(format!(
                "scheduled arrival {} must be after scheduled departure {}",
                input.scheduled_arrival, input.scheduled_departure
            )));
        }

        let departure_id = Uuid::now_v7();
        let arrival_id = Uuid::now_v7();

        let departure = Flight {
            id: departure_id,
            flight_number,
            airline_ref: input.airline_ref,
            leg_type: LegType::Departure,
            origin_code,
            destination_code,
            scheduled_departure: input.scheduled_departure,
            scheduled_arrival: input.scheduled_arrival,
            estimated_departure: input.estimated_departure,
            estimated_arrival: input.estimated_arrival,
            actual_departure: None,
            actual_arrival: None,
            status: FlightStatus::Scheduled,
            linked_flight_id: Some(arrival_id),
            is_active: true,
            version: 0,
        };
        let arrival = Flight {
            id: arrival_id,
            leg_type: LegType::Arrival,
            linked_flight_id: Some(departure_id),
            ..departure.clone()
        };

        Ok(Self { departure, arrival })
    }

    /// Whether each leg links to the other and the leg types are opposite.
    pub fn is_symmetric(&self) -> bool {
        self.departure.linked_flight_id == Some(self.arrival.id)
            && self.arrival.linked_flight_id == Some(self.departure.id)
            && self.departure.leg_type == self.arrival.leg_type.opposite()
    }

    /// Soft-delete both legs together.
    pub fn deactivate(&mut self) {
        self.departure.is_active = false;
        self.arrival.is_active = false;
    }

    /// Key shared by both legs
    pub fn pair_key(&self) -> PairKey {
        self.departure.pair_key()
    }

    /// Split into `[departure, arrival]`
    pub fn into_legs(self) -> [Flight; 2] {
        [self.departure, self.arrival]
    }
}

fn normalize_airport_code(field: &str, code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(FidsError::Validation(format!("{field} airport code must be 3 letters, got '{code}'")))
    }
}
