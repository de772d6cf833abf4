//! In-memory implementation of the flight store
//!
//! Backs the engine in tests and in single-process deployments. Every write
//! goes through the same optimistic version check, so a stale writer gets
//! `FidsError::Conflict` instead of silently overwriting a newer leg.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fids_core::FlightRepository;
use fids_domain::{CandidateFilter, FidsError, Flight, FlightPair, Result};
use tracing::{debug, info};
use uuid::Uuid;

/// DashMap-backed implementation of [`FlightRepository`].
#[derive(Debug, Default)]
pub struct InMemoryFlightRepository {
    flights: DashMap<Uuid, Flight>,
}

impl InMemoryFlightRepository {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store both legs of a newly created pair.
    ///
    /// # Errors
    /// Returns [`FidsError::Validation`] if either leg id is already stored or
    /// the legs are not linked to each other.
    pub fn insert_pair(&self, pair: &FlightPair) -> Result<()> {
        if !pair.is_symmetric() {
            return Err(FidsError::Validation(format!(
                "legs {} and {} are not linked to each other",
                pair.departure.id, pair.arrival.id
            )));
        }
        for leg in [&pair.departure, &pair.arrival] {
            if self.flights.contains_key(&leg.id) {
                return Err(FidsError::Validation(format!("flight {} already exists", leg.id)));
            }
        }

        self.flights.insert(pair.departure.id, pair.departure.clone());
        self.flights.insert(pair.arrival.id, pair.arrival.clone());
        info!(
            departure_id = %pair.departure.id,
            arrival_id = %pair.arrival.id,
            flight_number = %pair.departure.flight_number,
            "flight.pair.created"
        );
        Ok(())
    }

    /// Soft-delete a leg together with its linked leg.
    ///
    /// # Errors
    /// Returns [`FidsError::NotFound`] if `flight_id` is unknown.
    pub fn deactivate_pair(&self, flight_id: Uuid) -> Result<()> {
        let linked = self.deactivate_leg(flight_id)?;
        if let Some(linked_id) = linked {
            // A dangling link is tolerated; the primary leg is already hidden.
            if let Err(err) = self.deactivate_leg(linked_id) {
                debug!(flight_id = %flight_id, linked_id = %linked_id, error = %err, "flight.pair.linked_missing");
            }
        }
        info!(flight_id = %flight_id, "flight.pair.deactivated");
        Ok(())
    }

    /// Replace the published estimates of one leg, as an operator edit would.
    ///
    /// # Errors
    /// Returns [`FidsError::NotFound`] if `flight_id` is unknown.
    pub fn update_estimates(
        &self,
        flight_id: Uuid,
        estimated_departure: Option<DateTime<Utc>>,
        estimated_arrival: Option<DateTime<Utc>>,
    ) -> Result<Flight> {
        let mut flight = self.flights.get_mut(&flight_id).ok_or(FidsError::NotFound(flight_id))?;
        flight.estimated_departure = estimated_departure;
        flight.estimated_arrival = estimated_arrival;
        flight.version += 1;
        Ok(flight.clone())
    }

    /// Snapshot of every stored leg, ordered by scheduled time.
    pub fn all(&self) -> Vec<Flight> {
        let mut flights: Vec<Flight> = self.flights.iter().map(|entry| entry.value().clone()).collect();
        flights.sort_by_key(|flight| (flight.scheduled_time(), flight.id));
        flights
    }

    /// Number of stored legs
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    fn deactivate_leg(&self, flight_id: Uuid) -> Result<Option<Uuid>> {
        let mut flight = self.flights.get_mut(&flight_id).ok_or(FidsError::NotFound(flight_id))?;
        if flight.is_active {
            flight.is_active = false;
            flight.version += 1;
        }
        Ok(flight.linked_flight_id)
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Flight>> {
        Ok(self.flights.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_active_in_window(&self, filter: &CandidateFilter) -> Result<Vec<Flight>> {
        let mut flights: Vec<Flight> = self
            .flights
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        flights.sort_by_key(|flight| (flight.scheduled_time(), flight.id));
        Ok(flights)
    }

    async fn save(&self, flight: &Flight) -> Result<Flight> {
        match self.flights.entry(flight.id) {
            Entry::Vacant(_) => Err(FidsError::NotFound(flight.id)),
            Entry::Occupied(mut entry) => {
                let found = entry.get().version;
                if found != flight.version {
                    return Err(FidsError::Conflict {
                        flight_id: flight.id,
                        expected: flight.version,
                        found,
                    });
                }
                let mut saved = flight.clone();
                saved.version = found + 1;
                entry.insert(saved.clone());
                Ok(saved)
            }
        }
    }
}
