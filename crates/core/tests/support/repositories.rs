//! Mock repository implementations for testing
//!
//! Provides an in-memory `FlightRepository` with the same optimistic version
//! check as a real store, plus failure injection for individual flights.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fids_core::FlightRepository;
use fids_domain::{CandidateFilter, FidsError, Flight, Result as DomainResult};
use uuid::Uuid;

/// In-memory mock for `FlightRepository`.
///
/// Yields to the scheduler between reading and writing inside `save`, so
/// unsynchronized callers racing on one flight surface as `Conflict` errors.
#[derive(Default, Clone)]
pub struct MockFlightRepository {
    flights: Arc<Mutex<HashMap<Uuid, Flight>>>,
    failing_saves: Arc<Mutex<HashSet<Uuid>>>,
    failing_reads: Arc<Mutex<HashSet<Uuid>>>,
    panicking_reads: Arc<Mutex<HashSet<Uuid>>>,
    fail_queries: Arc<Mutex<bool>>,
}

impl MockFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a flight as-is, bypassing the version check.
    pub fn insert(&self, flight: Flight) {
        self.flights.lock().unwrap().insert(flight.id, flight);
    }

    pub fn get(&self, id: Uuid) -> Option<Flight> {
        self.flights.lock().unwrap().get(&id).cloned()
    }

    /// Make every `save` of `id` fail with a repository error.
    pub fn fail_saves_for(&self, id: Uuid) {
        self.failing_saves.lock().unwrap().insert(id);
    }

    /// Make every `find_by_id` of `id` fail with a repository error.
    pub fn fail_reads_for(&self, id: Uuid) {
        self.failing_reads.lock().unwrap().insert(id);
    }

    /// Make every `find_by_id` of `id` panic.
    pub fn panic_on_read_of(&self, id: Uuid) {
        self.panicking_reads.lock().unwrap().insert(id);
    }

    /// Make candidate queries fail.
    pub fn fail_queries(&self) {
        *self.fail_queries.lock().unwrap() = true;
    }

    /// Change a stored flight in place, bumping its version like a
    /// concurrent writer would.
    pub fn modify(&self, id: Uuid, change: impl FnOnce(&mut Flight)) {
        let mut flights = self.flights.lock().unwrap();
        if let Some(flight) = flights.get_mut(&id) {
            change(flight);
            flight.version += 1;
        }
    }
}

#[async_trait]
impl FlightRepository for MockFlightRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Flight>> {
        if self.panicking_reads.lock().unwrap().contains(&id) {
            panic!("injected panic reading {id}");
        }
        if self.failing_reads.lock().unwrap().contains(&id) {
            return Err(FidsError::Repository(format!("read of {id} failed")));
        }
        Ok(self.get(id))
    }

    async fn find_active_in_window(&self, filter: &CandidateFilter) -> DomainResult<Vec<Flight>> {
        if *self.fail_queries.lock().unwrap() {
            return Err(FidsError::Repository("candidate query failed".into()));
        }
        let mut flights: Vec<Flight> =
            self.flights.lock().unwrap().values().filter(|f| filter.matches(f)).cloned().collect();
        flights.sort_by_key(|f| (f.scheduled_time(), f.id));
        Ok(flights)
    }

    async fn save(&self, flight: &Flight) -> DomainResult<Flight> {
        if self.failing_saves.lock().unwrap().contains(&flight.id) {
            return Err(FidsError::Repository(format!("write of {} failed", flight.id)));
        }

        let found = self
            .get(flight.id)
            .map(|stored| stored.version)
            .ok_or(FidsError::NotFound(flight.id))?;

        tokio::task::yield_now().await;

        let mut flights = self.flights.lock().unwrap();
        let stored = flights.get_mut(&flight.id).ok_or(FidsError::NotFound(flight.id))?;
        if stored.version != flight.version || found != flight.version {
            return Err(FidsError::Conflict {
                flight_id: flight.id,
                expected: flight.version,
                found: stored.version,
            });
        }
        let mut saved = flight.clone();
        saved.version += 1;
        *stored = saved.clone();
        Ok(saved)
    }
}
