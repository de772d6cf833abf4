//! Status sync engine - core business logic
//!
//! Applies a validated status transition to a primary leg, derives the effect
//! on its linked leg, and publishes change events. The primary transition is
//! authoritative: once it is persisted, failures on the linked leg are
//! downgraded to a [`PartialSyncWarning`] instead of being rolled back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fids_domain::constants::{TOPIC_FLIGHTS_SYNC_COMPLETED, TOPIC_FLIGHT_STATUS_CHANGED};
use fids_domain::{
    FidsError, Flight, FlightStatus, FlightStatusChanged, LegType, PartialSyncWarning, Result,
    StatusSyncCompleted, SyncOutcome,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::pair_locks::PairLocks;
use crate::clock_ports::Clock;
use crate::flights::ports::FlightRepository;
use crate::notifier_ports::Notifier;
use crate::status::StatusCalculator;

/// Status the linked leg takes when its partner moves to `new_status`.
///
/// | primary leg | new status | linked leg becomes |
/// |---|---|---|
/// | departure | departed | in-flight |
/// | departure | cancelled | cancelled |
/// | departure | delayed | delayed |
/// | departure | on-time | on-time |
/// | arrival | landed (linked is in-flight) | departed |
///
/// Every other combination propagates nothing.
pub fn propagated_status(
    primary_leg: LegType,
    new_status: FlightStatus,
    linked_status: FlightStatus,
) -> Option<FlightStatus> {
    match (primary_leg, new_status) {
        (LegType::Departure, FlightStatus::Departed) => Some(FlightStatus::InFlight),
        (LegType::Departure, FlightStatus::Cancelled) => Some(FlightStatus::Cancelled),
        (LegType::Departure, FlightStatus::Delayed) => Some(FlightStatus::Delayed),
        (LegType::Departure, FlightStatus::OnTime) => Some(FlightStatus::OnTime),
        (LegType::Arrival, FlightStatus::Landed) if linked_status == FlightStatus::InFlight => {
            Some(FlightStatus::Departed)
        }
        _ => None,
    }
}

/// Applies status transitions to flight pairs.
pub struct SyncEngine {
    repository: Arc<dyn FlightRepository>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    locks: PairLocks,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(
        repository: Arc<dyn FlightRepository>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { repository, clock, notifier, locks: PairLocks::new() }
    }

    /// Share an existing lock registry, e.g. with another engine instance
    /// serving API-triggered updates against the same store.
    pub fn with_locks(mut self, locks: PairLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Lock registry shared by every update this engine applies
    pub fn locks(&self) -> &PairLocks {
        &self.locks
    }

    /// Apply `new_status` to the flight at the clock's current time.
    ///
    /// # Errors
    /// See [`SyncEngine::apply_status`].
    pub async fn update_status(&self, flight_id: Uuid, new_status: FlightStatus) -> Result<SyncOutcome> {
        self.apply_status(flight_id, new_status, self.clock.now()).await
    }

    /// Apply `new_status` to the flight `flight_id` and propagate the effect
    /// to its linked leg, holding the pair lock throughout.
    ///
    /// # Errors
    /// - [`FidsError::NotFound`] if the flight is missing or inactive
    /// - [`FidsError::Transition`] if `new_status` is not reachable
    /// - repository errors raised while persisting the primary leg
    pub async fn apply_status(
        &self,
        flight_id: Uuid,
        new_status: FlightStatus,
        now: DateTime<Utc>,
    ) -> Result<SyncOutcome> {
        let key = self.load_active(flight_id).await?.pair_key();
        let _guard = self.locks.acquire(key).await;

        // Reload under the lock; the first read only located the pair.
        let primary = self.load_active(flight_id).await?;
        self.apply_locked(primary, new_status, now).await
    }

    /// Run the status calculator against a fresh copy of `candidate` and
    /// apply its result, all under the pair lock.
    ///
    /// Returns `Ok(None)` when the leg is terminal or no transition is due.
    ///
    /// # Errors
    /// Same as [`SyncEngine::apply_status`].
    pub async fn advance(
        &self,
        candidate: &Flight,
        calculator: &StatusCalculator,
        now: DateTime<Utc>,
    ) -> Result<Option<SyncOutcome>> {
        if candidate.is_terminal() {
            return Ok(None);
        }

        let _guard = self.locks.acquire(candidate.pair_key()).await;
        let flight = self.load_active(candidate.id).await?;

        match calculator.next_status(&flight, now) {
            Some(next) if next != flight.status => {
                self.apply_locked(flight, next, now).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    async fn load_active(&self, flight_id: Uuid) -> Result<Flight> {
        match self.repository.find_by_id(flight_id).await? {
            Some(flight) if flight.is_active => Ok(flight),
            _ => Err(FidsError::NotFound(flight_id)),
        }
    }

    async fn apply_locked(
        &self,
        primary: Flight,
        new_status: FlightStatus,
        now: DateTime<Utc>,
    ) -> Result<SyncOutcome> {
        let old_status = primary.status;
        if !old_status.can_transition_to(new_status, primary.leg_type) {
            return Err(FidsError::Transition {
                flight_id: primary.id,
                from: old_status,
                to: new_status,
            });
        }

        let mut updated = primary;
        updated.set_status(new_status, now);
        let primary = self.repository.save(&updated).await?;
        info!(
            flight_id = %primary.id,
            flight_number = %primary.flight_number,
            leg = %primary.leg_type,
            from = %old_status,
            to = %new_status,
            "flight.status.updated"
        );
        let primary_event = FlightStatusChanged::new(old_status, &primary);

        let mut linked = None;
        let mut linked_event = None;
        let mut warning = None;

        if let Some(linked_id) = primary.linked_flight_id {
            match self.propagate(&primary, linked_id, now).await {
                Ok(Some((linked_old, linked_flight))) => {
                    linked_event = Some(FlightStatusChanged::new(linked_old, &linked_flight));
                    linked = Some(linked_flight);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        flight_id = %primary.id,
                        linked_id = %linked_id,
                        error = %err,
                        "flight.status.partial_sync"
                    );
                    warning = Some(PartialSyncWarning {
                        primary_id: primary.id,
                        linked_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        self.publish(TOPIC_FLIGHT_STATUS_CHANGED, &primary_event);
        if let Some(event) = &linked_event {
            self.publish(TOPIC_FLIGHT_STATUS_CHANGED, event);
        }
        self.publish(
            TOPIC_FLIGHTS_SYNC_COMPLETED,
            &StatusSyncCompleted {
                primary: primary_event,
                linked: linked_event,
                warning: warning.clone(),
                occurred_at: now,
            },
        );

        Ok(SyncOutcome { primary, linked, warning })
    }

    /// Apply the propagation matrix to the linked leg. Returns the linked
    /// leg's previous status and its persisted state when it changed.
    async fn propagate(
        &self,
        primary: &Flight,
        linked_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<(FlightStatus, Flight)>> {
        let linked = self.load_active(linked_id).await?;

        let Some(target) = propagated_status(primary.leg_type, primary.status, linked.status)
        else {
            return Ok(None);
        };
        if linked.status == target {
            return Ok(None);
        }
        if linked.status.is_final() {
            debug!(
                linked_id = %linked.id,
                status = %linked.status,
                "flight.status.propagation_skipped_final"
            );
            return Ok(None);
        }

        let old_status = linked.status;
        let mut updated = linked;
        updated.set_status(target, now);
        let saved = self.repository.save(&updated).await?;
        info!(
            flight_id = %saved.id,
            primary_id = %primary.id,
            from = %old_status,
            to = %target,
            "flight.status.propagated"
        );
        Ok(Some((old_status, saved)))
    }

    fn publish<T: Serialize>(&self, topic: &str, event: &T) {
        let payload = match serde_json::to_value(event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(topic, error = %err, "notifier.serialize_failed");
                return;
            }
        };
        if let Err(err) = self.notifier.publish(topic, payload) {
            warn!(topic, error = %err, "notifier.publish_failed");
        }
    }
}
