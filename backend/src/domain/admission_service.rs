//! RSVP admission controller.
//!
//! Enforces that a join only succeeds while `attendees_count < capacity` and
//! that the counter and the attendance ledger stay consistent under
//! arbitrary interleavings of concurrent join/leave requests.
//!
//! Correctness is pushed down to atomic storage operations rather than an
//! in-process lock: request workers share no memory, so the guarded
//! compare-and-increment on the event row and the uniqueness-constrained
//! ledger insert are the only serialisation points.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{
    AdmissionControl, AttendanceLedger, AttendanceLedgerError, CounterUpdate, EventStore,
    EventStoreError, JoinOutcome,
};
use crate::domain::{EventId, UserId};

fn map_store_error(error: EventStoreError) -> Error {
    match error {
        EventStoreError::Connection { message } => {
            Error::service_unavailable(format!("event store unavailable: {message}"))
        }
        EventStoreError::Query { message } => {
            Error::internal(format!("event store error: {message}"))
        }
    }
}

fn map_ledger_error(error: AttendanceLedgerError) -> Error {
    match error {
        AttendanceLedgerError::Duplicate => Error::conflict("already joined"),
        AttendanceLedgerError::Connection { message } => {
            Error::service_unavailable(format!("attendance ledger unavailable: {message}"))
        }
        AttendanceLedgerError::Query { message } => {
            Error::internal(format!("attendance ledger error: {message}"))
        }
    }
}

/// Admission service implementing the [`AdmissionControl`] driving port.
#[derive(Clone)]
pub struct AdmissionService<S, L> {
    events: Arc<S>,
    ledger: Arc<L>,
}

impl<S, L> AdmissionService<S, L> {
    /// Create a new service over the event store and attendance ledger.
    pub const fn new(events: Arc<S>, ledger: Arc<L>) -> Self {
        Self { events, ledger }
    }
}

impl<S, L> AdmissionService<S, L>
where
    S: EventStore,
    L: AttendanceLedger,
{
    /// Reverse the counter increment after a failed ledger write.
    ///
    /// The increment and the ledger insert are not a single cross-entity
    /// transaction; this compensating decrement closes the brief window in
    /// which the counter runs ahead of the ledger.
    async fn compensate_increment(&self, event_id: EventId) {
        if let Err(error) = self.events.decrement_attendees(event_id).await {
            // The counter now over-reports until a leave reconciles it.
            warn!(%event_id, %error, "failed to compensate attendee counter");
        }
    }
}

#[async_trait]
impl<S, L> AdmissionControl for AdmissionService<S, L>
where
    S: EventStore,
    L: AttendanceLedger,
{
    async fn join(&self, user_id: UserId, event_id: EventId) -> Result<JoinOutcome, Error> {
        // Step 1: guarded increment. The store applies the capacity check and
        // the increment as one atomic operation; a read-compare-write here
        // would let two concurrent requests both observe a stale
        // under-capacity value.
        let update = self
            .events
            .try_increment_attendees(event_id)
            .await
            .map_err(map_store_error)?;

        let attendees_count = match update {
            CounterUpdate::NotFound => {
                return Err(Error::not_found(format!("event {event_id} not found")));
            }
            CounterUpdate::Full => return Ok(JoinOutcome::EventFull),
            CounterUpdate::Applied { attendees_count } => attendees_count,
        };

        // Step 3: the uniqueness-constrained ledger insert. A duplicate here
        // means the same user double-submitted and raced past step 1 twice.
        match self.ledger.record(user_id, event_id).await {
            Ok(()) => Ok(JoinOutcome::Joined { attendees_count }),
            Err(AttendanceLedgerError::Duplicate) => {
                self.compensate_increment(event_id).await;
                Ok(JoinOutcome::AlreadyJoined)
            }
            Err(error) => {
                // Treat an unfinished join as failed-after-step-1 and undo
                // the increment before surfacing the failure.
                self.compensate_increment(event_id).await;
                Err(map_ledger_error(error))
            }
        }
    }

    async fn leave(&self, user_id: UserId, event_id: EventId) -> Result<(), Error> {
        let removed = self
            .ledger
            .remove(user_id, event_id)
            .await
            .map_err(map_ledger_error)?;

        // Only a join that was actually recorded releases a seat; redundant
        // leave calls must not drive the counter below the ledger count.
        if removed {
            self.events
                .decrement_attendees(event_id)
                .await
                .map_err(map_store_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "admission_service_tests.rs"]
mod tests;
