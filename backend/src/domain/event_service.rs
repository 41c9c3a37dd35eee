//! Event CRUD services.
//!
//! Creation, update, and deletion live here; RSVP admission is the
//! responsibility of [`crate::domain::AdmissionService`]. Deletion removes
//! the event's attendance entries before the event row so no orphaned
//! ledger rows remain queryable.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{
    AttendanceLedger, AttendanceLedgerError, CreateEventRequest, DeleteEventRequest, EventCommand,
    EventQuery, EventStore, EventStoreError, UpdateEventRequest,
};
use crate::domain::{Event, EventId, EventValidationError, UserId};

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
        AttendanceLedgerError::Duplicate => {
            Error::internal("unexpected duplicate during ledger cleanup")
        }
        AttendanceLedgerError::Connection { message } => {
            Error::service_unavailable(format!("attendance ledger unavailable: {message}"))
        }
        AttendanceLedgerError::Query { message } => {
            Error::internal(format!("attendance ledger error: {message}"))
        }
    }
}

fn map_validation_error(error: &EventValidationError) -> Error {
    let field = match error {
        EventValidationError::EmptyTitle | EventValidationError::TitleTooLong { .. } => "title",
        EventValidationError::NonPositiveCapacity => "capacity",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// Event service implementing the command and query driving ports.
#[derive(Clone)]
pub struct EventService<S, L> {
    events: Arc<S>,
    ledger: Arc<L>,
}

impl<S, L> EventService<S, L> {
    /// Create a new service over the event store and attendance ledger.
    pub const fn new(events: Arc<S>, ledger: Arc<L>) -> Self {
        Self { events, ledger }
    }
}

impl<S, L> EventService<S, L>
where
    S: EventStore,
{
    async fn load_owned_event(
        &self,
        event_id: EventId,
        acting_user: UserId,
    ) -> Result<Event, Error> {
        let event = self
            .events
            .find_by_id(event_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("event {event_id} not found")))?;

        if event.created_by() != acting_user {
            return Err(Error::forbidden("only the event creator may do this"));
        }
        Ok(event)
    }
}

#[async_trait]
impl<S, L> EventCommand for EventService<S, L>
where
    S: EventStore,
    L: AttendanceLedger,
{
    async fn create_event(&self, request: CreateEventRequest) -> Result<Event, Error> {
        let event = Event::new(request.draft, request.created_by)
            .map_err(|err| map_validation_error(&err))?;

        self.events
            .insert(&event)
            .await
            .map_err(map_store_error)?;

        info!(event_id = %event.id(), capacity = event.capacity(), "event created");
        Ok(event)
    }

    async fn update_event(&self, request: UpdateEventRequest) -> Result<Event, Error> {
        request
            .patch
            .validate()
            .map_err(|err| map_validation_error(&err))?;
        self.load_owned_event(request.event_id, request.acting_user)
            .await?;

        self.events
            .update_details(request.event_id, &request.patch)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("event {} not found", request.event_id)))
    }

    async fn delete_event(&self, request: DeleteEventRequest) -> Result<(), Error> {
        self.load_owned_event(request.event_id, request.acting_user)
            .await?;

        // Ledger first: the attendance rows reference the event, and a
        // deleted event must leave nothing queryable by its id.
        let removed = self
            .ledger
            .remove_all_for(request.event_id)
            .await
            .map_err(map_ledger_error)?;

        self.events
            .delete(request.event_id)
            .await
            .map_err(map_store_error)?;

        info!(event_id = %request.event_id, attendances_removed = removed, "event deleted");
        Ok(())
    }
}

#[async_trait]
impl<S, L> EventQuery for EventService<S, L>
where
    S: EventStore,
    L: AttendanceLedger,
{
    async fn list_events(&self) -> Result<Vec<Event>, Error> {
        self.events.list().await.map_err(map_store_error)
    }

    async fn get_event(&self, event_id: EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(event_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("event {event_id} not found")))
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
