//! Driving port for event creation, update, and deletion.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventDraft, EventId, EventPatch, UserId};

/// Request to create an event.
#[derive(Debug, Clone)]
pub struct CreateEventRequest {
    /// Caller-supplied event fields.
    pub draft: EventDraft,
    /// The authenticated creator.
    pub created_by: UserId,
}

/// Request to update an event's presentation fields.
#[derive(Debug, Clone)]
pub struct UpdateEventRequest {
    /// Target event.
    pub event_id: EventId,
    /// The authenticated caller; must be the event's creator.
    pub acting_user: UserId,
    /// Replacement fields.
    pub patch: EventPatch,
}

/// Request to delete an event.
#[derive(Debug, Clone)]
pub struct DeleteEventRequest {
    /// Target event.
    pub event_id: EventId,
    /// The authenticated caller; must be the event's creator.
    pub acting_user: UserId,
}

/// Use-cases exposed to the HTTP adapter for event mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCommand: Send + Sync {
    /// Create an event owned by the acting user.
    async fn create_event(&self, request: CreateEventRequest) -> Result<Event, Error>;

    /// Update an event's presentation fields (owner only).
    async fn update_event(&self, request: UpdateEventRequest) -> Result<Event, Error>;

    /// Delete an event and all of its attendance entries (owner only).
    async fn delete_event(&self, request: DeleteEventRequest) -> Result<(), Error>;
}
