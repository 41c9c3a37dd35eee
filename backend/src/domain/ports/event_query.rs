//! Driving port for event reads.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventId};

/// Use-cases exposed to the HTTP adapter for reading events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventQuery: Send + Sync {
    /// List all events ordered by start time, soonest first.
    async fn list_events(&self) -> Result<Vec<Event>, Error>;

    /// Fetch a single event by id.
    async fn get_event(&self, event_id: EventId) -> Result<Event, Error>;
}
