//! Port for event persistence, including the guarded attendee counter.
//!
//! The counter field is never written through a blind read-modify-write of
//! the whole event row. The only mutations are [`EventStore::try_increment_attendees`]
//! (a compare-and-increment the storage layer applies atomically relative to
//! other updates on the same record) and [`EventStore::decrement_attendees`]
//! (clamped at zero).

use async_trait::async_trait;

use crate::domain::{Event, EventId, EventPatch};

/// Errors raised by event store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventStoreError {
    /// Store connection could not be established.
    #[error("event store connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("event store query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl EventStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Result of a conditional attendee counter increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUpdate {
    /// The guard held and the counter was incremented.
    Applied {
        /// Counter value after the increment.
        attendees_count: i32,
    },
    /// The event exists but `attendees_count < capacity` did not hold.
    Full,
    /// No event with the given id exists.
    NotFound,
}

/// Port for reading and writing events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a newly created event.
    async fn insert(&self, event: &Event) -> Result<(), EventStoreError>;

    /// Find an event by id.
    async fn find_by_id(&self, event_id: EventId) -> Result<Option<Event>, EventStoreError>;

    /// List all events ordered by start time, soonest first.
    async fn list(&self) -> Result<Vec<Event>, EventStoreError>;

    /// Apply a presentation-field patch; returns the updated event, or
    /// `None` when the event does not exist. Never touches the counter or
    /// capacity.
    async fn update_details(
        &self,
        event_id: EventId,
        patch: &EventPatch,
    ) -> Result<Option<Event>, EventStoreError>;

    /// Delete an event row; reports whether a row was removed.
    async fn delete(&self, event_id: EventId) -> Result<bool, EventStoreError>;

    /// Increment the attendee counter only if it is below capacity, as a
    /// single atomic storage operation.
    async fn try_increment_attendees(
        &self,
        event_id: EventId,
    ) -> Result<CounterUpdate, EventStoreError>;

    /// Decrement the attendee counter, clamped at zero. Missing events are
    /// ignored.
    async fn decrement_attendees(&self, event_id: EventId) -> Result<(), EventStoreError>;
}

/// In-memory implementation used by tests and local development.
///
/// The lock is held across the check and the increment, which gives the same
/// atomicity the SQL adapter gets from its conditional `UPDATE`.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: std::sync::Mutex<Vec<Event>>,
}

impl InMemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, event: &Event) -> Result<(), EventStoreError> {
        let mut events = self.events.lock().map_err(poisoned)?;
        events.push(event.clone());
        Ok(())
    }

    async fn find_by_id(&self, event_id: EventId) -> Result<Option<Event>, EventStoreError> {
        let events = self.events.lock().map_err(poisoned)?;
        Ok(events.iter().find(|e| e.id() == event_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>, EventStoreError> {
        let events = self.events.lock().map_err(poisoned)?;
        let mut listed: Vec<Event> = events.clone();
        // Order matches the SQL adapter: soonest first, unscheduled last.
        listed.sort_by(|a, b| match (a.starts_at(), b.starts_at()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.id().as_uuid().cmp(b.id().as_uuid()),
        });
        Ok(listed)
    }

    async fn update_details(
        &self,
        event_id: EventId,
        patch: &EventPatch,
    ) -> Result<Option<Event>, EventStoreError> {
        let mut events = self.events.lock().map_err(poisoned)?;
        let Some(slot) = events.iter_mut().find(|e| e.id() == event_id) else {
            return Ok(None);
        };
        let updated = Event::from_parts(crate::domain::EventParts {
            id: slot.id(),
            title: patch.title.clone().unwrap_or_else(|| slot.title().to_owned()),
            description: patch
                .description
                .clone()
                .or_else(|| slot.description().map(str::to_owned)),
            starts_at: patch.starts_at.or_else(|| slot.starts_at()),
            location: patch
                .location
                .clone()
                .or_else(|| slot.location().map(str::to_owned)),
            image_url: patch
                .image_url
                .clone()
                .or_else(|| slot.image_url().map(str::to_owned)),
            capacity: slot.capacity(),
            attendees_count: slot.attendees_count(),
            created_by: slot.created_by(),
        });
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, event_id: EventId) -> Result<bool, EventStoreError> {
        let mut events = self.events.lock().map_err(poisoned)?;
        let before = events.len();
        events.retain(|e| e.id() != event_id);
        Ok(events.len() < before)
    }

    async fn try_increment_attendees(
        &self,
        event_id: EventId,
    ) -> Result<CounterUpdate, EventStoreError> {
        let mut events = self.events.lock().map_err(poisoned)?;
        let Some(slot) = events.iter_mut().find(|e| e.id() == event_id) else {
            return Ok(CounterUpdate::NotFound);
        };
        if slot.attendees_count() >= slot.capacity() {
            return Ok(CounterUpdate::Full);
        }
        let updated = with_count(slot, slot.attendees_count() + 1);
        *slot = updated;
        Ok(CounterUpdate::Applied {
            attendees_count: slot.attendees_count(),
        })
    }

    async fn decrement_attendees(&self, event_id: EventId) -> Result<(), EventStoreError> {
        let mut events = self.events.lock().map_err(poisoned)?;
        if let Some(slot) = events.iter_mut().find(|e| e.id() == event_id) {
            if slot.attendees_count() > 0 {
                let updated = with_count(slot, slot.attendees_count() - 1);
                *slot = updated;
            }
        }
        Ok(())
    }
}

fn with_count(event: &Event, attendees_count: i32) -> Event {
    Event::from_parts(crate::domain::EventParts {
        id: event.id(),
        title: event.title().to_owned(),
        description: event.description().map(str::to_owned),
        starts_at: event.starts_at(),
        location: event.location().map(str::to_owned),
        image_url: event.image_url().map(str::to_owned),
        capacity: event.capacity(),
        attendees_count,
        created_by: event.created_by(),
    })
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> EventStoreError {
    EventStoreError::query("event store lock poisoned")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory counter semantics.

    use rstest::rstest;

    use super::*;
    use crate::domain::{EventDraft, UserId};

    fn sample_event(capacity: i32) -> Event {
        Event::new(
            EventDraft {
                title: "Board games night".to_owned(),
                description: None,
                starts_at: None,
                location: None,
                image_url: None,
                capacity,
            },
            UserId::random(),
        )
        .expect("valid draft")
    }

    #[rstest]
    #[tokio::test]
    async fn increment_stops_at_capacity() {
        let store = InMemoryEventStore::new();
        let event = sample_event(2);
        store.insert(&event).await.expect("insert");

        assert_eq!(
            store
                .try_increment_attendees(event.id())
                .await
                .expect("increment"),
            CounterUpdate::Applied { attendees_count: 1 }
        );
        assert_eq!(
            store
                .try_increment_attendees(event.id())
                .await
                .expect("increment"),
            CounterUpdate::Applied { attendees_count: 2 }
        );
        assert_eq!(
            store
                .try_increment_attendees(event.id())
                .await
                .expect("increment"),
            CounterUpdate::Full
        );
    }

    #[rstest]
    #[tokio::test]
    async fn increment_reports_missing_event() {
        let store = InMemoryEventStore::new();
        assert_eq!(
            store
                .try_increment_attendees(EventId::random())
                .await
                .expect("increment"),
            CounterUpdate::NotFound
        );
    }

    #[rstest]
    #[tokio::test]
    async fn decrement_clamps_at_zero() {
        let store = InMemoryEventStore::new();
        let event = sample_event(2);
        store.insert(&event).await.expect("insert");

        store
            .decrement_attendees(event.id())
            .await
            .expect("decrement");
        let reloaded = store
            .find_by_id(event.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(reloaded.attendees_count(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn update_details_preserves_counter_and_capacity() {
        let store = InMemoryEventStore::new();
        let event = sample_event(5);
        store.insert(&event).await.expect("insert");
        store
            .try_increment_attendees(event.id())
            .await
            .expect("increment");

        let patch = EventPatch {
            title: Some("Renamed".to_owned()),
            ..EventPatch::default()
        };
        let updated = store
            .update_details(event.id(), &patch)
            .await
            .expect("update")
            .expect("present");

        assert_eq!(updated.title(), "Renamed");
        assert_eq!(updated.capacity(), 5);
        assert_eq!(updated.attendees_count(), 1);
    }
}
