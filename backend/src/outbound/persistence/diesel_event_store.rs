//! PostgreSQL-backed `EventStore` implementation using Diesel ORM.
//!
//! The attendee counter is only mutated through two statements:
//!
//! - a conditional `UPDATE ... SET attendees_count = attendees_count + 1
//!   WHERE id = $1 AND attendees_count < capacity`, which PostgreSQL applies
//!   atomically relative to other updates on the same row, and
//! - an unconditional decrement guarded by `attendees_count > 0` so the
//!   counter can never run below zero.
//!
//! Reading the row, comparing in the application, and writing it back would
//! reintroduce the lost-update race this adapter exists to prevent.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CounterUpdate, EventStore, EventStoreError};
use crate::domain::{Event, EventId, EventParts, EventPatch, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EventDetailsChangeset, EventRow, NewEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::events;

/// Diesel-backed implementation of the event store port.
#[derive(Clone)]
pub struct DieselEventStore {
    pool: DbPool,
}

impl DieselEventStore {
    /// Create a new store with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain event store errors.
fn map_pool_error(error: PoolError) -> EventStoreError {
    map_basic_pool_error(error, EventStoreError::connection)
}

/// Map Diesel errors to domain event store errors.
fn map_diesel_error(error: diesel::result::Error) -> EventStoreError {
    map_basic_diesel_error(error, EventStoreError::query, EventStoreError::connection)
}

/// Convert a database row into a domain event.
fn row_to_event(row: EventRow) -> Event {
    Event::from_parts(EventParts {
        id: EventId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        starts_at: row.starts_at,
        location: row.location,
        image_url: row.image_url,
        capacity: row.capacity,
        attendees_count: row.attendees_count,
        created_by: UserId::from_uuid(row.created_by),
    })
}

#[async_trait]
impl EventStore for DieselEventStore {
    async fn insert(&self, event: &Event) -> Result<(), EventStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewEventRow {
            id: *event.id().as_uuid(),
            title: event.title(),
            description: event.description(),
            starts_at: event.starts_at(),
            location: event.location(),
            image_url: event.image_url(),
            capacity: event.capacity(),
            attendees_count: event.attendees_count(),
            created_by: *event.created_by().as_uuid(),
        };

        diesel::insert_into(events::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, event_id: EventId) -> Result<Option<Event>, EventStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = events::table
            .filter(events::id.eq(event_id.as_uuid()))
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_event))
    }

    async fn list(&self) -> Result<Vec<Event>, EventStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Ascending order puts NULL starts_at last under PostgreSQL defaults.
        let rows: Vec<EventRow> = events::table
            .order((events::starts_at.asc(), events::id.asc()))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_event).collect())
    }

    async fn update_details(
        &self,
        event_id: EventId,
        patch: &EventPatch,
    ) -> Result<Option<Event>, EventStoreError> {
        if *patch == EventPatch::default() {
            // Nothing to change; an empty changeset is a Diesel error.
            return self.find_by_id(event_id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = EventDetailsChangeset {
            title: patch.title.as_deref(),
            description: patch.description.as_deref(),
            starts_at: patch.starts_at,
            location: patch.location.as_deref(),
            image_url: patch.image_url.as_deref(),
        };

        let row = diesel::update(events::table.filter(events::id.eq(event_id.as_uuid())))
            .set(&changeset)
            .returning(EventRow::as_returning())
            .get_result::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_event))
    }

    async fn delete(&self, event_id: EventId) -> Result<bool, EventStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(events::table.filter(events::id.eq(event_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn try_increment_attendees(
        &self,
        event_id: EventId,
    ) -> Result<CounterUpdate, EventStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The capacity check and the increment are one statement; PostgreSQL
        // serialises concurrent updates on the row, so at most `capacity`
        // increments can ever succeed between decrements.
        let updated = diesel::update(
            events::table.filter(
                events::id
                    .eq(event_id.as_uuid())
                    .and(events::attendees_count.lt(events::capacity)),
            ),
        )
        .set(events::attendees_count.eq(events::attendees_count + 1))
        .returning(events::attendees_count)
        .get_result::<i32>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(attendees_count) = updated {
            return Ok(CounterUpdate::Applied { attendees_count });
        }

        // Zero rows: either the guard failed or the event is gone. The
        // follow-up probe is read-only, so it cannot admit anyone.
        let exists = events::table
            .filter(events::id.eq(event_id.as_uuid()))
            .select(events::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(if exists.is_some() {
            CounterUpdate::Full
        } else {
            CounterUpdate::NotFound
        })
    }

    async fn decrement_attendees(&self, event_id: EventId) -> Result<(), EventStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(
            events::table.filter(
                events::id
                    .eq(event_id.as_uuid())
                    .and(events::attendees_count.gt(0)),
            ),
        )
        .set(events::attendees_count.eq(events::attendees_count - 1))
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, EventStoreError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let mapped = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(mapped, EventStoreError::Query { .. }));
        assert!(mapped.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_conversion_preserves_counter_fields() {
        let now = Utc::now();
        let row = EventRow {
            id: Uuid::new_v4(),
            title: "Open mic".to_owned(),
            description: None,
            starts_at: Some(now),
            location: Some("Cellar bar".to_owned()),
            image_url: None,
            capacity: 40,
            attendees_count: 12,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };

        let event = row_to_event(row);
        assert_eq!(event.capacity(), 40);
        assert_eq!(event.attendees_count(), 12);
        assert_eq!(event.title(), "Open mic");
    }
}
