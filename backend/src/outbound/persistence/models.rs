//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{attendances, events, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub capacity: i32,
    pub attendees_count: i32,
    pub created_by: Uuid,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub starts_at: Option<DateTime<Utc>>,
    pub location: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub capacity: i32,
    pub attendees_count: i32,
    pub created_by: Uuid,
}

/// Changeset struct for updating event presentation fields.
///
/// Deliberately excludes `capacity` and `attendees_count`: capacity is
/// immutable and the counter is only written through the conditional
/// operations in the event store adapter.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events)]
pub(crate) struct EventDetailsChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub starts_at: Option<DateTime<Utc>>,
    pub location: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

/// Insertable struct for recording an attendance entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendances)]
pub(crate) struct NewAttendanceRow {
    pub user_id: Uuid,
    pub event_id: Uuid,
}
