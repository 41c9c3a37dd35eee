//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! When migrations change the schema, regenerate or update this file
//! (`diesel print-schema` can generate it from a live database).

diesel::table! {
    /// User accounts.
    ///
    /// `username` carries a unique index; registration collisions surface as
    /// unique-violation errors, not application checks.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name (max 32 characters).
        username -> Varchar,
        /// Salted password digest in `salt$digest` hex form.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Scheduled events with bounded attendance.
    ///
    /// A CHECK constraint keeps `0 <= attendees_count <= capacity`; the
    /// admission controller's conditional UPDATE is the only writer of
    /// `attendees_count`.
    events (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Event title (max 120 characters).
        title -> Varchar,
        /// Free-form description.
        description -> Nullable<Text>,
        /// Scheduled start time.
        starts_at -> Nullable<Timestamptz>,
        /// Human-readable venue (max 160 characters).
        location -> Nullable<Varchar>,
        /// Cover image URL (max 512 characters).
        image_url -> Nullable<Varchar>,
        /// Maximum number of attendees; immutable once set.
        capacity -> Int4,
        /// Current attendee count.
        attendees_count -> Int4,
        /// Creating user (foreign key to `users.id`).
        created_by -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Attendance ledger: one row per (user, event) RSVP pair.
    ///
    /// The composite primary key is the uniqueness guarantee the admission
    /// controller relies on; duplicate inserts collide in storage.
    attendances (user_id, event_id) {
        /// Attending user (foreign key to `users.id`).
        user_id -> Uuid,
        /// Attended event (foreign key to `events.id`).
        event_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, events, attendances);
