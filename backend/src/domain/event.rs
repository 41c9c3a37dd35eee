//! Event aggregate and its validation rules.
//!
//! The attendee counter carries the core invariant of the system:
//! `0 <= attendees_count <= capacity` at all times, and the counter always
//! equals the number of attendance ledger entries for the event. Only the
//! admission controller mutates the counter, and only through the
//! conditional operations on [`crate::domain::ports::EventStore`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum allowed length for an event title.
pub const TITLE_MAX: usize = 120;

/// Validation errors raised by [`Event::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// The title was empty after trimming.
    EmptyTitle,
    /// The title exceeded [`TITLE_MAX`] characters.
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The capacity was zero or negative.
    NonPositiveCapacity,
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::NonPositiveCapacity => write!(f, "capacity must be a positive integer"),
        }
    }
}

impl std::error::Error for EventValidationError {}

/// Stable event identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`EventId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied event fields, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Scheduled start time.
    pub starts_at: Option<DateTime<Utc>>,
    /// Human-readable venue.
    pub location: Option<String>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Maximum number of attendees.
    pub capacity: i32,
}

/// Mutable presentation fields accepted by an event update.
///
/// Capacity is deliberately absent: it is immutable once set, and the
/// attendee counter is never written through this path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// Replacement title, when present.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement start time.
    pub starts_at: Option<DateTime<Utc>>,
    /// Replacement venue.
    pub location: Option<String>,
    /// Replacement cover image URL.
    pub image_url: Option<String>,
}

impl EventPatch {
    /// Validate the patch fields that carry constraints.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        Ok(())
    }
}

/// A scheduled event with bounded attendance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    id: EventId,
    title: String,
    description: Option<String>,
    starts_at: Option<DateTime<Utc>>,
    location: Option<String>,
    image_url: Option<String>,
    capacity: i32,
    attendees_count: i32,
    created_by: UserId,
}

impl Event {
    /// Create a validated event with an empty attendance counter.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Event, EventDraft, UserId};
    ///
    /// let event = Event::new(
    ///     EventDraft {
    ///         title: "Rust meetup".to_owned(),
    ///         description: None,
    ///         starts_at: None,
    ///         location: None,
    ///         image_url: None,
    ///         capacity: 30,
    ///     },
    ///     UserId::random(),
    /// )
    /// .expect("valid draft");
    /// assert_eq!(event.attendees_count(), 0);
    /// ```
    pub fn new(draft: EventDraft, created_by: UserId) -> Result<Self, EventValidationError> {
        validate_title(&draft.title)?;
        if draft.capacity <= 0 {
            return Err(EventValidationError::NonPositiveCapacity);
        }
        Ok(Self {
            id: EventId::random(),
            title: draft.title,
            description: draft.description,
            starts_at: draft.starts_at,
            location: draft.location,
            image_url: draft.image_url,
            capacity: draft.capacity,
            attendees_count: 0,
            created_by,
        })
    }

    /// Reassemble an event from persisted parts.
    ///
    /// Persistence adapters use this after loading a row; the storage schema
    /// enforces the counter bounds, so no revalidation happens here.
    pub fn from_parts(parts: EventParts) -> Self {
        Self {
            id: parts.id,
            title: parts.title,
            description: parts.description,
            starts_at: parts.starts_at,
            location: parts.location,
            image_url: parts.image_url,
            capacity: parts.capacity,
            attendees_count: parts.attendees_count,
            created_by: parts.created_by,
        }
    }

    /// Stable event identifier.
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Event title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-form description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Scheduled start time.
    pub const fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.starts_at
    }

    /// Human-readable venue.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Cover image URL.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Maximum number of attendees. Immutable once set.
    pub const fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Current attendee count.
    pub const fn attendees_count(&self) -> i32 {
        self.attendees_count
    }

    /// The creating user; only they may update or delete the event.
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }
}

/// Field bundle for [`Event::from_parts`].
#[derive(Debug, Clone)]
pub struct EventParts {
    /// Stable event identifier.
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Scheduled start time.
    pub starts_at: Option<DateTime<Utc>>,
    /// Human-readable venue.
    pub location: Option<String>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Maximum number of attendees.
    pub capacity: i32,
    /// Current attendee count.
    pub attendees_count: i32,
    /// The creating user.
    pub created_by: UserId,
}

fn validate_title(title: &str) -> Result<(), EventValidationError> {
    if title.trim().is_empty() {
        return Err(EventValidationError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX {
        return Err(EventValidationError::TitleTooLong { max: TITLE_MAX });
    }
    Ok(())
}
