//! Driving port for RSVP admission: join and leave.

use async_trait::async_trait;

use crate::domain::{Error, EventId, UserId};

/// Outcome of a join request.
///
/// The three expected outcomes of the admission state machine. Infrastructure
/// failures and missing events surface as [`Error`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The user now attends the event.
    Joined {
        /// Attendee count after the join.
        attendees_count: i32,
    },
    /// The event is at capacity.
    EventFull,
    /// The user had already joined the event.
    AlreadyJoined,
}

/// Use-cases exposed to the HTTP adapter for RSVP admission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdmissionControl: Send + Sync {
    /// Attempt to join an event. Never exceeds the event's capacity and
    /// never admits the same user twice.
    async fn join(&self, user_id: UserId, event_id: EventId) -> Result<JoinOutcome, Error>;

    /// Leave an event. Idempotent: leaving an event the user never joined
    /// is a no-op and does not touch the counter.
    async fn leave(&self, user_id: UserId, event_id: EventId) -> Result<(), Error>;
}
