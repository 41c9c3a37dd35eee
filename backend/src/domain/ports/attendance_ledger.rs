//! Port for the attendance ledger: who has joined which event.
//!
//! Uniqueness of the `(user, event)` pair is a storage-level guarantee.
//! [`AttendanceLedger::record`] must be an atomic uniqueness-constrained
//! insert; a check-then-insert sequence would let two racing requests both
//! pass the check.

use async_trait::async_trait;

use crate::domain::{EventId, UserId};

/// Errors raised by attendance ledger adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceLedgerError {
    /// An entry for the `(user, event)` pair already exists.
    #[error("attendance entry already exists")]
    Duplicate,
    /// Ledger connection could not be established.
    #[error("attendance ledger connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("attendance ledger query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl AttendanceLedgerError {
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

/// Port for recording and removing attendance entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceLedger: Send + Sync {
    /// Record that a user joined an event. Fails with
    /// [`AttendanceLedgerError::Duplicate`] when the pair already exists.
    async fn record(&self, user_id: UserId, event_id: EventId)
    -> Result<(), AttendanceLedgerError>;

    /// Remove the entry for the pair if present; reports whether a row was
    /// removed. Absent entries are not an error.
    async fn remove(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<bool, AttendanceLedgerError>;

    /// Remove every entry for an event; returns the number removed. Used by
    /// event deletion so no orphaned rows remain.
    async fn remove_all_for(&self, event_id: EventId) -> Result<u64, AttendanceLedgerError>;
}

/// In-memory implementation used by tests and local development.
///
/// The set insert is performed under the lock, so duplicate detection has
/// the same atomicity the SQL adapter gets from its unique index.
#[derive(Debug, Default)]
pub struct InMemoryAttendanceLedger {
    entries: std::sync::Mutex<std::collections::HashSet<(UserId, EventId)>>,
}

impl InMemoryAttendanceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries recorded for an event. Test helper.
    pub fn entries_for(&self, event_id: EventId) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.iter().filter(|(_, e)| *e == event_id).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl AttendanceLedger for InMemoryAttendanceLedger {
    async fn record(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), AttendanceLedgerError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        if entries.insert((user_id, event_id)) {
            Ok(())
        } else {
            Err(AttendanceLedgerError::Duplicate)
        }
    }

    async fn remove(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<bool, AttendanceLedgerError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.remove(&(user_id, event_id)))
    }

    async fn remove_all_for(&self, event_id: EventId) -> Result<u64, AttendanceLedgerError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        let before = entries.len();
        entries.retain(|(_, e)| *e != event_id);
        Ok((before - entries.len()) as u64)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> AttendanceLedgerError {
    AttendanceLedgerError::query("attendance ledger lock poisoned")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for ledger uniqueness and removal.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn record_rejects_duplicate_pair() {
        let ledger = InMemoryAttendanceLedger::new();
        let (user, event) = (UserId::random(), EventId::random());

        ledger.record(user, event).await.expect("first record");
        assert_eq!(
            ledger.record(user, event).await.expect_err("duplicate"),
            AttendanceLedgerError::Duplicate
        );
    }

    #[rstest]
    #[tokio::test]
    async fn remove_is_idempotent() {
        let ledger = InMemoryAttendanceLedger::new();
        let (user, event) = (UserId::random(), EventId::random());

        ledger.record(user, event).await.expect("record");
        assert!(ledger.remove(user, event).await.expect("first remove"));
        assert!(!ledger.remove(user, event).await.expect("second remove"));
    }

    #[rstest]
    #[tokio::test]
    async fn remove_all_for_clears_only_that_event() {
        let ledger = InMemoryAttendanceLedger::new();
        let event = EventId::random();
        let other = EventId::random();
        for _ in 0..3 {
            ledger
                .record(UserId::random(), event)
                .await
                .expect("record");
        }
        ledger.record(UserId::random(), other).await.expect("record");

        assert_eq!(ledger.remove_all_for(event).await.expect("bulk remove"), 3);
        assert_eq!(ledger.entries_for(event), 0);
        assert_eq!(ledger.entries_for(other), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_all_for_tolerates_absent_event() {
        let ledger = InMemoryAttendanceLedger::new();
        assert_eq!(
            ledger
                .remove_all_for(EventId::random())
                .await
                .expect("bulk remove"),
            0
        );
    }
}
