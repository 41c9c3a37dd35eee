//! PostgreSQL-backed `AttendanceLedger` implementation using Diesel ORM.
//!
//! The `(user_id, event_id)` composite primary key makes the insert
//! self-checking: two racing requests for the same pair cannot both commit,
//! and the loser surfaces as [`AttendanceLedgerError::Duplicate`]. There is
//! deliberately no "does this exist" probe before the insert.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AttendanceLedger, AttendanceLedgerError};
use crate::domain::{EventId, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewAttendanceRow;
use super::pool::{DbPool, PoolError};
use super::schema::attendances;

/// Diesel-backed implementation of the attendance ledger port.
#[derive(Clone)]
pub struct DieselAttendanceLedger {
    pool: DbPool,
}

impl DieselAttendanceLedger {
    /// Create a new ledger with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain ledger errors.
fn map_pool_error(error: PoolError) -> AttendanceLedgerError {
    map_basic_pool_error(error, AttendanceLedgerError::connection)
}

/// Map Diesel errors to domain ledger errors, surfacing unique violations
/// as duplicates.
fn map_diesel_error(error: diesel::result::Error) -> AttendanceLedgerError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return AttendanceLedgerError::Duplicate;
    }
    map_basic_diesel_error(
        error,
        AttendanceLedgerError::query,
        AttendanceLedgerError::connection,
    )
}

#[async_trait]
impl AttendanceLedger for DieselAttendanceLedger {
    async fn record(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), AttendanceLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAttendanceRow {
            user_id: *user_id.as_uuid(),
            event_id: *event_id.as_uuid(),
        };

        diesel::insert_into(attendances::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<bool, AttendanceLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            attendances::table.filter(
                attendances::user_id
                    .eq(user_id.as_uuid())
                    .and(attendances::event_id.eq(event_id.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn remove_all_for(&self, event_id: EventId) -> Result<u64, AttendanceLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed =
            diesel::delete(attendances::table.filter(attendances::event_id.eq(event_id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;

        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn unique_violation_maps_to_duplicate() {
        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        assert_eq!(map_diesel_error(error), AttendanceLedgerError::Duplicate);
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, AttendanceLedgerError::Connection { .. }));
    }

    #[rstest]
    fn other_database_errors_map_to_query_error() {
        let mapped = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(mapped, AttendanceLedgerError::Query { .. }));
    }
}
