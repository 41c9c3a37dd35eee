//! Shared Diesel error mapping for repositories with basic query semantics.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Messages stay generic: raw database errors may embed data values and are
/// logged at debug level instead of being surfaced to callers.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the shared mapping helpers.

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::EventStoreError;

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped: EventStoreError = map_basic_pool_error(
            PoolError::checkout("connection refused"),
            EventStoreError::connection,
        );
        assert!(matches!(mapped, EventStoreError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let mapped: EventStoreError = map_basic_diesel_error(
            diesel::result::Error::NotFound,
            EventStoreError::query,
            EventStoreError::connection,
        );
        assert!(matches!(mapped, EventStoreError::Query { .. }));
    }
}
