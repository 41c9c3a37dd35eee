//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{PasswordHash, User, UserId, Username};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors, surfacing unique
/// violations as duplicate usernames.
fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = &error {
        return UserRepositoryError::DuplicateUsername;
    }
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Convert a database row into a user and their stored credentials.
fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserRepositoryError> {
    let username = Username::new(row.username)
        .map_err(|err| UserRepositoryError::query(format!("corrupted username: {err}")))?;
    let password = PasswordHash::parse(&row.password_hash)
        .map_err(|err| UserRepositoryError::query(format!("corrupted password hash: {err}")))?;

    Ok(StoredCredentials {
        user: User::new(UserId::from_uuid(row.id), username),
        password,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored_hash = password.to_stored();

        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_str(),
            password_hash: stored_hash.as_str(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::username.eq(username.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|r| row_to_credentials(r).map(|c| c.user)).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.

    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(username: &str, password_hash: &str) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_username() {
        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        assert_eq!(
            map_diesel_error(error),
            UserRepositoryError::DuplicateUsername
        );
    }

    #[rstest]
    fn row_conversion_round_trips_credentials() {
        let hash = PasswordHash::derive("hunter2");
        let credentials = row_to_credentials(row("ada", &hash.to_stored())).expect("converts");
        assert_eq!(credentials.user.username().as_str(), "ada");
        assert!(credentials.password.verify("hunter2"));
    }

    #[rstest]
    fn row_conversion_rejects_corrupted_hash() {
        let error = row_to_credentials(row("ada", "not-a-hash")).expect_err("should reject");
        assert!(matches!(error, UserRepositoryError::Query { .. }));
        assert!(error.to_string().contains("corrupted password hash"));
    }

    #[rstest]
    fn row_conversion_rejects_corrupted_username() {
        let hash = PasswordHash::derive("hunter2");
        let error = row_to_credentials(row("", &hash.to_stored())).expect_err("should reject");
        assert!(error.to_string().contains("corrupted username"));
    }
}
