//! Port for user account persistence.

use async_trait::async_trait;

use crate::domain::{PasswordHash, User, UserId, Username};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// A user with the same username already exists.
    #[error("username already taken")]
    DuplicateUsername,
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-provided failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-provided failure detail.
        message: String,
    },
}

impl UserRepositoryError {
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

/// A user together with their stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// The user identity.
    pub user: User,
    /// Salted digest of the user's password.
    pub password: PasswordHash,
}

/// Port for storing and looking up user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Username uniqueness is enforced by storage;
    /// a collision surfaces as [`UserRepositoryError::DuplicateUsername`].
    async fn insert(
        &self,
        user: &User,
        password: &PasswordHash,
    ) -> Result<(), UserRepositoryError>;

    /// Look up a user and their stored credentials by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Look up a user by id.
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, UserRepositoryError>;
}

/// In-memory implementation used by tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: std::sync::Mutex<Vec<StoredCredentials>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(
        &self,
        user: &User,
        password: &PasswordHash,
    ) -> Result<(), UserRepositoryError> {
        let mut users = self.users.lock().map_err(poisoned)?;
        if users.iter().any(|c| c.user.username() == user.username()) {
            return Err(UserRepositoryError::DuplicateUsername);
        }
        users.push(StoredCredentials {
            user: user.clone(),
            password: password.clone(),
        });
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users
            .iter()
            .find(|c| c.user.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users
            .iter()
            .find(|c| c.user.id() == user_id)
            .map(|c| c.user.clone()))
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> UserRepositoryError {
    UserRepositoryError::query("user repository lock poisoned")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for username uniqueness.

    use rstest::rstest;

    use super::*;

    fn account(username: &str) -> (User, PasswordHash) {
        let user = User::new(
            UserId::random(),
            Username::new(username).expect("valid username"),
        );
        (user, PasswordHash::derive("hunter2"))
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_duplicate_username() {
        let repo = InMemoryUserRepository::new();
        let (first, hash) = account("ada");
        let (second, other_hash) = account("ada");

        repo.insert(&first, &hash).await.expect("first insert");
        assert_eq!(
            repo.insert(&second, &other_hash)
                .await
                .expect_err("duplicate"),
            UserRepositoryError::DuplicateUsername
        );
    }

    #[rstest]
    #[tokio::test]
    async fn find_by_username_returns_stored_credentials() {
        let repo = InMemoryUserRepository::new();
        let (user, hash) = account("ada");
        repo.insert(&user, &hash).await.expect("insert");

        let found = repo
            .find_by_username(user.username())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(found.user, user);
        assert!(found.password.verify("hunter2"));
    }
}
