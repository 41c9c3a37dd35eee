//! Account registration and authentication service.
//!
//! The HTTP adapter persists the authenticated user id in a cookie session;
//! everything downstream (event CRUD, admission control) receives that id as
//! an opaque, already-validated value and performs no authentication itself.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{Accounts, UserRepository, UserRepositoryError};
use crate::domain::{LoginCredentials, PasswordHash, User, UserId};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateUsername => Error::conflict("username already taken"),
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Account service implementing the [`Accounts`] driving port.
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
}

impl<R> AccountService<R> {
    /// Create a new service over the user repository.
    pub const fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> Accounts for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = User::new(UserId::random(), credentials.username().clone());
        let password = PasswordHash::derive(credentials.password());

        self.users
            .insert(&user, &password)
            .await
            .map_err(map_repository_error)?;

        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

        if !stored.password.verify(credentials.password()) {
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(stored.user)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for registration conflicts and credential checks.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::InMemoryUserRepository;

    fn service() -> AccountService<InMemoryUserRepository> {
        AccountService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn creds(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("valid credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn register_then_authenticate_round_trips() {
        let service = service();

        let registered = service
            .register(&creds("ada", "hunter2"))
            .await
            .expect("register");
        let authenticated = service
            .authenticate(&creds("ada", "hunter2"))
            .await
            .expect("authenticate");

        assert_eq!(registered.id(), authenticated.id());
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_taken_username() {
        let service = service();
        service
            .register(&creds("ada", "hunter2"))
            .await
            .expect("register");

        let error = service
            .register(&creds("ada", "different"))
            .await
            .expect_err("duplicate username");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_rejects_wrong_password() {
        let service = service();
        service
            .register(&creds("ada", "hunter2"))
            .await
            .expect("register");

        let error = service
            .authenticate(&creds("ada", "wrong"))
            .await
            .expect_err("wrong password");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_rejects_unknown_username() {
        let service = service();
        let error = service
            .authenticate(&creds("nobody", "hunter2"))
            .await
            .expect_err("unknown user");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
