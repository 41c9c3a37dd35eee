//! Driving port for account registration and authentication.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Use-cases exposed to the HTTP adapter for account management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Accounts: Send + Sync {
    /// Create a new account from validated credentials.
    async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Verify credentials and return the matching user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
