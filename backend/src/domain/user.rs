//! User identity types.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by user identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The supplied id was not a valid UUID.
    InvalidId,
    /// The username was empty after trimming.
    EmptyUsername,
    /// The username was shorter than the minimum length.
    UsernameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The username exceeded the maximum length.
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The username contained characters outside the accepted set.
    UsernameInvalidCharacters,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, or underscores"
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// The identity collaborator hands this to the admission core as an opaque,
/// already-validated value; the core never inspects it beyond equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validate and parse a [`UserId`] from its string form.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

/// Unique login name chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Username;
    ///
    /// assert!(Username::new("ada_lovelace").is_ok());
    /// assert!(Username::new("a b").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = raw.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user identity exposed to adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Stable user identifier.
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Login name shown to other users.
    pub const fn username(&self) -> &Username {
        &self.username
    }
}

/// Validation errors raised when assembling login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// The username failed validation.
    Username(UserValidationError),
    /// The password was empty.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Username/password pair supplied at signup and login.
///
/// The password is held in memory only for the duration of the request; it is
/// never persisted or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: String,
}

impl LoginCredentials {
    /// Validate and assemble credentials from raw request parts.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username).map_err(CredentialsValidationError::Username)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: password.to_owned(),
        })
    }

    /// The validated username.
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// The raw password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep the password out of logs and panic messages.
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identity validation.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ada")]
    #[case("ada_lovelace")]
    #[case("Babbage42")]
    fn accepts_valid_usernames(#[case] raw: &str) {
        assert!(Username::new(raw).is_ok());
    }

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    #[case("ada lovelace", UserValidationError::UsernameInvalidCharacters)]
    #[case("ada-lovelace", UserValidationError::UsernameInvalidCharacters)]
    fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(raw).expect_err("should reject"), expected);
    }

    #[rstest]
    fn rejects_overlong_username() {
        let raw = "a".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(raw).expect_err("should reject"),
            UserValidationError::UsernameTooLong { max: USERNAME_MAX }
        );
    }

    #[rstest]
    fn user_id_round_trips_through_string_form() {
        let id = UserId::random();
        let parsed = UserId::parse(&id.to_string()).expect("round trip");
        assert_eq!(parsed, id);
    }

    #[rstest]
    fn user_id_rejects_garbage() {
        assert_eq!(
            UserId::parse("not-a-uuid").expect_err("should reject"),
            UserValidationError::InvalidId
        );
    }

    #[rstest]
    fn credentials_reject_empty_password() {
        assert_eq!(
            LoginCredentials::try_from_parts("ada", "").expect_err("should reject"),
            CredentialsValidationError::EmptyPassword
        );
    }

    #[rstest]
    fn credentials_debug_redacts_password() {
        let creds = LoginCredentials::try_from_parts("ada", "hunter2").expect("valid");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
