//! Domain entities, services, and ports.
//!
//! Types here are transport agnostic: inbound adapters map them to HTTP,
//! outbound adapters persist them. Invariants are documented on each type;
//! the load-bearing one is the event attendee counter, which only the
//! admission controller may mutate, through the conditional operations on
//! [`ports::EventStore`].

pub mod account_service;
pub mod admission_service;
pub mod error;
pub mod event;
pub mod event_service;
pub mod password;
pub mod ports;
pub mod user;

pub use self::account_service::AccountService;
pub use self::admission_service::AdmissionService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::event::{
    Event, EventDraft, EventId, EventParts, EventPatch, EventValidationError, TITLE_MAX,
};
pub use self::event_service::EventService;
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::user::{
    CredentialsValidationError, LoginCredentials, USERNAME_MAX, USERNAME_MIN, User, UserId,
    UserValidationError, Username,
};

/// Convenient result alias for domain services and adapters.
pub type ApiResult<T> = Result<T, Error>;
