//! Shared helpers for HTTP adapter tests.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;

use crate::domain::ports::{InMemoryAttendanceLedger, InMemoryEventStore, InMemoryUserRepository};
use crate::domain::{AccountService, AdmissionService, EventService};

use super::state::HttpState;

/// Session middleware with a throwaway key and relaxed cookie settings for
/// `actix_web::test` requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// HTTP state wired to fresh in-memory port implementations.
pub fn in_memory_state() -> HttpState {
    let events = Arc::new(InMemoryEventStore::new());
    let ledger = Arc::new(InMemoryAttendanceLedger::new());
    let users = Arc::new(InMemoryUserRepository::new());

    HttpState::new(
        Arc::new(AccountService::new(users)),
        Arc::new(EventService::new(Arc::clone(&events), Arc::clone(&ledger))),
        Arc::new(EventService::new(Arc::clone(&events), Arc::clone(&ledger))),
        Arc::new(AdmissionService::new(events, ledger)),
    )
}
