//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{Accounts, AdmissionControl, EventCommand, EventQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login use-cases.
    pub accounts: Arc<dyn Accounts>,
    /// Event mutation use-cases.
    pub events: Arc<dyn EventCommand>,
    /// Event read use-cases.
    pub events_query: Arc<dyn EventQuery>,
    /// RSVP join/leave use-cases.
    pub admission: Arc<dyn AdmissionControl>,
}

impl HttpState {
    /// Construct state from the four driving ports.
    pub fn new(
        accounts: Arc<dyn Accounts>,
        events: Arc<dyn EventCommand>,
        events_query: Arc<dyn EventQuery>,
        admission: Arc<dyn AdmissionControl>,
    ) -> Self {
        Self {
            accounts,
            events,
            events_query,
            admission,
        }
    }
}
