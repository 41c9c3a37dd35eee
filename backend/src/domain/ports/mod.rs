//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`EventStore`], [`AttendanceLedger`], [`UserRepository`])
//! are implemented by persistence adapters; driving ports ([`Accounts`],
//! [`EventCommand`], [`EventQuery`], [`AdmissionControl`]) are implemented
//! by domain services and consumed by inbound adapters.

mod accounts;
mod admission_control;
mod attendance_ledger;
mod event_commands;
mod event_query;
mod event_store;
mod user_repository;

pub use accounts::Accounts;
#[cfg(test)]
pub use accounts::MockAccounts;
pub use admission_control::{AdmissionControl, JoinOutcome};
#[cfg(test)]
pub use admission_control::MockAdmissionControl;
pub use attendance_ledger::{AttendanceLedger, AttendanceLedgerError, InMemoryAttendanceLedger};
#[cfg(test)]
pub use attendance_ledger::MockAttendanceLedger;
pub use event_commands::{
    CreateEventRequest, DeleteEventRequest, EventCommand, UpdateEventRequest,
};
#[cfg(test)]
pub use event_commands::MockEventCommand;
pub use event_query::EventQuery;
#[cfg(test)]
pub use event_query::MockEventQuery;
pub use event_store::{CounterUpdate, EventStore, EventStoreError, InMemoryEventStore};
#[cfg(test)]
pub use event_store::MockEventStore;
pub use user_repository::{
    InMemoryUserRepository, StoredCredentials, UserRepository, UserRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
