//! PostgreSQL persistence adapters built on Diesel.

mod diesel_attendance_ledger;
mod diesel_error_mapping;
mod diesel_event_store;
mod diesel_user_repository;
pub(crate) mod models;
mod pool;
pub mod schema;

pub use diesel_attendance_ledger::DieselAttendanceLedger;
pub use diesel_event_store::DieselEventStore;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
