//! Inbound adapters exposing the domain to the outside world.

pub mod http;
