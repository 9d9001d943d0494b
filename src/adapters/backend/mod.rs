//! Hosted backend (REST tables + object storage).

pub mod rest;

pub use rest::{RestBackend, RestBackendConfig};
