//! Infrastructure adapters. Implement outbound ports.
//!
//! Storage (SQLite, JSON files, memory), hosted backend, HTML rendering, terminal UI.
//! Map errors to DomainError.

pub mod backend;
pub mod html;
pub mod persistence;
pub mod ui;
