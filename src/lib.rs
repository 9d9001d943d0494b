//! bizpage: block-based business pages with Hexagonal Architecture.
//!
//! Typed blocks, legacy profile migration, an authoring state machine and a
//! static HTML renderer, wired to SQLite, JSON files or a hosted backend.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
