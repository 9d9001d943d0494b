//! Persistence adapters: SQLite, JSON files and in-memory.

pub mod json_store;
pub mod memory;
pub mod sqlite_repo;

pub use json_store::JsonPageStore;
pub use memory::{MemoryStore, PublicUrlResolver};
pub use sqlite_repo::SqliteRepo;
