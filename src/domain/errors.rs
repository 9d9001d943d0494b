//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Asset resolution failed: {0}")]
    Asset(String),

    /// Stored or edited block does not fit the schema for its type.
    #[error("Schema violation: {0}")]
    Schema(String),

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// A save is already running for this builder; the second submission is dropped.
    #[error("Save already in progress")]
    SaveInFlight,

    #[error("Operation cancelled")]
    Cancelled,

    /// Field-level edit rejected; the previous value is kept.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidEdit { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("UI error: {0}")]
    Ui(String),
}
