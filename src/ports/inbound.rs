//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: interactive surface driving the page builder.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the authoring session until the user quits.
    async fn run(&self) -> Result<(), DomainError>;
}
