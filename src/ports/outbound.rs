//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters (SQLite, JSON files, hosted backend, in-memory).

use crate::domain::{DomainError, LegacyProfile, Page};
use serde::{Deserialize, Serialize};

/// Page columns as the backend stores them. `page_blocks` stays raw JSON so that a
/// single malformed block can be rejected without losing the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredPage {
    #[serde(default)]
    pub page_blocks: serde_json::Value,
    #[serde(default)]
    pub page_template_id: Option<String>,
}

impl StoredPage {
    /// Wire form of a page, as written by `save_page` implementations.
    pub fn from_page(page: &Page) -> Result<Self, DomainError> {
        Ok(Self {
            page_blocks: serde_json::to_value(&page.blocks)
                .map_err(|e| DomainError::Schema(e.to_string()))?,
            page_template_id: Some(page.template_id.to_string()),
        })
    }

    /// True when there is at least one stored block entry.
    pub fn has_blocks(&self) -> bool {
        self.page_blocks
            .as_array()
            .is_some_and(|blocks| !blocks.is_empty())
    }
}

/// Page persistence. Full-replace semantics: the next load returns exactly what was saved.
#[async_trait::async_trait]
pub trait PageStore: Send + Sync {
    /// Stored page for a business, or `None` if it was never authored.
    async fn load_page(&self, business_id: &str) -> Result<Option<StoredPage>, DomainError>;

    /// Overwrite the stored page. Last writer wins.
    async fn save_page(&self, business_id: &str, page: &Page) -> Result<(), DomainError>;
}

/// Read-only access to the flat pre-builder profile record.
#[async_trait::async_trait]
pub trait LegacyProfileSource: Send + Sync {
    async fn load_legacy_profile(
        &self,
        business_id: &str,
    ) -> Result<Option<LegacyProfile>, DomainError>;
}

/// Turns an opaque storage path into a URL usable in `<img>`/`<video>` tags.
#[async_trait::async_trait]
pub trait AssetResolver: Send + Sync {
    /// Signed (time-limited) or public URL for `path`.
    async fn resolve(&self, path: &str) -> Result<String, DomainError>;
}
