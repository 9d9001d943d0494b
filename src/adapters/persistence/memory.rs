//! In-process adapters for tests and dry runs.
//!
//! `MemoryStore` keeps pages and legacy records in maps behind an RwLock.
//! `PublicUrlResolver` turns storage paths into plain public URLs with no I/O.

use crate::domain::{DomainError, LegacyProfile, Page};
use crate::ports::{AssetResolver, LegacyProfileSource, PageStore, StoredPage};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Default)]
pub struct MemoryStore {
    pages: RwLock<HashMap<String, StoredPage>>,
    legacy: RwLock<HashMap<String, LegacyProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_legacy(self, business_id: &str, profile: LegacyProfile) -> Self {
        self.legacy
            .write()
            .await
            .insert(business_id.to_string(), profile);
        self
    }

    /// Raw stored columns, bypassing `save_page`. Lets tests plant malformed blocks.
    pub async fn put_raw(&self, business_id: &str, stored: StoredPage) {
        self.pages
            .write()
            .await
            .insert(business_id.to_string(), stored);
    }
}

#[async_trait::async_trait]
impl PageStore for MemoryStore {
    async fn load_page(&self, business_id: &str) -> Result<Option<StoredPage>, DomainError> {
        Ok(self.pages.read().await.get(business_id).cloned())
    }

    async fn save_page(&self, business_id: &str, page: &Page) -> Result<(), DomainError> {
        let stored = StoredPage::from_page(page)?;
        self.pages
            .write()
            .await
            .insert(business_id.to_string(), stored);
        info!(business_id, blocks = page.blocks.len(), "[MEMORY] page saved");
        Ok(())
    }
}

#[async_trait::async_trait]
impl LegacyProfileSource for MemoryStore {
    async fn load_legacy_profile(
        &self,
        business_id: &str,
    ) -> Result<Option<LegacyProfile>, DomainError> {
        Ok(self.legacy.read().await.get(business_id).cloned())
    }
}

/// Joins storage paths onto a public base URL.
pub struct PublicUrlResolver {
    base_url: String,
}

impl PublicUrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl AssetResolver for PublicUrlResolver {
    async fn resolve(&self, path: &str) -> Result<String, DomainError> {
        Ok(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockType, TemplateId};
    use crate::usecases::{MoveDirection, PageService, PageSource};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_builder_round_trip_through_service() {
        let store = Arc::new(
            MemoryStore::new()
                .with_legacy(
                    "acme",
                    LegacyProfile {
                        business_name: Some("Acme".into()),
                        ..LegacyProfile::default()
                    },
                )
                .await,
        );
        let service = PageService::new(store.clone(), store.clone(), TemplateId::default());

        let (mut builder, loaded) = service.open_builder("acme").await;
        assert_eq!(loaded.source, PageSource::Migrated);

        let stats = builder.add_block(BlockType::Stats);
        builder.move_block(&stats, MoveDirection::Up);
        service.save(&mut builder, "acme").await.unwrap();

        let reloaded = service.load_page("acme").await;
        assert_eq!(reloaded.source, PageSource::Stored);
        let kinds: Vec<BlockType> = reloaded
            .page
            .sorted_blocks()
            .iter()
            .map(|b| b.block_type())
            .collect();
        assert_eq!(kinds, vec![BlockType::Hero, BlockType::Stats, BlockType::Cta]);
    }

    #[tokio::test]
    async fn test_planted_bad_block_is_reported() {
        let store = Arc::new(MemoryStore::new());
        store
            .put_raw(
                "acme",
                StoredPage {
                    page_blocks: json!([
                        { "id": "x", "type": "hero", "order": 0, "data": { "heading": "Acme" } },
                        { "id": "y", "type": "marquee", "order": 1, "data": {} }
                    ]),
                    page_template_id: None,
                },
            )
            .await;
        let service = PageService::new(store.clone(), store, TemplateId::default());
        let loaded = service.load_page("acme").await;
        assert_eq!(loaded.page.blocks.len(), 1);
        assert_eq!(loaded.violations[0].block_id.as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn test_public_url_resolver() {
        let resolver = PublicUrlResolver::new("https://cdn.test/public/");
        assert_eq!(
            resolver.resolve("logos/acme.png").await.unwrap(),
            "https://cdn.test/public/logos/acme.png"
        );
    }
}
