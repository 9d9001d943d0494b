//! Page loading, asset resolution and persistence.
//!
//! Load never fails: stored blocks win, then a migrated legacy record, then the
//! two-block minimum. Backend failures along the way are logged and skipped.

use crate::domain::{DomainError, Page, SchemaViolation, TemplateId, decode_blocks};
use crate::ports::{AssetResolver, LegacyProfileSource, PageStore};
use crate::usecases::migrator::migrate_legacy_profile;
use crate::usecases::page_builder::PageBuilder;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Upper bound on one page's asset pass before it is cancelled.
pub const ASSET_RESOLUTION_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    Stored,
    Migrated,
    Minimum,
}

#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub page: Page,
    pub source: PageSource,
    /// Stored blocks that were dropped on decode.
    pub violations: Vec<SchemaViolation>,
}

pub struct PageService {
    store: Arc<dyn PageStore>,
    legacy: Arc<dyn LegacyProfileSource>,
    assets: Option<Arc<dyn AssetResolver>>,
    default_template: TemplateId,
}

impl PageService {
    pub fn new(
        store: Arc<dyn PageStore>,
        legacy: Arc<dyn LegacyProfileSource>,
        default_template: TemplateId,
    ) -> Self {
        Self {
            store,
            legacy,
            assets: None,
            default_template,
        }
    }

    pub fn with_assets(mut self, resolver: Arc<dyn AssetResolver>) -> Self {
        self.assets = Some(resolver);
        self
    }

    pub async fn load_page(&self, business_id: &str) -> LoadedPage {
        let mut template_id = self.default_template.clone();
        let mut violations = Vec::new();

        match self.store.load_page(business_id).await {
            Ok(Some(stored)) => {
                if let Some(id) = stored.page_template_id.as_deref().filter(|s| !s.is_empty()) {
                    template_id = TemplateId::new(id);
                }
                if stored.has_blocks() {
                    let decoded = decode_blocks(&stored.page_blocks);
                    for v in &decoded.violations {
                        warn!(business_id, violation = %v, "dropping stored block");
                    }
                    violations = decoded.violations;
                    if !decoded.blocks.is_empty() {
                        info!(business_id, blocks = decoded.blocks.len(), "loaded stored page");
                        return LoadedPage {
                            page: Page::new(template_id, decoded.blocks),
                            source: PageSource::Stored,
                            violations,
                        };
                    }
                }
            }
            Ok(None) => debug!(business_id, "no stored page"),
            Err(e) => warn!(business_id, error = %e, "page load failed, falling back"),
        }

        match self.legacy.load_legacy_profile(business_id).await {
            Ok(Some(profile)) => {
                let page = migrate_legacy_profile(&profile, template_id);
                info!(business_id, blocks = page.blocks.len(), "migrated legacy profile");
                return LoadedPage {
                    page,
                    source: PageSource::Migrated,
                    violations,
                };
            }
            Ok(None) => debug!(business_id, "no legacy profile"),
            Err(e) => warn!(business_id, error = %e, "legacy profile load failed"),
        }

        info!(business_id, "using minimum page");
        LoadedPage {
            page: Page::minimum(None, template_id),
            source: PageSource::Minimum,
            violations,
        }
    }

    /// Builder over the loaded page.
    pub async fn open_builder(&self, business_id: &str) -> (PageBuilder, LoadedPage) {
        let loaded = self.load_page(business_id).await;
        (PageBuilder::new(loaded.page.clone()), loaded)
    }

    pub async fn save(
        &self,
        builder: &mut PageBuilder,
        business_id: &str,
    ) -> Result<(), DomainError> {
        builder.save(self.store.as_ref(), business_id).await
    }

    /// Swap storage paths for fetchable URLs. No-op without a configured resolver.
    pub async fn resolve_assets(
        &self,
        page: &mut Page,
        cancel: &CancellationToken,
    ) -> Result<usize, DomainError> {
        match &self.assets {
            Some(resolver) => resolve_page_assets(page, resolver.as_ref(), cancel).await,
            None => Ok(0),
        }
    }

    /// Resolve assets, cancelling on Ctrl-C or once `timeout` elapses.
    /// A cancelled pass leaves `page` untouched.
    pub async fn resolve_assets_within(
        &self,
        page: &mut Page,
        timeout: Duration,
    ) -> Result<usize, DomainError> {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let watchdog = tokio::spawn(async move {
            tokio::select! {
                Ok(()) = tokio::signal::ctrl_c() => {
                    info!("interrupt received, cancelling asset resolution");
                    trigger.cancel();
                }
                _ = tokio::time::sleep(timeout) => {
                    warn!(timeout_ms = timeout.as_millis() as u64, "asset resolution timed out");
                    trigger.cancel();
                }
            }
        });
        let result = self.resolve_assets(page, &cancel).await;
        watchdog.abort();
        result
    }
}

/// True for values that name an object in storage rather than a URL or anchor.
pub fn is_storage_path(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && !url.starts_with(['/', '#']) && !has_scheme(url)
}

/// `scheme:` prefix per RFC 3986: a letter, then letters, digits, `+`, `-` or `.`.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolve every storage path in `page`. Nothing is written back if `cancel` fires
/// first; a path that fails to resolve is left as it was.
pub async fn resolve_page_assets(
    page: &mut Page,
    resolver: &dyn AssetResolver,
    cancel: &CancellationToken,
) -> Result<usize, DomainError> {
    let mut resolved: HashMap<String, String> = HashMap::new();
    let mut paths: Vec<String> = page
        .blocks
        .iter_mut()
        .flat_map(|b| b.content.asset_urls_mut())
        .filter(|u| is_storage_path(u))
        .map(|u| u.clone())
        .collect();
    paths.sort();
    paths.dedup();

    for path in paths {
        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(DomainError::Cancelled),
            r = resolver.resolve(&path) => r,
        };
        match result {
            Ok(url) => {
                resolved.insert(path, url);
            }
            Err(e) => warn!(path = %path, error = %e, "asset left unresolved"),
        }
    }

    if cancel.is_cancelled() {
        return Err(DomainError::Cancelled);
    }

    let mut count = 0;
    for url in page.blocks.iter_mut().flat_map(|b| b.content.asset_urls_mut()) {
        if let Some(signed) = resolved.get(url.as_str()) {
            *url = signed.clone();
            count += 1;
        }
    }
    debug!(count, "assets resolved");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Block, BlockContent, BlockType, HeroData, LegacyProfile};
    use crate::ports::StoredPage;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedStore(Result<Option<StoredPage>, ()>);

    #[async_trait]
    impl PageStore for FixedStore {
        async fn load_page(&self, _business_id: &str) -> Result<Option<StoredPage>, DomainError> {
            self.0
                .clone()
                .map_err(|_| DomainError::Backend("connection refused".into()))
        }

        async fn save_page(&self, _business_id: &str, _page: &Page) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct FixedLegacy(Option<LegacyProfile>);

    #[async_trait]
    impl LegacyProfileSource for FixedLegacy {
        async fn load_legacy_profile(
            &self,
            _business_id: &str,
        ) -> Result<Option<LegacyProfile>, DomainError> {
            Ok(self.0.clone())
        }
    }

    struct PrefixResolver;

    #[async_trait]
    impl AssetResolver for PrefixResolver {
        async fn resolve(&self, path: &str) -> Result<String, DomainError> {
            if path.contains("broken") {
                return Err(DomainError::Asset(path.to_string()));
            }
            Ok(format!("https://cdn.test/{path}?token=abc"))
        }
    }

    fn service(store: FixedStore, legacy: Option<LegacyProfile>) -> PageService {
        PageService::new(
            Arc::new(store),
            Arc::new(FixedLegacy(legacy)),
            TemplateId::default(),
        )
    }

    fn acme() -> LegacyProfile {
        LegacyProfile {
            business_name: Some("Acme".into()),
            ..LegacyProfile::default()
        }
    }

    #[tokio::test]
    async fn test_stored_blocks_win() {
        let stored = StoredPage {
            page_blocks: json!([
                { "id": "a", "type": "rich-text", "order": 0, "data": { "content": "Hi" } },
                { "id": "b", "type": "testimonial", "order": 1, "data": {} }
            ]),
            page_template_id: Some("classic".into()),
        };
        let loaded = service(FixedStore(Ok(Some(stored))), Some(acme()))
            .load_page("biz")
            .await;
        assert_eq!(loaded.source, PageSource::Stored);
        assert_eq!(loaded.page.blocks.len(), 1);
        assert_eq!(loaded.violations.len(), 1);
        assert_eq!(loaded.page.template_id.as_str(), "classic");
    }

    #[tokio::test]
    async fn test_empty_stored_page_migrates_legacy() {
        let stored = StoredPage {
            page_blocks: json!([]),
            page_template_id: None,
        };
        let loaded = service(FixedStore(Ok(Some(stored))), Some(acme()))
            .load_page("biz")
            .await;
        assert_eq!(loaded.source, PageSource::Migrated);
        assert_eq!(loaded.page.blocks[0].block_type(), BlockType::Hero);
    }

    #[tokio::test]
    async fn test_failures_fall_back_to_minimum() {
        let loaded = service(FixedStore(Err(())), None).load_page("biz").await;
        assert_eq!(loaded.source, PageSource::Minimum);
        let kinds: Vec<BlockType> = loaded
            .page
            .sorted_blocks()
            .iter()
            .map(|b| b.block_type())
            .collect();
        assert_eq!(kinds, vec![BlockType::Hero, BlockType::Cta]);
    }

    #[test]
    fn test_storage_path_detection() {
        assert!(is_storage_path("logos/acme.png"));
        assert!(!is_storage_path("https://cdn.test/a.png"));
        assert!(!is_storage_path("/static/a.png"));
        assert!(!is_storage_path("#jobs"));
        assert!(!is_storage_path("data:image/png;base64,AAAA"));
        assert!(!is_storage_path(""));
        assert!(!is_storage_path("javascript:alert(1)"));
        assert!(!is_storage_path("vbscript:msgbox"));
        assert!(!is_storage_path("blob:https://app.test/1234"));
        assert!(is_storage_path("photos/team:2024.jpg"));
    }

    fn hero_page(logo: &str) -> Page {
        Page::new(
            TemplateId::default(),
            vec![Block::new(
                0,
                BlockContent::Hero(HeroData {
                    heading: "Acme".into(),
                    logo_url: Some(logo.into()),
                    background_image: Some("https://img.test/bg.jpg".into()),
                    ..HeroData::default()
                }),
            )],
        )
    }

    #[tokio::test]
    async fn test_resolve_assets_rewrites_storage_paths() {
        let mut page = hero_page("logos/acme.png");
        let count = resolve_page_assets(&mut page, &PrefixResolver, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(count, 1);
        let BlockContent::Hero(hero) = &page.blocks[0].content else {
            panic!("expected hero");
        };
        assert_eq!(
            hero.logo_url.as_deref(),
            Some("https://cdn.test/logos/acme.png?token=abc")
        );
        assert_eq!(hero.background_image.as_deref(), Some("https://img.test/bg.jpg"));
    }

    #[tokio::test]
    async fn test_unresolvable_asset_is_left_alone() {
        let mut page = hero_page("logos/broken.png");
        let count = resolve_page_assets(&mut page, &PrefixResolver, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(page, hero_page_with_same_ids(&page, "logos/broken.png"));
    }

    fn hero_page_with_same_ids(page: &Page, logo: &str) -> Page {
        let mut expected = hero_page(logo);
        expected.blocks[0].id = page.blocks[0].id.clone();
        expected
    }

    #[tokio::test]
    async fn test_cancelled_resolution_commits_nothing() {
        let mut page = hero_page("logos/acme.png");
        let before = page.clone();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = resolve_page_assets(&mut page, &PrefixResolver, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Cancelled));
        assert_eq!(page, before);
    }

    struct SlowResolver;

    #[async_trait]
    impl AssetResolver for SlowResolver {
        async fn resolve(&self, path: &str) -> Result<String, DomainError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(format!("https://cdn.test/{path}"))
        }
    }

    #[tokio::test]
    async fn test_slow_resolution_is_cancelled_by_deadline() {
        let service =
            service(FixedStore(Ok(None)), None).with_assets(Arc::new(SlowResolver));
        let mut page = hero_page("logos/acme.png");
        let before = page.clone();
        let err = service
            .resolve_assets_within(&mut page, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Cancelled));
        assert_eq!(page, before);
    }

    #[tokio::test]
    async fn test_fast_resolution_beats_deadline() {
        let service =
            service(FixedStore(Ok(None)), None).with_assets(Arc::new(PrefixResolver));
        let mut page = hero_page("logos/acme.png");
        let count = service
            .resolve_assets_within(&mut page, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
