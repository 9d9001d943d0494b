//! Hosted backend adapter. PostgREST-style table API plus object storage signing.
//!
//! Implements PageStore, LegacyProfileSource and AssetResolver against one
//! `business_profiles` table keyed by `user_id`.

use crate::domain::{DomainError, LegacyProfile, Page};
use crate::ports::{AssetResolver, LegacyProfileSource, PageStore, StoredPage};
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const PROFILES_PATH: &str = "/rest/v1/business_profiles";
const LEGACY_COLUMNS: &str = "business_name,name,description,logo_url,hero_image_url,tagline,\
value_prop_headline,value_prop_body,impact_stats,culture_values,benefits,business_areas";

#[derive(Debug, Clone)]
pub struct RestBackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub bucket: String,
    pub signed_url_ttl_secs: u64,
    /// Bucket is public: build object URLs without signing.
    pub public_assets: bool,
}

pub struct RestBackend {
    config: RestBackendConfig,
    client: OnceCell<Client>,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl RestBackend {
    pub fn new(mut config: RestBackendConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Shared HTTP client, built on first use.
    async fn client(&self) -> Result<&Client, DomainError> {
        self.client
            .get_or_try_init(|| async {
                Client::builder()
                    .user_agent(concat!("bizpage/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|e| DomainError::Backend(format!("HTTP client init failed: {e}")))
            })
            .await
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn check(res: Response) -> Result<Response, DomainError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
        Err(DomainError::Backend(format!("backend error {status}: {text}")))
    }

    /// First row matching the business, with the given columns.
    async fn select_row<T: serde::de::DeserializeOwned>(
        &self,
        business_id: &str,
        columns: &str,
    ) -> Result<Option<T>, DomainError> {
        let url = format!("{}{PROFILES_PATH}", self.config.base_url);
        let req = self.client().await?.get(&url).query(&[
            ("select", columns.to_string()),
            ("user_id", format!("eq.{business_id}")),
            ("limit", "1".to_string()),
        ]);
        let res = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| DomainError::Backend(format!("Request failed: {e}")))?;
        let rows: Vec<T> = Self::check(res)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::Backend(format!("Malformed response: {e}")))?;
        Ok(rows.into_iter().next())
    }
}

/// Public object URL for `path` in `bucket`.
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{bucket}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Absolute URL from the signing endpoint's `signedURL`, which is relative to `/storage/v1`.
pub fn absolute_signed_url(base_url: &str, signed: &str) -> String {
    if signed.starts_with("http://") || signed.starts_with("https://") {
        return signed.to_string();
    }
    format!(
        "{}/storage/v1/{}",
        base_url.trim_end_matches('/'),
        signed.trim_start_matches('/')
    )
}

#[async_trait::async_trait]
impl PageStore for RestBackend {
    async fn load_page(&self, business_id: &str) -> Result<Option<StoredPage>, DomainError> {
        let row: Option<StoredPage> = self
            .select_row(business_id, "page_blocks,page_template_id")
            .await?;
        debug!(business_id, found = row.is_some(), "page row fetched");
        Ok(row)
    }

    async fn save_page(&self, business_id: &str, page: &Page) -> Result<(), DomainError> {
        let stored = StoredPage::from_page(page)?;
        let body = serde_json::json!({
            "page_blocks": stored.page_blocks,
            "page_template_id": stored.page_template_id,
            "updated_at": page.updated_at.unwrap_or_else(Utc::now),
        });
        let url = format!("{}{PROFILES_PATH}", self.config.base_url);
        let req = self
            .client()
            .await?
            .patch(&url)
            .query(&[("user_id", format!("eq.{business_id}"))])
            .header("Prefer", "return=representation")
            .json(&body);
        let res = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| DomainError::Backend(format!("Request failed: {e}")))?;
        let rows: Vec<serde_json::Value> = Self::check(res)
            .await?
            .json()
            .await
            .map_err(|e| DomainError::Backend(format!("Malformed update response: {e}")))?;
        ensure_row_updated(&rows, business_id)?;
        info!(business_id, blocks = page.blocks.len(), "page saved to backend");
        Ok(())
    }
}

/// PATCH on a missing row succeeds with zero rows; treat that as a failed save.
fn ensure_row_updated(rows: &[serde_json::Value], business_id: &str) -> Result<(), DomainError> {
    if rows.is_empty() {
        return Err(DomainError::Backend(format!(
            "no business_profiles row for {business_id}; page not saved"
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl LegacyProfileSource for RestBackend {
    async fn load_legacy_profile(
        &self,
        business_id: &str,
    ) -> Result<Option<LegacyProfile>, DomainError> {
        self.select_row(business_id, LEGACY_COLUMNS).await
    }
}

#[async_trait::async_trait]
impl AssetResolver for RestBackend {
    async fn resolve(&self, path: &str) -> Result<String, DomainError> {
        let cfg = &self.config;
        if cfg.public_assets {
            return Ok(public_object_url(&cfg.base_url, &cfg.bucket, path));
        }
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            cfg.base_url,
            cfg.bucket,
            path.trim_start_matches('/')
        );
        let req = self
            .client()
            .await?
            .post(&url)
            .json(&serde_json::json!({ "expiresIn": cfg.signed_url_ttl_secs }));
        let res = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| DomainError::Asset(format!("{path}: {e}")))?;
        let signed: SignResponse = Self::check(res)
            .await
            .map_err(|e| DomainError::Asset(format!("{path}: {e}")))?
            .json()
            .await
            .map_err(|e| DomainError::Asset(format!("{path}: malformed response: {e}")))?;
        Ok(absolute_signed_url(&cfg.base_url, &signed.signed_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(public_assets: bool) -> RestBackend {
        RestBackend::new(RestBackendConfig {
            base_url: "https://proj.example.co/".into(),
            api_key: "anon".into(),
            bucket: "business-media".into(),
            signed_url_ttl_secs: 3600,
            public_assets,
        })
    }

    #[test]
    fn test_url_helpers() {
        assert_eq!(
            public_object_url("https://proj.example.co/", "media", "/logos/a.png"),
            "https://proj.example.co/storage/v1/object/public/media/logos/a.png"
        );
        assert_eq!(
            absolute_signed_url("https://proj.example.co", "/object/sign/media/a.png?token=t"),
            "https://proj.example.co/storage/v1/object/sign/media/a.png?token=t"
        );
        assert_eq!(
            absolute_signed_url("https://proj.example.co", "https://cdn.test/a.png"),
            "https://cdn.test/a.png"
        );
    }

    #[tokio::test]
    async fn test_public_assets_resolve_without_network() {
        let url = backend(true).resolve("logos/acme.png").await.unwrap();
        assert_eq!(
            url,
            "https://proj.example.co/storage/v1/object/public/business-media/logos/acme.png"
        );
    }

    #[tokio::test]
    async fn test_client_is_built_once() {
        let b = backend(false);
        let first: *const Client = b.client().await.unwrap();
        let second: *const Client = b.client().await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sign_response_shape() {
        let r: SignResponse =
            serde_json::from_str(r#"{"signedURL":"/object/sign/m/a.png?token=x"}"#).unwrap();
        assert!(r.signed_url.ends_with("token=x"));
    }

    #[test]
    fn test_update_touching_no_row_is_an_error() {
        let err = ensure_row_updated(&[], "acme").unwrap_err();
        assert!(matches!(err, DomainError::Backend(msg) if msg.contains("acme")));

        let rows = vec![serde_json::json!({ "user_id": "acme" })];
        assert!(ensure_row_updated(&rows, "acme").is_ok());
    }
}
