//! Application configuration. Storage backend, paths, business selection.

use serde::Deserialize;

/// Signed asset URLs stay valid for one hour unless configured otherwise.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

/// Which adapter persists pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Json,
    Rest,
    Memory,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Directory for the SQLite database or JSON page files. Read from BIZPAGE_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// sqlite | json | rest | memory. Read from BIZPAGE_STORE.
    #[serde(default)]
    pub store: Option<StoreKind>,

    // ─────────────────────────────────────────────────────────────────────────
    // Hosted backend
    // ─────────────────────────────────────────────────────────────────────────
    /// Project base URL. Read from BIZPAGE_BACKEND_URL.
    #[serde(default)]
    pub backend_url: Option<String>,

    /// API key sent as `apikey` and bearer token. Read from BIZPAGE_BACKEND_API_KEY.
    #[serde(default)]
    pub backend_api_key: Option<String>,

    /// Storage bucket holding page media. Read from BIZPAGE_STORAGE_BUCKET.
    #[serde(default)]
    pub storage_bucket: Option<String>,

    /// Lifetime of signed asset URLs. Read from BIZPAGE_SIGNED_URL_TTL_SECS.
    #[serde(default)]
    pub signed_url_ttl_secs: Option<u64>,

    /// Build public object URLs instead of signing. Read from BIZPAGE_PUBLIC_ASSETS.
    #[serde(default)]
    pub public_assets: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Where previews are written. Read from BIZPAGE_OUTPUT_DIR.
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Business whose page is edited. Read from BIZPAGE_BUSINESS_ID.
    #[serde(default)]
    pub business_id: Option<String>,

    /// Theme for pages that have none stored. Read from BIZPAGE_DEFAULT_TEMPLATE.
    #[serde(default)]
    pub default_template: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("BIZPAGE_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix("BIZPAGE").try_parsing(true));
        c.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    pub fn store_or_default(&self) -> StoreKind {
        self.store.unwrap_or_default()
    }

    pub fn output_dir_or_default(&self) -> String {
        self.output_dir.clone().unwrap_or_else(|| "./out".to_string())
    }

    pub fn business_id_or_default(&self) -> String {
        self.business_id.clone().unwrap_or_else(|| "demo".to_string())
    }

    pub fn default_template_or_default(&self) -> String {
        self.default_template
            .clone()
            .unwrap_or_else(|| crate::domain::TemplateId::DEFAULT.to_string())
    }

    pub fn storage_bucket_or_default(&self) -> String {
        self.storage_bucket
            .clone()
            .unwrap_or_else(|| "business-media".to_string())
    }

    pub fn signed_url_ttl_secs_or_default(&self) -> u64 {
        self.signed_url_ttl_secs
            .unwrap_or(DEFAULT_SIGNED_URL_TTL_SECS)
    }

    /// True if the hosted backend can be reached (URL and key present).
    pub fn is_backend_configured(&self) -> bool {
        self.backend_url.as_deref().is_some_and(|u| !u.is_empty())
            && self.backend_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.store_or_default(), StoreKind::Sqlite);
        assert_eq!(cfg.signed_url_ttl_secs_or_default(), 3600);
        assert_eq!(cfg.default_template_or_default(), "employer-brand");
        assert!(!cfg.is_backend_configured());
    }

    #[test]
    fn test_deserialize_from_source() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"{ "store": "json", "business_id": "acme", "public_assets": true }"#,
                config::FileFormat::Json,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.store_or_default(), StoreKind::Json);
        assert_eq!(cfg.business_id_or_default(), "acme");
        assert_eq!(cfg.public_assets, Some(true));
    }
}
