//! PageStore + LegacyProfileSource over one JSON file per business.
//!
//! Layout: {dir}/{business_id}.json holding the page columns and, optionally, the
//! legacy record. Writes go through a temp file, `sync_all`, then rename.

use crate::domain::{DomainError, LegacyProfile, Page};
use crate::ports::{LegacyProfileSource, PageStore, StoredPage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    page_blocks: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    legacy: Option<LegacyProfile>,
}

pub struct JsonPageStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonPageStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for(&self, business_id: &str) -> Result<PathBuf, DomainError> {
        let valid = !business_id.is_empty()
            && business_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !business_id.starts_with('.');
        if !valid {
            return Err(DomainError::Repo(format!(
                "business id not usable as a file name: {business_id:?}"
            )));
        }
        Ok(self.dir.join(format!("{business_id}.json")))
    }

    async fn read(&self, path: &Path) -> Result<Option<ProfileFile>, DomainError> {
        match fs::read_to_string(path).await {
            Ok(s) => serde_json::from_str(&s)
                .map(Some)
                .map_err(|e| DomainError::Repo(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Repo(e.to_string())),
        }
    }

    async fn write_atomic(&self, path: &Path, file: &ProfileFile) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let json =
            serde_json::to_string_pretty(file).map_err(|e| DomainError::Repo(e.to_string()))?;

        let temp_path = path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Repo(format!("create temp file: {e}")))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(format!("write temp file: {e}")))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Repo(format!("sync temp file: {e}")))?;
        drop(f);

        fs::rename(&temp_path, path)
            .await
            .map_err(|e| DomainError::Repo(format!("atomic rename failed: {e}")))
    }

    /// Store (or replace) the legacy record, keeping any page already saved.
    pub async fn put_legacy_profile(
        &self,
        business_id: &str,
        profile: &LegacyProfile,
    ) -> Result<(), DomainError> {
        let path = self.path_for(business_id)?;
        let _guard = self.write_lock.lock().await;
        let mut file = self.read(&path).await?.unwrap_or_default();
        file.legacy = Some(profile.clone());
        self.write_atomic(&path, &file).await
    }
}

#[async_trait::async_trait]
impl PageStore for JsonPageStore {
    async fn load_page(&self, business_id: &str) -> Result<Option<StoredPage>, DomainError> {
        let path = self.path_for(business_id)?;
        Ok(self.read(&path).await?.map(|f| StoredPage {
            page_blocks: f.page_blocks,
            page_template_id: f.page_template_id,
        }))
    }

    async fn save_page(&self, business_id: &str, page: &Page) -> Result<(), DomainError> {
        let path = self.path_for(business_id)?;
        let stored = StoredPage::from_page(page)?;
        let _guard = self.write_lock.lock().await;
        let mut file = self.read(&path).await?.unwrap_or_default();
        file.page_blocks = stored.page_blocks;
        file.page_template_id = stored.page_template_id;
        file.updated_at = Some(page.updated_at.unwrap_or_else(Utc::now));
        self.write_atomic(&path, &file).await?;
        info!(business_id, path = %path.display(), blocks = page.blocks.len(), "page written");
        Ok(())
    }
}

#[async_trait::async_trait]
impl LegacyProfileSource for JsonPageStore {
    async fn load_legacy_profile(
        &self,
        business_id: &str,
    ) -> Result<Option<LegacyProfile>, DomainError> {
        let path = self.path_for(business_id)?;
        Ok(self.read(&path).await?.and_then(|f| f.legacy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TemplateId, decode_blocks};

    #[tokio::test]
    async fn test_save_keeps_legacy_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPageStore::new(dir.path());
        let legacy = LegacyProfile {
            tagline: Some("Build rockets".into()),
            ..LegacyProfile::default()
        };
        store.put_legacy_profile("acme", &legacy).await.unwrap();

        let page = Page::minimum(Some("Acme"), TemplateId::default());
        store.save_page("acme", &page).await.unwrap();

        let stored = store.load_page("acme").await.unwrap().unwrap();
        assert_eq!(decode_blocks(&stored.page_blocks).blocks, page.blocks);
        assert_eq!(store.load_legacy_profile("acme").await.unwrap(), Some(legacy));
        assert!(!dir.path().join("acme.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_file_and_bad_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPageStore::new(dir.path());
        assert!(store.load_page("nobody").await.unwrap().is_none());
        assert!(store.load_page("../etc/passwd").await.is_err());
        assert!(store.load_page("").await.is_err());
    }
}
