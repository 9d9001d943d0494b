//! SQLite-backed store via libsql. Implements PageStore and LegacyProfileSource.
//!
//! One `business_profiles` row per business: the block page (JSON text), its
//! template id and the flat legacy record side by side. All businesses share one
//! database file: {data_dir}/bizpage.db

use crate::domain::{DomainError, LegacyProfile, Page};
use crate::ports::{LegacyProfileSource, PageStore, StoredPage};
use chrono::Utc;
use libsql::{Connection, Database, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PROFILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS business_profiles (
    business_id TEXT PRIMARY KEY,
    page_blocks TEXT,
    page_template_id TEXT,
    legacy_json TEXT,
    updated_at TEXT
)"#;

pub struct SqliteRepo {
    db: Database,
    db_path: PathBuf,
}

/// PRAGMA statements return a row; drain it instead of `execute`.
async fn pragma(conn: &Connection, sql: &str) -> Result<(), DomainError> {
    let mut rows = conn
        .query(sql, ())
        .await
        .map_err(|e| DomainError::Repo(format!("{sql} failed: {e}")))?;
    while rows
        .next()
        .await
        .map_err(|e| DomainError::Repo(e.to_string()))?
        .is_some()
    {}
    Ok(())
}

impl SqliteRepo {
    /// Open (or create) the database in `base_dir` and ensure the schema exists.
    /// WAL journal with synchronous=NORMAL.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Repo(e.to_string()))?;
        let db_path = base.join("bizpage.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let conn = db.connect().map_err(|e| DomainError::Repo(e.to_string()))?;

        pragma(&conn, "PRAGMA journal_mode=WAL").await?;
        pragma(&conn, "PRAGMA synchronous=NORMAL").await?;
        conn.execute(PROFILES_TABLE, ())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;

        info!(path = %db_path.display(), "SQLite connected");
        Ok(Self { db, db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<Connection, DomainError> {
        self.db.connect().map_err(|e| DomainError::Repo(e.to_string()))
    }

    /// Store (or replace) the legacy record for a business. Leaves page columns alone.
    pub async fn upsert_legacy_profile(
        &self,
        business_id: &str,
        profile: &LegacyProfile,
    ) -> Result<(), DomainError> {
        let json = serde_json::to_string(profile).map_err(|e| DomainError::Repo(e.to_string()))?;
        self.conn()?
            .execute(
                r#"
                INSERT INTO business_profiles (business_id, legacy_json)
                VALUES (?1, ?2)
                ON CONFLICT (business_id) DO UPDATE SET legacy_json = excluded.legacy_json
                "#,
                params![business_id, json],
            )
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        debug!(business_id, "legacy profile stored");
        Ok(())
    }
}

#[async_trait::async_trait]
impl PageStore for SqliteRepo {
    async fn load_page(&self, business_id: &str) -> Result<Option<StoredPage>, DomainError> {
        let mut rows = self
            .conn()?
            .query(
                "SELECT page_blocks, page_template_id FROM business_profiles WHERE business_id = ?1",
                params![business_id],
            )
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
        else {
            return Ok(None);
        };

        let blocks_json: Option<String> = row.get(0).ok();
        let page_template_id: Option<String> = row.get(1).ok();
        let page_blocks = match blocks_json.as_deref() {
            None => serde_json::Value::Null,
            Some(text) => serde_json::from_str(text).unwrap_or_else(|e| {
                warn!(business_id, error = %e, "page_blocks is not valid JSON");
                serde_json::Value::Null
            }),
        };
        Ok(Some(StoredPage {
            page_blocks,
            page_template_id,
        }))
    }

    async fn save_page(&self, business_id: &str, page: &Page) -> Result<(), DomainError> {
        let stored = StoredPage::from_page(page)?;
        let blocks_json = stored.page_blocks.to_string();
        let updated_at = page.updated_at.unwrap_or_else(Utc::now).to_rfc3339();
        self.conn()?
            .execute(
                r#"
                INSERT INTO business_profiles (business_id, page_blocks, page_template_id, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT (business_id) DO UPDATE SET
                    page_blocks = excluded.page_blocks,
                    page_template_id = excluded.page_template_id,
                    updated_at = excluded.updated_at
                "#,
                params![
                    business_id,
                    blocks_json,
                    page.template_id.as_str(),
                    updated_at
                ],
            )
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        info!(business_id, blocks = page.blocks.len(), "page written to SQLite");
        Ok(())
    }
}

#[async_trait::async_trait]
impl LegacyProfileSource for SqliteRepo {
    async fn load_legacy_profile(
        &self,
        business_id: &str,
    ) -> Result<Option<LegacyProfile>, DomainError> {
        let mut rows = self
            .conn()?
            .query(
                "SELECT legacy_json FROM business_profiles WHERE business_id = ?1",
                params![business_id],
            )
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
        else {
            return Ok(None);
        };
        let Some(json) = row.get::<String>(0).ok() else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| DomainError::Repo(format!("legacy_json for {business_id}: {e}")))
    }
}
