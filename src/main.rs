//! Wiring & DI. Entry point: pick the storage adapter, build the page service, run UI.
//! No business logic here; loading, editing and saving live in the use cases.

use bizpage::adapters::backend::{RestBackend, RestBackendConfig};
use bizpage::adapters::persistence::{JsonPageStore, MemoryStore, SqliteRepo};
use bizpage::adapters::ui::TuiInputPort;
use bizpage::domain::TemplateId;
use bizpage::ports::{AssetResolver, InputPort, LegacyProfileSource, PageStore};
use bizpage::shared::config::{AppConfig, StoreKind};
use bizpage::usecases::PageService;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type Adapters = (
    Arc<dyn PageStore>,
    Arc<dyn LegacyProfileSource>,
    Option<Arc<dyn AssetResolver>>,
);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    bizpage::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable, using defaults");
        AppConfig::default()
    });

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    let (store, legacy, assets) = build_adapters(&cfg, &data_path).await?;

    let mut service = PageService::new(
        store,
        legacy,
        TemplateId::new(cfg.default_template_or_default()),
    );
    if let Some(resolver) = assets {
        service = service.with_assets(resolver);
    }

    let business_id = cfg.business_id_or_default();
    info!(business_id = %business_id, store = ?cfg.store_or_default(), "starting page builder");

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::new(service),
        business_id,
        PathBuf::from(cfg.output_dir_or_default()),
    ));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

/// Storage, legacy source and (for the hosted backend) asset resolver.
async fn build_adapters(cfg: &AppConfig, data_path: &std::path::Path) -> anyhow::Result<Adapters> {
    match cfg.store_or_default() {
        StoreKind::Sqlite => {
            let repo = Arc::new(
                SqliteRepo::connect(data_path)
                    .await
                    .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
            );
            Ok((
                Arc::clone(&repo) as Arc<dyn PageStore>,
                repo as Arc<dyn LegacyProfileSource>,
                None,
            ))
        }
        StoreKind::Json => {
            let dir = data_path.join("pages");
            info!(path = %dir.display(), "JSON page store");
            let store = Arc::new(JsonPageStore::new(dir));
            Ok((
                Arc::clone(&store) as Arc<dyn PageStore>,
                store as Arc<dyn LegacyProfileSource>,
                None,
            ))
        }
        StoreKind::Memory => {
            warn!("in-memory store: edits are lost on exit");
            let store = Arc::new(MemoryStore::new());
            Ok((
                Arc::clone(&store) as Arc<dyn PageStore>,
                store as Arc<dyn LegacyProfileSource>,
                None,
            ))
        }
        StoreKind::Rest => {
            if !cfg.is_backend_configured() {
                anyhow::bail!("Set BIZPAGE_BACKEND_URL and BIZPAGE_BACKEND_API_KEY (env or .env)");
            }
            let backend = Arc::new(RestBackend::new(RestBackendConfig {
                base_url: cfg.backend_url.clone().unwrap_or_default(),
                api_key: cfg.backend_api_key.clone().unwrap_or_default(),
                bucket: cfg.storage_bucket_or_default(),
                signed_url_ttl_secs: cfg.signed_url_ttl_secs_or_default(),
                public_assets: cfg.public_assets.unwrap_or(false),
            }));
            info!(bucket = %cfg.storage_bucket_or_default(), "hosted backend enabled");
            Ok((
                Arc::clone(&backend) as Arc<dyn PageStore>,
                Arc::clone(&backend) as Arc<dyn LegacyProfileSource>,
                Some(backend as Arc<dyn AssetResolver>),
            ))
        }
    }
}
