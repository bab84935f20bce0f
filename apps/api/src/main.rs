mod analysis;
mod config;
mod errors;
mod history;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::history::kv::{FileKvStore, KvStore, MemoryKvStore, RedisKvStore};
use crate::history::store::HistoryStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing backend setting)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement Prep API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize history storage
    let kv = build_kv_store(&config)?;
    let history = HistoryStore::new(kv, config.history_key.clone());
    info!("History key: {}", config.history_key);

    // Build app state
    let state = AppState {
        history: Arc::new(history),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Selects the key-value backend named by `STORAGE_BACKEND`.
fn build_kv_store(config: &Config) -> Result<Arc<dyn KvStore>> {
    let kv: Arc<dyn KvStore> = match config.storage_backend {
        StorageBackend::Memory => {
            info!("Storage: in-memory (history is lost on restart)");
            Arc::new(MemoryKvStore::new())
        }
        StorageBackend::File => {
            let store = FileKvStore::new(config.storage_dir.clone());
            info!("Storage: files under {}", store.dir().display());
            Arc::new(store)
        }
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required for the redis backend")?;
            let store = RedisKvStore::open(url).context("Failed to open Redis client")?;
            info!("Storage: Redis client initialized");
            Arc::new(store)
        }
    };
    Ok(kv)
}
