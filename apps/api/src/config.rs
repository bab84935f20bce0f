use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::history::store::DEFAULT_HISTORY_KEY;

/// Where analysis history is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "redis" => Ok(StorageBackend::Redis),
            other => bail!("STORAGE_BACKEND must be one of memory, file, redis (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if the selected backend is missing its settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub storage_backend: StorageBackend,
    pub storage_dir: PathBuf,
    pub redis_url: Option<String>,
    pub history_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend: StorageBackend = env_or("STORAGE_BACKEND", "file").parse()?;
        let redis_url = std::env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty());
        if storage_backend == StorageBackend::Redis && redis_url.is_none() {
            bail!("Required environment variable 'REDIS_URL' is not set (STORAGE_BACKEND=redis)");
        }

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            storage_backend,
            storage_dir: PathBuf::from(env_or("STORAGE_DIR", "./data")),
            redis_url,
            history_key: env_or("HISTORY_KEY", DEFAULT_HISTORY_KEY),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
