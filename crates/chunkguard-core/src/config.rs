use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::loader::{CacheBust, LoaderOptions, MaxRetries, RetryDelay, DEFAULT_CDN_HOST};

fn default_max_retries() -> MaxRetries {
    MaxRetries::Int(1)
}

fn default_cdn_host() -> String {
    DEFAULT_CDN_HOST.to_string()
}

/// Loader configuration loaded from `~/.config/chunkguard/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Retries per chunk. Anything but a positive integer falls back to 1.
    #[serde(default = "default_max_retries")]
    pub max_retries: MaxRetries,
    /// Fixed delay before each retry, in milliseconds.
    #[serde(default)]
    pub retry_delay_ms: u64,
    /// Static cache-bust token; if missing, `cache-bust=true` is used.
    #[serde(default)]
    pub cache_bust: Option<String>,
    /// Chunk names that get retry behavior; if missing, all chunks do.
    #[serde(default)]
    pub chunks: Option<Vec<String>>,
    /// CDN host the origin fallback switches back to.
    #[serde(default = "default_cdn_host")]
    pub cdn_host: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: 0,
            cache_bust: None,
            chunks: None,
            cdn_host: default_cdn_host(),
        }
    }
}

impl LoaderConfig {
    /// Build loader options; invalid values are normalized, never rejected.
    pub fn to_options(&self) -> LoaderOptions {
        let mut options = LoaderOptions::new()
            .with_max_retries(self.max_retries.clone())
            .with_retry_delay(RetryDelay::Fixed(Duration::from_millis(self.retry_delay_ms)))
            .with_cdn_host(self.cdn_host.clone());
        if let Some(token) = &self.cache_bust {
            options = options.with_cache_bust(CacheBust::Static(token.clone()));
        }
        if let Some(chunks) = &self.chunks {
            options = options.with_chunks(chunks.iter().cloned());
        }
        options
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("chunkguard")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LoaderConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LoaderConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: LoaderConfig = toml::from_str(&data)?;
    Ok(cfg)
}
