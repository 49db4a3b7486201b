//! `chunkguard simulate <chunk>` – run one load against a scripted host.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chunkguard_core::chunk::{ChunkId, ChunkManifest};
use chunkguard_core::config::LoaderConfig;
use chunkguard_core::env::{EnvFlags, SharedEnv};
use chunkguard_core::host::ScriptedHost;
use chunkguard_core::loader::{CacheBust, ChunkLoader, LoaderOptions, PageContext, RetryDelay};
use chunkguard_core::storage::MemoryStorage;

use super::PageArgs;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct SimulateOverrides {
    pub max_retries: Option<String>,
    pub delay_ms: Option<u64>,
    pub cache_bust: Option<String>,
}

pub fn options(cfg: &LoaderConfig, overrides: &SimulateOverrides) -> LoaderOptions {
    let mut options = cfg.to_options();
    if let Some(raw) = overrides.max_retries.as_deref() {
        options = options.with_max_retries(raw);
    }
    if let Some(ms) = overrides.delay_ms {
        options = options.with_retry_delay(RetryDelay::Fixed(Duration::from_millis(ms)));
    }
    if let Some(token) = &overrides.cache_bust {
        options = options.with_cache_bust(CacheBust::Static(token.clone()));
    }
    options
}

pub async fn run_simulate(
    cfg: &LoaderConfig,
    chunk: &str,
    name: Option<&str>,
    fail: u32,
    overrides: SimulateOverrides,
    page: &PageArgs,
) -> Result<()> {
    let id = ChunkId::parse(chunk);
    let options = options(cfg, &overrides);
    let env = SharedEnv::new(EnvFlags::with_cdn_host(options.cdn_host.clone()));
    let page = PageContext {
        env: env.clone(),
        document: Arc::new(super::document(page)?),
        storage: Arc::new(MemoryStorage::new()),
    };
    let mut manifest = ChunkManifest::new();
    if let Some(name) = name {
        manifest = manifest.with_chunk(id.clone(), name);
    }

    let host = ScriptedHost::new("/static/js/").failing(id.clone(), fail);
    let loader = ChunkLoader::install(host, &manifest, options, page);

    println!(
        "chunk {} (retries: {}, covered: {})",
        id,
        loader.options().max_retries(),
        loader.covers(&id)
    );
    let outcome = loader.load(&id).await;
    for (n, req) in loader.host().requests().iter().enumerate() {
        println!("  attempt {:>2}  {}", n + 1, req.url);
    }
    match outcome {
        Ok(()) => println!("loaded"),
        Err(e) => println!("failed: {}", e),
    }
    let flags = env.snapshot();
    println!(
        "cdn host: {:?}  previous: {:?}  chunk url: {}",
        flags.cdn_host_const,
        flags.cdn_host_const_prev,
        flags.chunk_url.as_deref().unwrap_or("-")
    );
    Ok(())
}
