//! `chunkguard fallback` – run the origin-fallback heuristic once.

use anyhow::Result;
use chunkguard_core::config::LoaderConfig;
use chunkguard_core::env::{EnvFlags, SharedEnv};
use chunkguard_core::fallback::{self, FallbackOutcome};
use chunkguard_core::storage::{FileStorage, PageStorage, REVISION_HOST_KEY};

use super::PageArgs;

pub fn run_fallback(cfg: &LoaderConfig, local_host_loaded: bool, page: &PageArgs) -> Result<()> {
    let document = super::document(page)?;
    let storage = FileStorage::open_default()?;
    let env = SharedEnv::new(EnvFlags {
        ed_local_host_loaded: local_host_loaded,
        ..EnvFlags::with_cdn_host(cfg.cdn_host.clone())
    });

    match fallback::apply(&env, &document, &storage, &cfg.cdn_host) {
        FallbackOutcome::NoQualifyingLink => println!("no qualifying stylesheet; nothing changed"),
        FallbackOutcome::SwitchedToCdn { chunk_url } => println!("switched to CDN: {}", chunk_url),
        FallbackOutcome::SwitchedToOrigin { chunk_url } => {
            println!("switched to page origin: {}", chunk_url)
        }
    }
    let flags = env.snapshot();
    println!("{:#?}", flags);
    println!(
        "{} = {} ({})",
        REVISION_HOST_KEY,
        storage.get_item(REVISION_HOST_KEY).as_deref().unwrap_or("-"),
        storage.path().display()
    );
    Ok(())
}
