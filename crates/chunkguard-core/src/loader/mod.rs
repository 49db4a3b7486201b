//! Retry-aware chunk loader.
//!
//! `ChunkLoader` wraps a `ChunkHost` and is installed once per page session.
//! Chunks covered by the allow-list get bounded retries with a cache-busting
//! query and the origin-fallback heuristic; other chunks go straight to the
//! host.
//!
//! Loads of the same chunk id are single-flight: a second caller waits for the
//! running retry sequence to settle before it starts, so the retry budget is
//! spent exactly once per sequence.

mod book;
mod options;
mod run;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::chunk::{ChunkId, ChunkManifest};
use crate::env::SharedEnv;
use crate::error::ChunkLoadError;
use crate::host::ChunkHost;
use crate::page::Document;
use crate::storage::PageStorage;

use book::RetryBook;

pub use options::{
    CacheBust, LastResort, LoaderOptions, MaxRetries, RetryDelay, DEFAULT_CACHE_BUST,
    DEFAULT_CDN_HOST, DEFAULT_MAX_RETRIES,
};

/// Page the loader runs in: the shared flags, the document and its storage.
#[derive(Clone)]
pub struct PageContext {
    pub env: SharedEnv,
    pub document: Arc<dyn Document>,
    pub storage: Arc<dyn PageStorage>,
}

/// Which chunks receive retry behavior. Decided once at install.
#[derive(Debug, Clone)]
enum Coverage {
    All,
    Only(HashSet<ChunkId>),
}

impl Coverage {
    fn resolve(manifest: &ChunkManifest, names: Option<&[String]>) -> Self {
        match names {
            None => Coverage::All,
            Some(names) => Coverage::Only(
                manifest
                    .iter()
                    .filter(|(_, name)| names.iter().any(|allowed| allowed == name))
                    .map(|(id, _)| id.clone())
                    .collect(),
            ),
        }
    }

    fn covers(&self, id: &ChunkId) -> bool {
        match self {
            Coverage::All => true,
            Coverage::Only(ids) => ids.contains(id),
        }
    }
}

/// Retry-aware wrapper over a `ChunkHost`, one per page session.
///
/// Per-chunk entries (retry budget, query override, single-flight lock) are
/// created on first use and kept for the loader's lifetime, so they are bounded
/// by the number of distinct chunk ids.
pub struct ChunkLoader<H> {
    host: H,
    options: LoaderOptions,
    coverage: Coverage,
    page: PageContext,
    book: Mutex<RetryBook>,
    flights: Mutex<HashMap<ChunkId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<H: ChunkHost> ChunkLoader<H> {
    /// Install the loader over `host`.
    ///
    /// The allow-list in `options.chunks` is matched against chunk names in
    /// `manifest`; a chunk without a manifest name is only covered when no
    /// allow-list is given.
    pub fn install(
        host: H,
        manifest: &ChunkManifest,
        options: LoaderOptions,
        page: PageContext,
    ) -> Self {
        let coverage = Coverage::resolve(manifest, options.chunks.as_deref());
        tracing::debug!(?options, ?coverage, "chunk loader installed");
        Self {
            host,
            options,
            coverage,
            page,
            book: Mutex::new(RetryBook::default()),
            flights: Mutex::new(HashMap::new()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn env(&self) -> &SharedEnv {
        &self.page.env
    }

    /// Whether `id` gets retry behavior.
    pub fn covers(&self, id: &ChunkId) -> bool {
        self.coverage.covers(id)
    }

    /// Script URL for `id`, with the pending retry query appended when one is stored.
    pub fn chunk_url(&self, id: &ChunkId) -> String {
        let base = self.host.chunk_script_filename(id);
        match self.book().query(id) {
            Some(query) => format!("{}?{}", base, query),
            None => base,
        }
    }

    /// Load `id`, retrying per the options when the chunk is covered.
    pub async fn load(&self, id: &ChunkId) -> Result<(), ChunkLoadError> {
        if !self.covers(id) {
            let url = self.host.chunk_script_filename(id);
            return self
                .host
                .ensure_chunk(id, &url)
                .await
                .map_err(ChunkLoadError::Unguarded);
        }

        let flight = self.flight(id);
        let _guard = flight.lock().await;
        self.run(id).await
    }

    /// Retries left for `id`; `None` until its first failure.
    pub fn remaining_retries(&self, id: &ChunkId) -> Option<u32> {
        self.book().remaining(id)
    }

    /// Query suffix the next request for `id` will carry.
    pub fn query_override(&self, id: &ChunkId) -> Option<String> {
        self.book().query(id).map(str::to_string)
    }

    fn book(&self) -> MutexGuard<'_, RetryBook> {
        self.book.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn flight(&self, id: &ChunkId) -> Arc<tokio::sync::Mutex<()>> {
        let mut flights = self.flights.lock().unwrap_or_else(|p| p.into_inner());
        Arc::clone(flights.entry(id.clone()).or_default())
    }
}
