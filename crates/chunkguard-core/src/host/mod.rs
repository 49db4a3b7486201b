//! The host module system the loader wraps.
//!
//! A bundler runtime provides two primitives: load a chunk by id, and compute
//! the script URL for a chunk id. `ChunkHost` models both. The loader passes
//! the URL it computed into `ensure_chunk`, so the URL a request goes to always
//! reflects the current cache-bust query.

mod scripted;

use std::future::Future;

use crate::chunk::ChunkId;
use crate::error::HostError;

pub use scripted::{Request, ScriptedHost};

pub trait ChunkHost: Send + Sync {
    /// Fetch and evaluate the chunk script at `url`.
    fn ensure_chunk(
        &self,
        id: &ChunkId,
        url: &str,
    ) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Script URL for the chunk, without any retry query.
    fn chunk_script_filename(&self, id: &ChunkId) -> String;
}
