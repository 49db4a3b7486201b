//! Error types for chunk loading.
//!
//! `HostError` is what the underlying module system reports for one attempt;
//! `ChunkLoadError` is what a caller of `ChunkLoader::load` sees.

use std::fmt;

use thiserror::Error;

use crate::chunk::ChunkId;

/// Why the host failed to load a chunk script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFailure {
    /// Script responded with an error status or was not found.
    Missing,
    /// Script did not arrive in time.
    Timeout,
    /// Script arrived but failed to evaluate.
    Load,
}

impl fmt::Display for ScriptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptFailure::Missing => write!(f, "missing"),
            ScriptFailure::Timeout => write!(f, "timeout"),
            ScriptFailure::Load => write!(f, "load"),
        }
    }
}

/// Error returned by a single `ChunkHost::ensure_chunk` attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("script {url} failed to load ({kind})")]
    Script { url: String, kind: ScriptFailure },
    #[error("{0}")]
    Other(String),
}

/// Error surfaced by `ChunkLoader::load`.
#[derive(Debug, Clone, Error)]
pub enum ChunkLoadError {
    /// Every retry was used up. Carries the real source URL of the chunk.
    #[error("Loading chunk {chunk_id} failed after {max_retries} retries.\n({request})")]
    Exhausted {
        chunk_id: ChunkId,
        request: String,
        max_retries: u32,
        #[source]
        source: HostError,
    },
    /// Chunk is outside the retry allow-list; the host error is passed through as is.
    #[error(transparent)]
    Unguarded(HostError),
}

impl ChunkLoadError {
    /// Source URL of the failed chunk, when the error was annotated with one.
    pub fn request(&self) -> Option<&str> {
        match self {
            ChunkLoadError::Exhausted { request, .. } => Some(request),
            ChunkLoadError::Unguarded(_) => None,
        }
    }

    pub fn host_error(&self) -> &HostError {
        match self {
            ChunkLoadError::Exhausted { source, .. } => source,
            ChunkLoadError::Unguarded(e) => e,
        }
    }
}
