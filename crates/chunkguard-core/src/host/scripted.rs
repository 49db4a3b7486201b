//! A host whose chunks fail a scripted number of times before loading.

use std::collections::HashMap;
use std::future::{ready, Future};
use std::sync::Mutex;

use crate::chunk::ChunkId;
use crate::error::{HostError, ScriptFailure};

use super::ChunkHost;

/// One `ensure_chunk` call as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub chunk_id: ChunkId,
    pub url: String,
}

#[derive(Debug)]
pub struct ScriptedHost {
    public_path: String,
    failures_left: Mutex<HashMap<ChunkId, u32>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedHost {
    /// Chunks are served from `{public_path}{id}.chunk.js` and load on the first try.
    pub fn new(public_path: impl Into<String>) -> Self {
        Self {
            public_path: public_path.into(),
            failures_left: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make the first `times` attempts for `id` fail.
    pub fn failing(self, id: impl Into<ChunkId>, times: u32) -> Self {
        self.failures_left
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(id.into(), times);
        self
    }

    /// Make every attempt for `id` fail.
    pub fn always_failing(self, id: impl Into<ChunkId>) -> Self {
        self.failing(id, u32::MAX)
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Number of attempts made for `id`.
    pub fn attempts(&self, id: &ChunkId) -> usize {
        self.requests().iter().filter(|r| &r.chunk_id == id).count()
    }

    fn attempt(&self, id: &ChunkId, url: &str) -> Result<(), HostError> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Request {
                chunk_id: id.clone(),
                url: url.to_string(),
            });

        let mut failures = self.failures_left.lock().unwrap_or_else(|p| p.into_inner());
        match failures.get_mut(id) {
            Some(left) if *left > 0 => {
                *left = left.saturating_sub(1);
                Err(HostError::Script {
                    url: url.to_string(),
                    kind: ScriptFailure::Missing,
                })
            }
            _ => Ok(()),
        }
    }
}

impl ChunkHost for ScriptedHost {
    fn ensure_chunk(
        &self,
        id: &ChunkId,
        url: &str,
    ) -> impl Future<Output = Result<(), HostError>> + Send {
        ready(self.attempt(id, url))
    }

    fn chunk_script_filename(&self, id: &ChunkId) -> String {
        format!("{}{}.chunk.js", self.public_path, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fails_scripted_number_of_times() {
        let id = ChunkId::from("a");
        let host = ScriptedHost::new("/js/").failing("a", 2);
        let url = host.chunk_script_filename(&id);
        assert_eq!(url, "/js/a.chunk.js");

        assert!(host.ensure_chunk(&id, &url).await.is_err());
        assert!(host.ensure_chunk(&id, &url).await.is_err());
        assert!(host.ensure_chunk(&id, &url).await.is_ok());
        assert_eq!(host.attempts(&id), 3);
    }

    #[tokio::test]
    async fn unscripted_chunks_load() {
        let host = ScriptedHost::new("/js/");
        let id = ChunkId::Index(9);
        assert!(host.ensure_chunk(&id, "/js/9.chunk.js").await.is_ok());
        assert_eq!(
            host.requests(),
            vec![Request {
                chunk_id: id,
                url: "/js/9.chunk.js".into()
            }]
        );
    }
}
