//! Host that resolves chunk URLs from the shared page environment, with a
//! configurable set of dead origins.

use std::collections::HashSet;
use std::future::{ready, Future};
use std::sync::Mutex;

use chunkguard_core::chunk::ChunkId;
use chunkguard_core::env::SharedEnv;
use chunkguard_core::error::{HostError, ScriptFailure};
use chunkguard_core::host::ChunkHost;

pub struct CdnHost {
    env: SharedEnv,
    dead: Mutex<HashSet<String>>,
    requested: Mutex<Vec<String>>,
}

impl CdnHost {
    pub fn new(env: SharedEnv) -> Self {
        Self {
            env,
            dead: Mutex::new(HashSet::new()),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Requests whose URL starts with `prefix` fail with a timeout.
    pub fn kill(&self, prefix: &str) {
        self.dead.lock().unwrap().insert(prefix.to_string());
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl ChunkHost for CdnHost {
    fn ensure_chunk(
        &self,
        _id: &ChunkId,
        url: &str,
    ) -> impl Future<Output = Result<(), HostError>> + Send {
        self.requested.lock().unwrap().push(url.to_string());
        let dead = self.dead.lock().unwrap().iter().any(|p| url.starts_with(p));
        ready(if dead {
            Err(HostError::Script {
                url: url.to_string(),
                kind: ScriptFailure::Timeout,
            })
        } else {
            Ok(())
        })
    }

    /// Chunks live on the effective CDN host, or on the page origin when it is blank.
    fn chunk_script_filename(&self, id: &ChunkId) -> String {
        let host = self.env.snapshot().cdn_host_const;
        format!("{}/static/js/{}.js", host, id)
    }
}
