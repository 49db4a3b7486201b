//! Shared page environment flags.
//!
//! `SharedEnv` is handed to the loader and to whatever other code resolves
//! asset URLs. The origin-fallback heuristic is the only writer; everyone else
//! reads snapshots.

use std::sync::{Arc, Mutex, MutexGuard};

/// Page-lifetime flags recording which origin assets are resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFlags {
    /// The fallback heuristic already handled the current failure event.
    pub public_path_loaded: bool,
    /// The page origin has been selected as fallback at least once.
    pub ed_local_host_loaded: bool,
    /// Effective CDN host; empty means "page origin, relative paths".
    pub cdn_host_const: String,
    /// CDN host in effect before the last switch to the page origin.
    pub cdn_host_const_prev: String,
    /// Base path for chunk requests derived from a stylesheet link.
    pub chunk_url: Option<String>,
}

impl EnvFlags {
    /// Flags as initialized by the page bootstrap: assets come from `cdn_host`.
    pub fn with_cdn_host(cdn_host: impl Into<String>) -> Self {
        Self {
            cdn_host_const: cdn_host.into(),
            ..Self::default()
        }
    }
}

/// Cloneable handle to the page's `EnvFlags`.
#[derive(Debug, Clone, Default)]
pub struct SharedEnv {
    inner: Arc<Mutex<EnvFlags>>,
}

impl SharedEnv {
    pub fn new(flags: EnvFlags) -> Self {
        Self {
            inner: Arc::new(Mutex::new(flags)),
        }
    }

    /// Copy of the current flags.
    pub fn snapshot(&self) -> EnvFlags {
        self.lock().clone()
    }

    /// Mutate the flags under the lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut EnvFlags) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, EnvFlags> {
        // Flags stay consistent even if a reader panicked mid-access.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let env = SharedEnv::new(EnvFlags::with_cdn_host("https://cdn.example.com"));
        let other = env.clone();
        other.update(|f| f.public_path_loaded = true);
        let snap = env.snapshot();
        assert!(snap.public_path_loaded);
        assert_eq!(snap.cdn_host_const, "https://cdn.example.com");
    }
}
