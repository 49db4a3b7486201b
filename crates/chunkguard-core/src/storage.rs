//! Page storage: the key/value store the fallback heuristic persists its host choice in.
//!
//! `MemoryStorage` lives as long as the page; `FileStorage` keeps a JSON map
//! under the XDG state dir so a choice survives across CLI runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Key under which the selected revision host is stored.
pub const REVISION_HOST_KEY: &str = "ed-revision-host";

pub trait PageStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file backed storage. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Default path: `~/.local/state/chunkguard/page_storage.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("chunkguard")?;
        Ok(xdg_dirs
            .get_state_home()
            .join("chunkguard")
            .join("page_storage.json"))
    }

    /// Open storage at `path`. A missing file starts empty.
    pub fn open(path: &Path) -> Result<Self> {
        let items = match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("parse page storage: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("read page storage: {}", path.display()))
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            items: Mutex::new(items),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(items).context("serialize page storage")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write page storage: {}", self.path.display()))?;
        Ok(())
    }
}

impl PageStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(|p| p.into_inner());
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_storage_set_and_get() {
        let s = MemoryStorage::new();
        assert_eq!(s.get_item(REVISION_HOST_KEY), None);
        s.set_item(REVISION_HOST_KEY, "https://cdn.example.com").unwrap();
        assert_eq!(
            s.get_item(REVISION_HOST_KEY).as_deref(),
            Some("https://cdn.example.com")
        );
    }

    #[test]
    fn file_storage_persists_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        {
            let s = FileStorage::open(&path).unwrap();
            s.set_item(REVISION_HOST_KEY, "https://app.example.com").unwrap();
        }
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get_item(REVISION_HOST_KEY).as_deref(),
            Some("https://app.example.com")
        );
    }

    #[test]
    fn file_storage_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileStorage::open(&path).is_err());
    }
}
