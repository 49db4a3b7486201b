//! Chunk identifiers and compile-time chunk metadata.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a loadable chunk, as assigned by the host module system.
///
/// Bundlers emit either numeric ids (production) or names (development), so
/// both forms are accepted; they never compare equal to each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkId {
    Index(u64),
    Name(String),
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkId::Index(n) => write!(f, "{}", n),
            ChunkId::Name(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for ChunkId {
    fn from(n: u64) -> Self {
        ChunkId::Index(n)
    }
}

impl From<&str> for ChunkId {
    fn from(s: &str) -> Self {
        ChunkId::Name(s.to_string())
    }
}

impl From<String> for ChunkId {
    fn from(s: String) -> Self {
        ChunkId::Name(s)
    }
}

impl ChunkId {
    /// Parse a command-line style id: all digits is an index, anything else a name.
    pub fn parse(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => ChunkId::Index(n),
            Err(_) => ChunkId::Name(s.to_string()),
        }
    }
}

/// Compile-time chunk metadata: the chunk name for each id, where one exists.
#[derive(Debug, Clone, Default)]
pub struct ChunkManifest {
    names: HashMap<ChunkId, String>,
}

impl ChunkManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk(mut self, id: impl Into<ChunkId>, name: impl Into<String>) -> Self {
        self.names.insert(id.into(), name.into());
        self
    }

    pub fn name_of(&self, id: &ChunkId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkId, &str)> {
        self.names.iter().map(|(id, name)| (id, name.as_str()))
    }
}
