//! Per-chunk retry bookkeeping.

use std::collections::HashMap;

use crate::chunk::ChunkId;

/// Remaining retries and pending query override, per chunk id.
///
/// Entries appear on the first failure of a chunk and are never removed.
#[derive(Debug, Default)]
pub(super) struct RetryBook {
    remaining: HashMap<ChunkId, u32>,
    queries: HashMap<ChunkId, String>,
}

impl RetryBook {
    pub(super) fn remaining(&self, id: &ChunkId) -> Option<u32> {
        self.remaining.get(id).copied()
    }

    pub(super) fn query(&self, id: &ChunkId) -> Option<&str> {
        self.queries.get(id).map(String::as_str)
    }

    /// Record that a retry was taken: next request uses `query`, budget drops to `remaining`.
    pub(super) fn record_retry(&mut self, id: &ChunkId, query: String, remaining: u32) {
        self.queries.insert(id.clone(), query);
        self.remaining.insert(id.clone(), remaining);
    }
}
