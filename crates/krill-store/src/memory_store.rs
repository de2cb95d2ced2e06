//! In-memory chunk storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use krill_types::ChunkId;
use tracing::debug;

use crate::error::StoreError;
use crate::traits::{ChunkStore, StorageCapacity};

/// In-memory chunk store backed by a `RwLock<HashMap>`.
///
/// Deduplication happens on insert: a `put` for an ID that is already
/// present leaves the existing entry untouched and charges nothing against
/// capacity. Contents are volatile and lost when the process exits.
pub struct MemoryStore {
    chunks: RwLock<HashMap<ChunkId, Bytes>>,
    max_bytes: u64,
}

impl MemoryStore {
    /// Create a new in-memory store with the given capacity limit.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
            max_bytes,
        }
    }

    /// Create an in-memory store with no practical capacity limit.
    pub fn unbounded() -> Self {
        Self::new(u64::MAX)
    }

    /// Return a reference to the inner map (for testing purposes).
    #[cfg(test)]
    pub(crate) fn inner(&self) -> &RwLock<HashMap<ChunkId, Bytes>> {
        &self.chunks
    }

    fn used_bytes_unlocked(map: &HashMap<ChunkId, Bytes>) -> u64 {
        map.values().map(|v| v.len() as u64).sum()
    }
}

#[async_trait::async_trait]
impl ChunkStore for MemoryStore {
    async fn put(&self, id: ChunkId, data: Bytes) -> Result<(), StoreError> {
        let mut map = self.chunks.write().expect("lock poisoned");

        // First writer wins: an existing entry is never replaced.
        if map.contains_key(&id) {
            debug!(%id, "chunk already stored, deduplicated");
            return Ok(());
        }

        let used = Self::used_bytes_unlocked(&map);
        let needed = data.len() as u64;
        if used + needed > self.max_bytes {
            return Err(StoreError::CapacityExceeded {
                needed,
                available: self.max_bytes.saturating_sub(used),
            });
        }

        debug!(%id, size = data.len(), "storing chunk in memory");
        map.insert(id, data);
        Ok(())
    }

    async fn get(&self, id: ChunkId) -> Result<Option<Bytes>, StoreError> {
        let map = self.chunks.read().expect("lock poisoned");
        Ok(map.get(&id).cloned())
    }

    async fn delete(&self, id: ChunkId) -> Result<(), StoreError> {
        let mut map = self.chunks.write().expect("lock poisoned");
        map.remove(&id);
        debug!(%id, "deleted chunk from memory");
        Ok(())
    }

    async fn contains(&self, id: ChunkId) -> Result<bool, StoreError> {
        let map = self.chunks.read().expect("lock poisoned");
        Ok(map.contains_key(&id))
    }

    async fn list(&self) -> Result<Vec<ChunkId>, StoreError> {
        let map = self.chunks.read().expect("lock poisoned");
        Ok(map.keys().copied().collect())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        let map = self.chunks.read().expect("lock poisoned");
        Ok(map.len())
    }

    async fn capacity(&self) -> Result<StorageCapacity, StoreError> {
        let map = self.chunks.read().expect("lock poisoned");
        let used = Self::used_bytes_unlocked(&map);
        Ok(StorageCapacity {
            total_bytes: self.max_bytes,
            used_bytes: used,
            available_bytes: self.max_bytes.saturating_sub(used),
        })
    }

    async fn verify(&self, id: ChunkId) -> Result<bool, StoreError> {
        let map = self.chunks.read().expect("lock poisoned");
        match map.get(&id) {
            Some(data) => {
                let computed = ChunkId::from_data(data);
                Ok(computed == id)
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}
