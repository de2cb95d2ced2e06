//! Core trait and types for chunk storage.

use bytes::Bytes;
use krill_types::ChunkId;

use crate::error::StoreError;

/// Capacity information for a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageCapacity {
    /// Total capacity in bytes.
    pub total_bytes: u64,
    /// Bytes currently used.
    pub used_bytes: u64,
    /// Bytes available for new data.
    pub available_bytes: u64,
}

/// Trait for storing and retrieving content-addressed chunks.
///
/// Implementations deduplicate by ID: a [`put`](ChunkStore::put) for an ID
/// that is already present is a no-op (first writer wins), and stored chunks
/// are never mutated. Equal IDs are assumed to imply equal content; content
/// equality is not re-verified on insert.
///
/// All implementations must be `Send + Sync` for use across async tasks.
/// Data is passed as [`Bytes`] so concurrent readers share one allocation.
#[async_trait::async_trait]
pub trait ChunkStore: Send + Sync {
    /// Store a chunk under its content-addressed ID.
    ///
    /// If the ID is already present the incoming data is discarded and the
    /// existing entry is kept. Safe to call concurrently; inserts are
    /// linearizable per ID.
    async fn put(&self, id: ChunkId, data: Bytes) -> Result<(), StoreError>;

    /// Retrieve a chunk by ID. Returns `None` if not found.
    async fn get(&self, id: ChunkId) -> Result<Option<Bytes>, StoreError>;

    /// Delete a chunk by ID.
    async fn delete(&self, id: ChunkId) -> Result<(), StoreError>;

    /// Check whether a chunk exists.
    async fn contains(&self, id: ChunkId) -> Result<bool, StoreError>;

    /// List all stored chunk IDs.
    async fn list(&self) -> Result<Vec<ChunkId>, StoreError>;

    /// Number of unique chunks currently stored.
    async fn len(&self) -> Result<usize, StoreError>;

    /// Report current storage capacity.
    async fn capacity(&self) -> Result<StorageCapacity, StoreError>;

    /// Verify chunk integrity by re-hashing and comparing to the ID.
    async fn verify(&self, id: ChunkId) -> Result<bool, StoreError>;
}
