//! A [`ChunkStore`] wrapper that adds configurable random IO latency.
//!
//! `SlowStore` wraps any `Arc<dyn ChunkStore>` and sleeps for a random
//! duration before each read or write operation. The RNG is seeded for
//! deterministic, reproducible behaviour across test runs.
//!
//! # Example
//!
//! ```ignore
//! let slow = SlowStore::new(inner)
//!     .read_latency(1, 10)   // 1–10 ms per read
//!     .seed(42);
//! ```

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use krill_types::ChunkId;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::StoreError;
use crate::traits::{ChunkStore, StorageCapacity};

/// A [`ChunkStore`] wrapper that injects random latency before IO operations.
///
/// With an instant in-memory store, concurrent retrieval tasks finish in
/// spawn order and ordering bugs stay hidden. Injected latency makes tasks
/// complete out of order, so equivalence tests actually exercise the
/// positional reassembly.
pub struct SlowStore {
    inner: Arc<dyn ChunkStore>,
    read_latency_ms: (u64, u64),
    write_latency_ms: (u64, u64),
    rng: Mutex<StdRng>,
}

impl SlowStore {
    /// Wrap an existing store with zero latency (pass-through) by default.
    pub fn new(inner: Arc<dyn ChunkStore>) -> Self {
        Self {
            inner,
            read_latency_ms: (0, 0),
            write_latency_ms: (0, 0),
            rng: Mutex::new(StdRng::seed_from_u64(0)),
        }
    }

    /// Set the read latency range in milliseconds (uniform random).
    pub fn read_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.read_latency_ms = (min_ms, max_ms);
        self
    }

    /// Set the write latency range in milliseconds (uniform random).
    pub fn write_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.write_latency_ms = (min_ms, max_ms);
        self
    }

    /// Set the RNG seed for deterministic behaviour.
    pub fn seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Sleep for a random duration in `[min, max]` milliseconds.
    async fn delay(&self, range: (u64, u64)) {
        let (min, max) = range;

        if max == 0 {
            return;
        }

        let ms = if min == max {
            min
        } else {
            self.rng.lock().expect("lock poisoned").random_range(min..=max)
        };

        if ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait::async_trait]
impl ChunkStore for SlowStore {
    async fn put(&self, id: ChunkId, data: Bytes) -> Result<(), StoreError> {
        self.delay(self.write_latency_ms).await;
        self.inner.put(id, data).await
    }

    async fn get(&self, id: ChunkId) -> Result<Option<Bytes>, StoreError> {
        self.delay(self.read_latency_ms).await;
        self.inner.get(id).await
    }

    async fn delete(&self, id: ChunkId) -> Result<(), StoreError> {
        self.delay(self.write_latency_ms).await;
        self.inner.delete(id).await
    }

    async fn contains(&self, id: ChunkId) -> Result<bool, StoreError> {
        self.delay(self.read_latency_ms).await;
        self.inner.contains(id).await
    }

    async fn list(&self) -> Result<Vec<ChunkId>, StoreError> {
        self.inner.list().await
    }

    async fn len(&self) -> Result<usize, StoreError> {
        self.inner.len().await
    }

    async fn capacity(&self) -> Result<StorageCapacity, StoreError> {
        self.inner.capacity().await
    }

    async fn verify(&self, id: ChunkId) -> Result<bool, StoreError> {
        self.delay(self.read_latency_ms).await;
        self.inner.verify(id).await
    }
}
