//! Chunk storage trait and backend implementations.
//!
//! This crate defines the [`ChunkStore`] trait for deduplicated chunk
//! storage, along with two implementations:
//!
//! - [`MemoryStore`] — in-memory storage backed by a `RwLock<HashMap>`.
//! - [`SlowStore`] — a latency-injection wrapper for concurrency testing.

mod error;
mod memory_store;
mod slow_store;
mod traits;

pub use error::StoreError;
pub use memory_store::MemoryStore;
pub use slow_store::SlowStore;
pub use traits::{ChunkStore, StorageCapacity};
