//! Shared test harness for Krill integration tests.
//!
//! Builds nodes over the full pipeline: chunking → fingerprinting →
//! deduplicated storage → manifest recording → reconstruction.

use std::sync::Arc;

use krill_engine::{KrillNode, KrillNodeConfig};
use krill_index::FileIndex;
use krill_store::{MemoryStore, SlowStore};

/// Generate deterministic, non-repeating test data.
pub fn test_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

/// Node over a fresh unbounded in-memory store.
pub fn memory_node(chunk_size: u32) -> KrillNode {
    KrillNode::new(
        KrillNodeConfig {
            chunk_size,
            ..KrillNodeConfig::default()
        },
        Arc::new(MemoryStore::unbounded()),
        Arc::new(FileIndex::new()),
    )
}

/// Node with an explicit cap on in-flight chunk retrievals.
pub fn memory_node_with_concurrency(chunk_size: u32, fetch_concurrency: usize) -> KrillNode {
    KrillNode::new(
        KrillNodeConfig {
            chunk_size,
            fetch_concurrency,
        },
        Arc::new(MemoryStore::unbounded()),
        Arc::new(FileIndex::new()),
    )
}

/// Node whose store injects seeded random latency on reads, so concurrent
/// retrieval tasks complete out of spawn order.
pub fn slow_node(chunk_size: u32, read_latency: (u64, u64), seed: u64) -> KrillNode {
    let slow = SlowStore::new(Arc::new(MemoryStore::unbounded()))
        .read_latency(read_latency.0, read_latency.1)
        .seed(seed);
    KrillNode::new(
        KrillNodeConfig {
            chunk_size,
            ..KrillNodeConfig::default()
        },
        Arc::new(slow),
        Arc::new(FileIndex::new()),
    )
}
