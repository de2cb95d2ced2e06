//! Error types for the engine.

use krill_types::ChunkId;

/// Errors that can occur during ingestion or reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Failed to access the chunk store.
    #[error("store error: {0}")]
    Store(#[from] krill_store::StoreError),

    /// Content addressing / chunking error.
    #[error("cas error: {0}")]
    Cas(#[from] krill_cas::CasError),

    /// Requested file name has no index record.
    #[error("file not found: {name}")]
    FileNotFound {
        /// The requested file name.
        name: String,
    },

    /// A chunk referenced by a manifest is absent from the chunk store.
    ///
    /// This is a data-integrity violation: it cannot happen under correct
    /// ingestion, but the store and index are not transactionally linked,
    /// so reconstruction checks for it and aborts without partial output.
    #[error("chunk not found: {chunk_id}")]
    ChunkNotFound {
        /// The missing chunk's ID.
        chunk_id: ChunkId,
    },

    /// A spawned retrieval task failed to complete.
    #[error("chunk fetch task failed: {0}")]
    FetchTask(String),
}
