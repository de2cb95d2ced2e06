//! [`KrillNode`] — the pipeline orchestrator.
//!
//! A `KrillNode` owns the chunk store and file index and exposes the full
//! ingest / reconstruct pipeline for files. Both stores are injected, so
//! tests create a fresh node per case instead of sharing ambient state.

use std::sync::Arc;

use bytes::Bytes;
use krill_cas::{Chunk, Chunker, build_manifest};
use krill_index::FileIndex;
use krill_store::ChunkStore;
use krill_types::{ChunkMeta, DEFAULT_CHUNK_SIZE, Manifest};
use tokio::io::AsyncRead;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::error::EngineError;

/// Default cap on in-flight chunk retrieval tasks.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 16;

/// Configuration for creating a [`KrillNode`].
pub struct KrillNodeConfig {
    /// Chunk size for content addressing.
    pub chunk_size: u32,
    /// Maximum number of chunk retrievals in flight during concurrent
    /// reconstruction. The reassembled bytes are identical at any cap ≥ 1.
    pub fetch_concurrency: usize,
}

impl Default for KrillNodeConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

/// The pipeline orchestrator tying the Krill components together.
///
/// Owns the chunk store and file index and provides ingestion plus the
/// two reconstruction paths.
pub struct KrillNode {
    /// Deduplicated chunk storage.
    store: Arc<dyn ChunkStore>,
    /// File name → manifest mapping.
    index: Arc<FileIndex>,
    /// Content-addressing chunker.
    chunker: Chunker,
    /// Cap on in-flight retrieval tasks.
    fetch_concurrency: usize,
}

impl KrillNode {
    /// Create a new node with the given configuration and components.
    ///
    /// # Panics
    ///
    /// Panics if `fetch_concurrency` is zero (the semaphore would deadlock).
    pub fn new(
        config: KrillNodeConfig,
        store: Arc<dyn ChunkStore>,
        index: Arc<FileIndex>,
    ) -> Self {
        assert!(
            config.fetch_concurrency > 0,
            "fetch concurrency must be nonzero"
        );
        Self {
            store,
            index,
            chunker: Chunker::new(config.chunk_size),
            fetch_concurrency: config.fetch_concurrency,
        }
    }

    /// Return a reference to the chunk store.
    pub fn store(&self) -> &Arc<dyn ChunkStore> {
        &self.store
    }

    /// Return a reference to the file index.
    pub fn index(&self) -> &Arc<FileIndex> {
        &self.index
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Ingest a file: chunk → fingerprint → store (deduplicated) → record.
    ///
    /// Chunks already present in the store are skipped by the store itself
    /// (first writer wins). Re-ingesting an existing name replaces its
    /// manifest. Empty input yields a manifest with zero chunks.
    ///
    /// Returns the recorded [`Manifest`].
    pub async fn put_file(&self, name: &str, data: &[u8]) -> Result<Manifest, EngineError> {
        let chunks = self.chunker.chunk(data);
        self.ingest_chunks(name, chunks).await
    }

    /// Ingest a file from an async reader.
    ///
    /// Chunks the stream, then runs the same store/record pipeline as
    /// [`KrillNode::put_file`].
    pub async fn put_file_stream(
        &self,
        name: &str,
        reader: impl AsyncRead + Unpin,
    ) -> Result<Manifest, EngineError> {
        let chunks = self.chunker.chunk_stream(reader).await?;
        self.ingest_chunks(name, chunks).await
    }

    async fn ingest_chunks(&self, name: &str, chunks: Vec<Chunk>) -> Result<Manifest, EngineError> {
        debug!(name, num_chunks = chunks.len(), "chunked file");

        let mut total_size = 0u64;
        let mut chunk_metas = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let meta = ChunkMeta {
                chunk_id: chunk.id,
                offset: chunk.offset,
                size: chunk.data.len() as u32,
            };
            total_size += meta.size as u64;
            self.store.put(chunk.id, Bytes::from(chunk.data)).await?;
            chunk_metas.push(meta);
        }

        let manifest = build_manifest(&chunk_metas, total_size, self.chunker.chunk_size());
        self.index.record(name, manifest.clone());

        info!(
            name,
            total_size,
            chunks = chunk_metas.len(),
            "put_file: ingest complete"
        );

        Ok(manifest)
    }

    // ------------------------------------------------------------------
    // Reconstruction
    // ------------------------------------------------------------------

    /// Reconstruct a file by fetching its chunks one at a time, in order.
    ///
    /// Fails with [`EngineError::FileNotFound`] for unknown names and with
    /// [`EngineError::ChunkNotFound`] if any referenced chunk is absent.
    /// On failure no partial bytes are returned.
    pub async fn get_file(&self, name: &str) -> Result<Vec<u8>, EngineError> {
        let manifest = self.lookup(name)?;

        let mut result = Vec::with_capacity(manifest.total_size as usize);
        for meta in &manifest.chunks {
            let data = self
                .store
                .get(meta.chunk_id)
                .await?
                .ok_or(EngineError::ChunkNotFound {
                    chunk_id: meta.chunk_id,
                })?;
            result.extend_from_slice(&data);
        }

        info!(
            name,
            size = result.len(),
            chunks = manifest.chunks.len(),
            "get_file: sequential read complete"
        );

        Ok(result)
    }

    /// Reconstruct a file by fetching its chunks concurrently.
    ///
    /// One retrieval task is spawned per chunk, capped by the configured
    /// fetch concurrency. Each task writes into its own positional slot;
    /// slots are disjoint, so tasks need no coordination beyond the store's
    /// internal locking. The call waits for every task to finish before
    /// inspecting any result — a missing chunk is reported only after the
    /// barrier, and no partial bytes are ever returned.
    ///
    /// The output is byte-identical to [`KrillNode::get_file`] for the same
    /// name, regardless of task completion order or concurrency cap.
    pub async fn get_file_concurrent(&self, name: &str) -> Result<Vec<u8>, EngineError> {
        let manifest = self.lookup(name)?;
        let num_chunks = manifest.chunks.len();

        let semaphore = Arc::new(Semaphore::new(self.fetch_concurrency));
        let mut tasks = JoinSet::new();

        for (slot, meta) in manifest.chunks.iter().enumerate() {
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            let chunk_id = meta.chunk_id;
            tasks.spawn(async move {
                // Never closed while tasks run; acquisition cannot fail.
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                let fetched = store.get(chunk_id).await?;
                Ok::<_, krill_store::StoreError>((slot, fetched))
            });
        }

        // Join-all barrier: drain every task before looking at any result,
        // recording only the first failure. No cancellation, no early exit.
        let mut slots: Vec<Option<Bytes>> = vec![None; num_chunks];
        let mut failure: Option<EngineError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok((slot, fetched))) => slots[slot] = fetched,
                Ok(Err(e)) => {
                    failure.get_or_insert(e.into());
                }
                Err(e) => {
                    failure.get_or_insert(EngineError::FetchTask(e.to_string()));
                }
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        // Scan slots in manifest order; the first empty slot names the
        // missing chunk. Otherwise concatenate in order.
        let mut result = Vec::with_capacity(manifest.total_size as usize);
        for (slot, meta) in slots.iter().zip(&manifest.chunks) {
            match slot {
                Some(data) => result.extend_from_slice(data),
                None => {
                    return Err(EngineError::ChunkNotFound {
                        chunk_id: meta.chunk_id,
                    });
                }
            }
        }

        info!(
            name,
            size = result.len(),
            chunks = num_chunks,
            "get_file_concurrent: parallel read complete"
        );

        Ok(result)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Check if a file is known to the index.
    pub fn has_file(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// List all known file names.
    pub fn list_files(&self) -> Vec<String> {
        self.index.list()
    }

    fn lookup(&self, name: &str) -> Result<Manifest, EngineError> {
        self.index
            .lookup(name)
            .ok_or_else(|| EngineError::FileNotFound {
                name: name.to_string(),
            })
    }
}
