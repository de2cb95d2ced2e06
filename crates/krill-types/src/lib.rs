//! Shared types and identifiers for Krill.
//!
//! This crate defines the core types used across the Krill workspace:
//! the content-addressed [`ChunkId`], the per-file [`Manifest`] with its
//! [`ChunkMeta`] entries, and the workspace-wide constants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: u32 = 1024;

/// Current manifest envelope version. Bumped on incompatible format changes.
pub const MANIFEST_VERSION: u8 = 1;

// ---------------------------------------------------------------------------
// ChunkId
// ---------------------------------------------------------------------------

/// Content-addressed identifier for a chunk: `blake3(chunk_data)`.
///
/// Two chunks have the same `ChunkId` iff their bytes are identical
/// (up to the negligible collision probability of BLAKE3). This identity
/// is what makes deduplication correct: the store keeps one entry per ID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ChunkId([u8; 32]);

impl ChunkId {
    /// Create an ID by hashing arbitrary data with BLAKE3.
    ///
    /// Pure and deterministic: the same bytes always produce the same ID,
    /// regardless of call site or thread.
    pub fn from_data(data: &[u8]) -> Self {
        Self(blake3::hash(data).into())
    }

    /// Return the raw 32-byte representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for ChunkId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ChunkId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({self})")
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Per-file record describing how a file was chunked.
///
/// The manifest lists chunk IDs in byte order; reconstruction concatenates
/// the referenced chunks in exactly this order. A file name maps to one
/// manifest at a time — re-ingesting a name replaces its manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest envelope version, checked on deserialization.
    pub version: u8,
    /// Total size of the original file in bytes.
    pub total_size: u64,
    /// Configured chunk size (the last chunk may be smaller).
    pub chunk_size: u32,
    /// Ordered per-chunk metadata.
    pub chunks: Vec<ChunkMeta>,
    /// Unix timestamp (seconds) when the file was ingested.
    pub created_at: u64,
}

/// Metadata for a single chunk within a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Content-addressed identifier for this chunk.
    pub chunk_id: ChunkId,
    /// Byte offset of this chunk within the original file.
    pub offset: u64,
    /// Size of this chunk in bytes.
    pub size: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
