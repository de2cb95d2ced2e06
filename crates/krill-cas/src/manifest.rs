//! Manifest building and serialization.
//!
//! A [`Manifest`] records the ordered chunk list for a file. Reconstruction
//! follows the manifest's chunk order exactly. Manifests are serialized with
//! postcard and carry a version byte checked on decode, so a persistence
//! collaborator can store them without further framing.

use krill_types::{ChunkMeta, MANIFEST_VERSION, Manifest};

use crate::error::CasError;

/// Build a [`Manifest`] from chunk metadata, stamped with the current time.
pub fn build_manifest(chunks: &[ChunkMeta], total_size: u64, chunk_size: u32) -> Manifest {
    build_manifest_with_timestamp(chunks, total_size, chunk_size, now_secs())
}

/// Build a manifest with an explicit timestamp (for deterministic testing).
pub fn build_manifest_with_timestamp(
    chunks: &[ChunkMeta],
    total_size: u64,
    chunk_size: u32,
    created_at: u64,
) -> Manifest {
    Manifest {
        version: MANIFEST_VERSION,
        total_size,
        chunk_size,
        chunks: chunks.to_vec(),
        created_at,
    }
}

/// Serialize a manifest to postcard bytes.
pub fn serialize_manifest(manifest: &Manifest) -> Result<Vec<u8>, CasError> {
    postcard::to_allocvec(manifest).map_err(|e| CasError::Serialization(e.to_string()))
}

/// Deserialize a manifest from postcard bytes.
///
/// Rejects manifests with unknown version numbers to prevent silent
/// misinterpretation of data across format changes.
pub fn deserialize_manifest(bytes: &[u8]) -> Result<Manifest, CasError> {
    let manifest: Manifest =
        postcard::from_bytes(bytes).map_err(|e| CasError::Serialization(e.to_string()))?;
    if manifest.version != MANIFEST_VERSION {
        return Err(CasError::UnsupportedVersion {
            found: manifest.version,
            supported: MANIFEST_VERSION,
        });
    }
    Ok(manifest)
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
