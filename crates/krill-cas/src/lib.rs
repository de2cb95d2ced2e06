//! Content addressing, chunking, and manifest building.
//!
//! This crate provides:
//! - [`Chunker`] — splits data into fixed-size chunks, each identified by its BLAKE3 hash.
//! - [`build_manifest`] — constructs a [`Manifest`](krill_types::Manifest) from chunk metadata.
//! - [`serialize_manifest`] / [`deserialize_manifest`] — postcard encoding with a
//!   version check, so a future persistence layer can store manifests as-is.

mod chunker;
mod error;
mod manifest;

pub use chunker::{Chunk, Chunker};
pub use error::CasError;
pub use manifest::{
    build_manifest, build_manifest_with_timestamp, deserialize_manifest, serialize_manifest,
};
