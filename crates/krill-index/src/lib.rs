//! In-memory file index mapping file names to manifests.
//!
//! [`FileIndex`] is the lookup side of the ingestion pipeline: for every
//! ingested file it holds the [`Manifest`] listing the chunk IDs needed to
//! reconstruct it, in byte order. Contents are volatile and rebuilt by
//! re-ingestion; there is no persistence layer behind it.

use std::collections::HashMap;
use std::sync::RwLock;

use krill_types::Manifest;
use tracing::debug;

/// Mapping from file name to [`Manifest`], covering all known files.
///
/// Recording a name that already exists replaces its manifest; chunks
/// referenced only by the old manifest are left orphaned in the chunk store
/// (there is no reference counting or garbage collection).
#[derive(Default)]
pub struct FileIndex {
    files: RwLock<HashMap<String, Manifest>>,
}

impl FileIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a manifest under a file name, replacing any existing record.
    pub fn record(&self, name: impl Into<String>, manifest: Manifest) {
        let name = name.into();
        let mut files = self.files.write().expect("lock poisoned");
        let replaced = files.insert(name.clone(), manifest).is_some();
        debug!(name = %name, replaced, "recorded file manifest");
    }

    /// Look up the manifest for a file name.
    ///
    /// Returns a cloned snapshot; concurrent re-ingestion of the same name
    /// cannot mutate a manifest a reader is holding.
    pub fn lookup(&self, name: &str) -> Option<Manifest> {
        let files = self.files.read().expect("lock poisoned");
        files.get(name).cloned()
    }

    /// Check whether a file name is known.
    pub fn contains(&self, name: &str) -> bool {
        let files = self.files.read().expect("lock poisoned");
        files.contains_key(name)
    }

    /// List all known file names.
    pub fn list(&self) -> Vec<String> {
        let files = self.files.read().expect("lock poisoned");
        files.keys().cloned().collect()
    }

    /// Number of known files.
    pub fn len(&self) -> usize {
        let files = self.files.read().expect("lock poisoned");
        files.len()
    }

    /// Whether the index holds no files.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
