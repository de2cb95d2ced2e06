//! TOML configuration for the krill binary.
//!
//! Every section and field is optional; omitted fields fall back to the
//! defaults below, and running without a config file at all is supported.

use std::path::Path;

use anyhow::Context;
use krill_engine::node::DEFAULT_FETCH_CONCURRENCY;
use krill_types::DEFAULT_CHUNK_SIZE;
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Chunk store settings.
    pub storage: StorageSection,
    /// Reconstruction settings.
    pub engine: EngineSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[storage]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Chunk size in bytes.
    pub chunk_size: u32,
    /// Capacity limit for the in-memory store, in bytes.
    pub max_bytes: u64,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_bytes: u64::MAX,
        }
    }
}

/// `[engine]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Maximum chunk retrievals in flight during concurrent reconstruction.
    pub fetch_concurrency: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config file {}", p.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("parsing config file {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }
}
