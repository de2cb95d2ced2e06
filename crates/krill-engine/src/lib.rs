//! Pipeline orchestrator tying the Krill components together.
//!
//! The [`KrillNode`] owns the chunk store and file index and exposes the
//! ingestion pipeline plus the two reconstruction paths (sequential and
//! concurrent).

pub mod error;
pub mod node;

pub use error::EngineError;
pub use node::{KrillNode, KrillNodeConfig};

#[cfg(test)]
mod tests;
