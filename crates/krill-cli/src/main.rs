//! `krill` — deduplicating content-addressable file store.
//!
//! Splits files into fixed-size chunks, fingerprints each chunk with
//! BLAKE3, stores unique chunks once, and reconstructs files from their
//! recorded chunk lists, sequentially or in parallel. The store is
//! in-memory, so every command runs the full ingest → reconstruct
//! pipeline within a single invocation.
//!
//! # Usage
//!
//! ```text
//! krill copy in.bin out.bin              # ingest + sequential reconstruct
//! krill copy in.bin out.bin --concurrent # parallel chunk retrieval
//! krill inspect in.bin                   # manifest and dedup summary
//! krill inspect in.bin --dump m.bin      # also write the encoded manifest
//! krill bench -n 200 -s 65536            # write/read benchmark
//! ```

mod config;
mod telemetry;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use krill_cas::serialize_manifest;
use krill_engine::{KrillNode, KrillNodeConfig};
use krill_index::FileIndex;
use krill_store::MemoryStore;
use tracing::info;

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "krill",
    version,
    about = "Deduplicating content-addressable file store"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a file and reconstruct it to a new path.
    Copy {
        /// File to ingest.
        input: PathBuf,

        /// Where to write the reconstructed bytes.
        output: PathBuf,

        /// Retrieve chunks in parallel instead of one at a time.
        #[arg(long)]
        concurrent: bool,
    },

    /// Ingest a file and print its manifest and dedup summary.
    Inspect {
        /// File to ingest.
        input: PathBuf,

        /// Write the postcard-encoded manifest to this path.
        #[arg(long)]
        dump: Option<PathBuf>,
    },

    /// Run a quick in-memory write/read benchmark.
    Bench {
        /// Number of files to write and read.
        #[arg(short = 'n', long, default_value = "100")]
        count: usize,

        /// Size of each file in bytes.
        #[arg(short, long, default_value = "10240")]
        size: usize,

        /// Use the concurrent reconstruction path for reads.
        #[arg(long)]
        concurrent: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    telemetry::init(&config.log.level);

    match cli.command {
        Commands::Copy {
            input,
            output,
            concurrent,
        } => cmd_copy(&config, &input, &output, concurrent).await,
        Commands::Inspect { input, dump } => cmd_inspect(&config, &input, dump.as_deref()).await,
        Commands::Bench {
            count,
            size,
            concurrent,
        } => cmd_bench(&config, count, size, concurrent).await,
    }
}

/// Build a node over a fresh in-memory store, per the config.
fn build_node(config: &CliConfig) -> KrillNode {
    KrillNode::new(
        KrillNodeConfig {
            chunk_size: config.storage.chunk_size,
            fetch_concurrency: config.engine.fetch_concurrency,
        },
        Arc::new(MemoryStore::new(config.storage.max_bytes)),
        Arc::new(FileIndex::new()),
    )
}

/// Derive the index name for a path (its final component).
fn file_name(path: &Path) -> Result<String> {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => Ok(name.to_string()),
        None => bail!("cannot derive a file name from {}", path.display()),
    }
}

// -----------------------------------------------------------------------
// krill copy
// -----------------------------------------------------------------------

async fn cmd_copy(
    config: &CliConfig,
    input: &Path,
    output: &Path,
    concurrent: bool,
) -> Result<()> {
    let node = build_node(config);
    let name = file_name(input)?;

    let reader = tokio::fs::File::open(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;

    let manifest = node.put_file_stream(&name, reader).await?;

    let bytes = if concurrent {
        node.get_file_concurrent(&name).await?
    } else {
        node.get_file(&name).await?
    };

    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("writing {}", output.display()))?;

    let unique = node.store().len().await?;
    info!(
        name = %name,
        chunks = manifest.chunks.len(),
        unique,
        concurrent,
        "copy complete"
    );
    println!(
        "{} -> {} ({} bytes, {} chunks, {} unique)",
        input.display(),
        output.display(),
        bytes.len(),
        manifest.chunks.len(),
        unique
    );

    Ok(())
}

// -----------------------------------------------------------------------
// krill inspect
// -----------------------------------------------------------------------

async fn cmd_inspect(config: &CliConfig, input: &Path, dump: Option<&Path>) -> Result<()> {
    let node = build_node(config);
    let name = file_name(input)?;

    let data = tokio::fs::read(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;

    let manifest = node.put_file(&name, &data).await?;
    let capacity = node.store().capacity().await?;
    let unique = node.store().len().await?;

    println!("{name}");
    println!("  size:        {} bytes", manifest.total_size);
    println!("  chunk size:  {} bytes", manifest.chunk_size);
    println!("  chunks:      {}", manifest.chunks.len());
    println!("  unique:      {unique}");
    println!(
        "  stored:      {} bytes ({} bytes deduplicated)",
        capacity.used_bytes,
        manifest.total_size.saturating_sub(capacity.used_bytes)
    );
    for meta in &manifest.chunks {
        println!("  {:>10}  {}  {} bytes", meta.offset, meta.chunk_id, meta.size);
    }

    if let Some(path) = dump {
        let encoded = serialize_manifest(&manifest)?;
        tokio::fs::write(path, &encoded)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  manifest written to {} ({} bytes)", path.display(), encoded.len());
    }

    Ok(())
}

// -----------------------------------------------------------------------
// krill bench
// -----------------------------------------------------------------------

async fn cmd_bench(config: &CliConfig, count: usize, size: usize, concurrent: bool) -> Result<()> {
    println!("Krill Benchmark");
    println!("  files:      {count}");
    println!("  size:       {size} bytes each");
    println!("  chunk_size: {}", config.storage.chunk_size);
    println!("  read path:  {}", if concurrent { "concurrent" } else { "sequential" });
    println!();

    // In-memory setup — measures pure pipeline throughput.
    let node = build_node(config);
    let total_bytes = count as u64 * size as u64;

    // --- Write ---
    print!("Writing {count} files... ");
    let start = Instant::now();
    for i in 0..count {
        let data = bench_data(size, i as u64);
        node.put_file(&format!("bench-{i}"), &data).await?;
    }
    let write_dur = start.elapsed();
    let write_mbs = total_bytes as f64 / write_dur.as_secs_f64() / 1_048_576.0;
    println!("{:.2}s ({write_mbs:.1} MB/s)", write_dur.as_secs_f64());

    // --- Read ---
    print!("Reading {count} files... ");
    let start = Instant::now();
    for i in 0..count {
        let name = format!("bench-{i}");
        let _ = if concurrent {
            node.get_file_concurrent(&name).await?
        } else {
            node.get_file(&name).await?
        };
    }
    let read_dur = start.elapsed();
    let read_mbs = total_bytes as f64 / read_dur.as_secs_f64() / 1_048_576.0;
    println!("{:.2}s ({read_mbs:.1} MB/s)", read_dur.as_secs_f64());

    println!();
    println!("Summary:");
    println!("  Write throughput: {write_mbs:.1} MB/s");
    println!("  Read throughput:  {read_mbs:.1} MB/s");
    println!(
        "  Total data:       {:.1} MB",
        total_bytes as f64 / 1_048_576.0
    );

    Ok(())
}

/// Generate deterministic per-file data for benchmarking.
fn bench_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF ^ (seed as u32);
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_path() {
        assert_eq!(
            file_name(Path::new("/some/dir/report.txt")).unwrap(),
            "report.txt"
        );
        assert_eq!(file_name(Path::new("plain")).unwrap(), "plain");
    }

    #[test]
    fn test_file_name_rejects_root() {
        assert!(file_name(Path::new("/")).is_err());
    }

    #[test]
    fn test_bench_data_varies_by_seed() {
        let a = bench_data(64, 0);
        let b = bench_data(64, 1);
        assert_ne!(a, b);
        assert_eq!(a, bench_data(64, 0));
    }

    #[tokio::test]
    async fn test_build_node_roundtrip() {
        let node = build_node(&CliConfig::default());
        let data = bench_data(5000, 3);
        node.put_file("f", &data).await.unwrap();
        assert_eq!(node.get_file("f").await.unwrap(), data);
        assert_eq!(node.get_file_concurrent("f").await.unwrap(), data);
    }
}
