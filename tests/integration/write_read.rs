//! Full-pipeline write/read tests: round-trips, deduplication accounting,
//! re-ingestion, and manifest serialization.

use krill_cas::{deserialize_manifest, serialize_manifest};
use krill_integration_tests::{memory_node, test_data};

#[tokio::test]
async fn test_roundtrip_size_sweep() {
    // Sizes straddling every interesting chunk boundary for chunk_size=1024.
    let sizes = [0usize, 1, 512, 1023, 1024, 1025, 2048, 4096, 100_000];

    for &size in &sizes {
        let node = memory_node(1024);
        let data = test_data(size);

        let manifest = node.put_file("sweep", &data).await.unwrap();
        assert_eq!(manifest.total_size, size as u64);
        assert_eq!(manifest.chunks.len(), size.div_ceil(1024));

        let sequential = node.get_file("sweep").await.unwrap();
        let concurrent = node.get_file_concurrent("sweep").await.unwrap();
        assert_eq!(sequential, data, "sequential mismatch at {size} bytes");
        assert_eq!(concurrent, data, "concurrent mismatch at {size} bytes");
    }
}

#[tokio::test]
async fn test_dedup_accounting_across_files() {
    let node = memory_node(1024);
    let block = test_data(1024);

    // Ten files, each the same 1 KiB block plus a unique one-byte tail.
    for i in 0..10u8 {
        let mut data = block.clone();
        data.push(i);
        node.put_file(&format!("file-{i}"), &data).await.unwrap();
    }

    // One shared block + ten distinct tails.
    assert_eq!(node.store().len().await.unwrap(), 11);
    let capacity = node.store().capacity().await.unwrap();
    assert_eq!(capacity.used_bytes, 1024 + 10);

    for i in 0..10u8 {
        let mut expected = block.clone();
        expected.push(i);
        let got = node.get_file(&format!("file-{i}")).await.unwrap();
        assert_eq!(got, expected);
    }
}

#[tokio::test]
async fn test_reingest_new_content_wins_on_both_paths() {
    let node = memory_node(512);
    let old = test_data(4000);
    let new: Vec<u8> = test_data(4000).iter().map(|b| b.wrapping_add(1)).collect();

    node.put_file("doc", &old).await.unwrap();
    node.put_file("doc", &new).await.unwrap();

    assert_eq!(node.get_file("doc").await.unwrap(), new);
    assert_eq!(node.get_file_concurrent("doc").await.unwrap(), new);
}

#[tokio::test]
async fn test_manifest_survives_serialization() {
    let node = memory_node(1024);
    let data = test_data(3000);

    let manifest = node.put_file("report", &data).await.unwrap();

    let encoded = serialize_manifest(&manifest).unwrap();
    let decoded = deserialize_manifest(&encoded).unwrap();
    assert_eq!(decoded, manifest);

    // The decoded manifest still describes the stored chunks.
    for meta in &decoded.chunks {
        assert!(node.store().contains(meta.chunk_id).await.unwrap());
    }
}

#[tokio::test]
async fn test_store_verifies_ingested_chunks() {
    let node = memory_node(256);
    let data = test_data(2000);

    let manifest = node.put_file("f", &data).await.unwrap();

    for meta in &manifest.chunks {
        assert!(
            node.store().verify(meta.chunk_id).await.unwrap(),
            "stored chunk failed integrity check"
        );
    }
}
