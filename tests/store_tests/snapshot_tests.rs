//! Tests for store snapshots
//!
//! These tests verify:
//! - Export contents and ordering
//! - JSON and binary frame encoding
//! - Frame corruption detection
//! - File persistence

use blockvault::store::{BlockId, BlockStore, Snapshot, SNAPSHOT_VERSION};
use blockvault::{Config, VaultError};
use tempfile::tempdir;

// =============================================================================
// Helper Functions
// =============================================================================

fn populated_store() -> (BlockStore, Vec<BlockId>) {
    let store = BlockStore::new(Config::default()).unwrap();
    let ids = (0..3)
        .map(|i| {
            let payload = format!("snapshot block {} ", i).repeat(50);
            store.allocate(payload.as_bytes(), &format!("seed-{}", i)).unwrap()
        })
        .collect();
    (store, ids)
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_export_lists_blocks_in_order() {
    let (store, ids) = populated_store();
    store.read(&ids[1]).unwrap();

    let snapshot = store.export_snapshot();

    let listed: Vec<BlockId> = snapshot.blocks.iter().map(|b| b.id).collect();
    assert_eq!(listed, ids);
    assert_eq!(snapshot.totals, store.stats().totals);
    assert_eq!(snapshot.blocks[1].access_count, 1);
    assert_eq!(snapshot.blocks[2].seed, "seed-2");
    assert_eq!(snapshot.cache.entries, 1);
}

#[test]
fn test_export_empty_store() {
    let store = BlockStore::new(Config::default()).unwrap();
    let snapshot = store.export_snapshot();

    assert!(snapshot.blocks.is_empty());
    assert_eq!(snapshot.totals.block_count, 0);
}

#[test]
fn test_export_excludes_freed_blocks() {
    let (store, ids) = populated_store();
    store.free(&ids[0]);

    let snapshot = store.export_snapshot();
    assert_eq!(snapshot.blocks.len(), 2);
    assert!(snapshot.blocks.iter().all(|b| b.id != ids[0]));
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_json_round_trip() {
    let (store, _) = populated_store();
    let snapshot = store.export_snapshot();

    let json = snapshot.to_json().unwrap();
    assert!(json.contains("exported_at"));
    assert!(json.contains("seed-1"));

    assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
}

#[test]
fn test_binary_frame_round_trip() {
    let (store, _) = populated_store();
    let snapshot = store.export_snapshot();

    let frame = snapshot.to_bytes().unwrap();
    assert_eq!(&frame[0..4], b"BVSN");
    assert_eq!(u16::from_le_bytes([frame[4], frame[5]]), SNAPSHOT_VERSION);

    assert_eq!(Snapshot::from_bytes(&frame).unwrap(), snapshot);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_frame_body_corruption_detected() {
    let (store, _) = populated_store();
    let mut frame = store.export_snapshot().to_bytes().unwrap();
    let last = frame.len() - 1;
    frame[last] ^= 0xFF;

    let result = Snapshot::from_bytes(&frame);
    assert!(matches!(result, Err(VaultError::SnapshotCorruption(msg)) if msg.contains("CRC")));
}

#[test]
fn test_frame_bad_magic() {
    let (store, _) = populated_store();
    let mut frame = store.export_snapshot().to_bytes().unwrap();
    frame[0] = b'X';

    assert!(matches!(
        Snapshot::from_bytes(&frame),
        Err(VaultError::SnapshotCorruption(_))
    ));
}

#[test]
fn test_frame_unknown_version() {
    let (store, _) = populated_store();
    let mut frame = store.export_snapshot().to_bytes().unwrap();
    frame[4..6].copy_from_slice(&99u16.to_le_bytes());

    assert!(matches!(
        Snapshot::from_bytes(&frame),
        Err(VaultError::SnapshotCorruption(msg)) if msg.contains("version")
    ));
}

#[test]
fn test_frame_truncated() {
    let (store, _) = populated_store();
    let frame = store.export_snapshot().to_bytes().unwrap();

    assert!(Snapshot::from_bytes(&frame[..10]).is_err());
    assert!(Snapshot::from_bytes(&frame[..frame.len() - 3]).is_err());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_write_and_read_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.snapshot");
    let (store, _) = populated_store();
    let snapshot = store.export_snapshot();

    snapshot.write_to(&path).unwrap();
    let restored = Snapshot::read_from(&path).unwrap();

    assert_eq!(restored, snapshot);
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = Snapshot::read_from(&dir.path().join("absent"));

    assert!(matches!(result, Err(VaultError::Io(_))));
}
