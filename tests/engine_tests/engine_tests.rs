//! Tests for Engine
//!
//! These tests verify:
//! - Every command produces the expected response body
//! - Error statuses (not_found, integrity_failure, error)
//! - One-shot encode/decode leaves the store untouched
//! - Seed policy is honoured by decode
//! - Shared access across threads

use std::sync::Arc;
use std::thread;

use blockvault::codec;
use blockvault::engine::Engine;
use blockvault::protocol::{decode_base64, encode_base64, Command, ResponseBody, Status};
use blockvault::store::BlockStore;
use blockvault::{Config, SeedPolicy};
use bytes::Bytes;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_engine() -> Engine {
    Engine::new(Config::default()).unwrap()
}

fn allocate(engine: &Engine, payload: &[u8], seed: &str) -> String {
    let response = engine.execute(Command::Allocate {
        payload: encode_base64(payload),
        seed: seed.to_string(),
    });
    match response.body {
        Some(ResponseBody::Allocated { id }) => id,
        other => panic!("expected Allocated, got {:?}", other),
    }
}

fn read(engine: &Engine, id: &str) -> Vec<u8> {
    let response = engine.execute(Command::Read { id: id.to_string() });
    match response.body {
        Some(ResponseBody::Payload { payload }) => decode_base64("payload", &payload).unwrap(),
        other => panic!("expected Payload, got {:?}", other),
    }
}

// =============================================================================
// Store Command Tests
// =============================================================================

#[test]
fn test_ping() {
    let engine = setup_engine();
    let response = engine.execute(Command::Ping);

    assert!(response.is_ok());
    assert_eq!(response.body, Some(ResponseBody::Pong));
}

#[test]
fn test_allocate_read_free() {
    let engine = setup_engine();
    let payload = b"engine payload ".repeat(64);

    let id = allocate(&engine, &payload, "t1");
    assert_eq!(read(&engine, &id), payload);

    let response = engine.execute(Command::Free { id: id.clone() });
    assert_eq!(response.body, Some(ResponseBody::Freed { freed: true }));

    let response = engine.execute(Command::Free { id: id.clone() });
    assert_eq!(response.body, Some(ResponseBody::Freed { freed: false }));

    let response = engine.execute(Command::Read { id });
    assert_eq!(response.status, Status::NotFound);
    assert!(response.error.is_some());
}

#[test]
fn test_allocate_empty_payload() {
    let engine = setup_engine();
    let id = allocate(&engine, &[], "");

    assert!(read(&engine, &id).is_empty());
}

#[test]
fn test_stats_reflects_store() {
    let engine = setup_engine();
    let a = allocate(&engine, &vec![1u8; 4096], "");
    allocate(&engine, &vec![2u8; 4096], "");
    read(&engine, &a);

    match engine.execute(Command::Stats).body {
        Some(ResponseBody::Stats(stats)) => {
            assert_eq!(stats.totals.block_count, 2);
            assert_eq!(stats.totals.total_original, 8192);
            assert_eq!(stats.blocks.len(), 2);
            assert_eq!(stats.blocks[0].id.to_string(), a);
            assert_eq!(stats.blocks[0].access_count, 1);
            assert_eq!(stats.cache.entries, 1);
        }
        other => panic!("expected Stats, got {:?}", other),
    }
}

#[test]
fn test_export_snapshot() {
    let engine = setup_engine();
    let id = allocate(&engine, b"exported", "exp");

    match engine.execute(Command::Export).body {
        Some(ResponseBody::Snapshot(snapshot)) => {
            assert_eq!(snapshot.blocks.len(), 1);
            assert_eq!(snapshot.blocks[0].id.to_string(), id);
            assert_eq!(snapshot.blocks[0].seed, "exp");
        }
        other => panic!("expected Snapshot, got {:?}", other),
    }
}

// =============================================================================
// Error Status Tests
// =============================================================================

#[test]
fn test_invalid_base64_is_error() {
    let engine = setup_engine();
    let response = engine.execute(Command::Allocate {
        payload: "%%%".to_string(),
        seed: String::new(),
    });

    assert_eq!(response.status, Status::Error);
    assert!(engine.store().is_empty());
}

#[test]
fn test_malformed_id_is_error() {
    let engine = setup_engine();
    let response = engine.execute(Command::Read {
        id: "not-a-uuid".to_string(),
    });

    assert_eq!(response.status, Status::Error);
}

#[test]
fn test_unknown_id_is_not_found() {
    let engine = setup_engine();
    let response = engine.execute(Command::Read {
        id: "6f9619ff-8b86-4d01-b42d-00cf4fc964ff".to_string(),
    });

    assert_eq!(response.status, Status::NotFound);
}

#[test]
fn test_corrupted_block_is_integrity_failure() {
    let store = BlockStore::new(Config::default()).unwrap();
    let encoded = codec::encode(&b"will be damaged ".repeat(32), "").unwrap();
    let mut container = encoded.container.to_vec();
    container[30] ^= 0x01;
    let id = store.import(Bytes::from(container), "").unwrap();

    let engine = Engine::with_store(store);
    let response = engine.execute(Command::Read { id: id.to_string() });

    assert_eq!(response.status, Status::IntegrityFailure);
    assert!(response.body.is_none());
}

// =============================================================================
// One-shot Codec Tests
// =============================================================================

#[test]
fn test_encode_then_decode() {
    let engine = setup_engine();
    let payload = b"one shot ".repeat(100);

    let (container, digest) = match engine
        .execute(Command::Encode {
            payload: encode_base64(&payload),
            seed: "os".to_string(),
        })
        .body
    {
        Some(ResponseBody::Encoded {
            container,
            original_size,
            container_size,
            ratio,
            digest,
            ..
        }) => {
            assert_eq!(original_size, payload.len());
            assert!(container_size < original_size);
            assert!(ratio > 1.0);
            (container, digest)
        }
        other => panic!("expected Encoded, got {:?}", other),
    };

    match engine
        .execute(Command::Decode {
            container,
            seed: "os".to_string(),
        })
        .body
    {
        Some(ResponseBody::Decoded {
            payload: decoded,
            verified,
            digest: decoded_digest,
        }) => {
            assert!(verified);
            assert_eq!(decoded_digest, digest);
            assert_eq!(decode_base64("payload", &decoded).unwrap(), payload);
        }
        other => panic!("expected Decoded, got {:?}", other),
    }

    assert!(engine.store().is_empty());
}

#[test]
fn test_decode_reports_unverified() {
    let engine = setup_engine();
    let encoded = codec::encode(&b"flip me ".repeat(50), "").unwrap();
    let mut container = encoded.container.to_vec();
    container[25] ^= 0xFF;

    let response = engine.execute(Command::Decode {
        container: encode_base64(&container),
        seed: String::new(),
    });

    assert!(response.is_ok());
    assert!(matches!(
        response.body,
        Some(ResponseBody::Decoded { verified: false, .. })
    ));
}

#[test]
fn test_decode_garbage_is_error() {
    let engine = setup_engine();
    let response = engine.execute(Command::Decode {
        container: encode_base64(b"definitely not a container"),
        seed: String::new(),
    });

    assert_eq!(response.status, Status::Error);
}

#[test]
fn test_decode_enforced_seed_mismatch() {
    let config = Config::builder().seed_policy(SeedPolicy::Enforce).build();
    let engine = Engine::new(config).unwrap();
    let encoded = codec::encode(b"sealed with a seed", "owner").unwrap();

    let response = engine.execute(Command::Decode {
        container: encode_base64(&encoded.container),
        seed: "intruder".to_string(),
    });

    assert_eq!(response.status, Status::Error);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_commands() {
    let engine = Arc::new(setup_engine());
    let mut handles = vec![];

    for t in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for i in 0..25 {
                let payload = format!("thread {} item {}", t, i).repeat(10);
                let id = allocate(&engine, payload.as_bytes(), "");
                assert_eq!(read(&engine, &id), payload.as_bytes());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.store().len(), 100);
}
