//! Block Store
//!
//! Owns every block, serves reads through the decode cache and keeps the
//! running totals.
//!
//! ## Responsibilities
//! - Encode and register new blocks (single and batched)
//! - Count accesses and decode on cache misses
//! - Reject payloads whose digest no longer matches
//! - Remove blocks together with their cached payloads

use std::collections::HashMap;
use std::thread;

use bytes::Bytes;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::codec::{self, Encoded};
use crate::config::{Config, SeedPolicy};
use crate::error::{Result, VaultError};

use super::{Block, BlockId, BlockRecord, BlockSummary, CacheStats, DecodeCache, Snapshot};

/// Running byte and block counts, maintained incrementally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTotals {
    pub total_original: u64,
    pub total_encoded: u64,
    pub block_count: u64,
}

impl StoreTotals {
    /// `total_original / total_encoded`, or 0.0 when nothing is encoded
    pub fn ratio(&self) -> f64 {
        if self.total_encoded == 0 {
            0.0
        } else {
            self.total_original as f64 / self.total_encoded as f64
        }
    }

    fn add(&mut self, block: &Block) {
        self.total_original += block.original_size as u64;
        self.total_encoded += block.encoded_size as u64;
        self.block_count += 1;
    }

    fn remove(&mut self, block: &Block) {
        self.total_original -= block.original_size as u64;
        self.total_encoded -= block.encoded_size as u64;
        self.block_count -= 1;
    }
}

/// Aggregate view returned by `BlockStore::stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub totals: StoreTotals,

    /// Overall `total_original / total_encoded`
    pub ratio: f64,

    pub cache: CacheStats,

    /// One line per live block, in allocation order
    pub blocks: Vec<BlockSummary>,
}

/// Mutable store state, guarded as a unit
struct StoreInner {
    blocks: HashMap<BlockId, Block>,
    cache: DecodeCache,
    totals: StoreTotals,
    next_sequence: u64,
}

impl StoreInner {
    fn insert(&mut self, id: BlockId, encoded: Encoded, seed: String) {
        let block = Block::from_encoded(id, encoded, seed, self.next_sequence);
        self.next_sequence += 1;
        self.totals.add(&block);
        self.blocks.insert(id, block);
    }
}

/// Virtual block store
///
/// ## Concurrency
/// All state sits behind a single mutex. `read` does lookup → decode →
/// cache insert as one critical section, so a concurrent `free` of the same
/// id cannot interleave with it. Encoding for `allocate` runs unlocked.
pub struct BlockStore {
    config: Config,
    inner: Mutex<StoreInner>,
}

impl BlockStore {
    /// Create an empty store
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let cache = DecodeCache::new(config.cache_budget);
        Ok(Self {
            config,
            inner: Mutex::new(StoreInner {
                blocks: HashMap::new(),
                cache,
                totals: StoreTotals::default(),
                next_sequence: 0,
            }),
        })
    }

    /// Encode `payload` and store it as a new block
    pub fn allocate(&self, payload: &[u8], seed: &str) -> Result<BlockId> {
        let encoded = codec::encode(payload, seed)?;
        let id = BlockId::new();

        tracing::debug!(
            block = %id,
            original = encoded.original_size,
            encoded = encoded.container_size,
            level = ?encoded.level,
            "allocated block"
        );

        self.inner.lock().insert(id, encoded, seed.to_string());
        Ok(id)
    }

    /// Encode and store a batch of payloads.
    ///
    /// Large batches are encoded on scoped worker threads. Blocks are
    /// inserted in input order under one lock; if any payload fails to
    /// encode, nothing is stored.
    pub fn allocate_many<P, S>(&self, items: &[(P, S)]) -> Result<Vec<BlockId>>
    where
        P: AsRef<[u8]> + Sync,
        S: AsRef<str> + Sync,
    {
        let total: usize = items.iter().map(|(p, _)| p.as_ref().len()).sum();
        let encoded = if items.len() < 2 || total < self.config.parallel_threshold {
            items
                .iter()
                .map(|(p, s)| codec::encode(p.as_ref(), s.as_ref()))
                .collect::<Result<Vec<_>>>()?
        } else {
            Self::encode_parallel(items)?
        };

        let mut inner = self.inner.lock();
        let ids = encoded
            .into_iter()
            .zip(items)
            .map(|(enc, (_, seed))| {
                let id = BlockId::new();
                inner.insert(id, enc, seed.as_ref().to_string());
                id
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = ids.len(), bytes = total, "allocated block batch");
        Ok(ids)
    }

    fn encode_parallel<P, S>(items: &[(P, S)]) -> Result<Vec<Encoded>>
    where
        P: AsRef<[u8]> + Sync,
        S: AsRef<str> + Sync,
    {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(items.len());
        let chunk_size = items.len().div_ceil(workers);

        let chunks = crossbeam::thread::scope(|scope| {
            let handles = items
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move |_| {
                        chunk
                            .iter()
                            .map(|(p, s)| codec::encode(p.as_ref(), s.as_ref()))
                            .collect::<Result<Vec<_>>>()
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|h| {
                    h.join().unwrap_or_else(|_| {
                        Err(VaultError::Worker("encoding worker panicked".to_string()))
                    })
                })
                .collect::<Vec<_>>()
        })
        .map_err(|_| VaultError::Worker("encoding scope panicked".to_string()))?;

        let mut encoded = Vec::with_capacity(items.len());
        for chunk in chunks {
            encoded.extend(chunk?);
        }
        Ok(encoded)
    }

    /// Store an already-encoded container as a new block.
    ///
    /// The header is validated but the body is not decoded; corruption
    /// surfaces on the first `read`. Under `SeedPolicy::Enforce` the seed
    /// must match the one recorded in the header.
    pub fn import(&self, container: Bytes, seed: &str) -> Result<BlockId> {
        let encoded = if container.is_empty() {
            codec::encode(&[], seed)?
        } else {
            let header = codec::inspect(&container)?;
            if self.config.seed_policy == SeedPolicy::Enforce
                && header.seed != codec::normalize(seed)
            {
                return Err(VaultError::SeedMismatch);
            }

            let original_size = header.original_len as usize;
            let container_size = container.len();
            Encoded {
                original_size,
                container_size,
                ratio: original_size as f64 / container_size as f64,
                digest: header.digest_hex(),
                level: header.level,
                entropy: header.entropy as f64,
                container,
            }
        };

        let id = BlockId::new();
        tracing::debug!(block = %id, encoded = encoded.container_size, "imported container");
        self.inner.lock().insert(id, encoded, seed.to_string());
        Ok(id)
    }

    /// Read a block's payload.
    ///
    /// Counts the access, then serves from the cache or decodes. A decoded
    /// payload whose digest does not match fails with `IntegrityFailure`
    /// and is not cached.
    pub fn read(&self, id: &BlockId) -> Result<Bytes> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let block = inner
            .blocks
            .get_mut(id)
            .ok_or(VaultError::BlockNotFound(*id))?;
        block.access_count += 1;

        if let Some(payload) = inner.cache.get(id) {
            tracing::trace!(block = %id, "decode cache hit");
            return Ok(payload);
        }

        let decoded =
            codec::decode_with_policy(&block.container, &block.seed, self.config.seed_policy)?;
        if !decoded.verified {
            tracing::warn!(
                block = %id,
                expected = %decoded.expected_digest,
                actual = %decoded.digest,
                "integrity check failed"
            );
            return Err(VaultError::IntegrityFailure {
                id: *id,
                expected: decoded.expected_digest,
                actual: decoded.digest,
                payload: decoded.payload,
            });
        }

        let blocks = &inner.blocks;
        inner.cache.put(*id, decoded.payload.clone(), |other| {
            blocks.get(other).map(|b| b.access_count).unwrap_or(0)
        });

        Ok(decoded.payload)
    }

    /// Remove a block and its cached payload.
    ///
    /// Returns `false` if the block was not present.
    pub fn free(&self, id: &BlockId) -> bool {
        let mut inner = self.inner.lock();

        let block = match inner.blocks.remove(id) {
            Some(block) => block,
            None => return false,
        };
        inner.cache.remove(id);
        inner.totals.remove(&block);

        tracing::debug!(block = %id, original = block.original_size, "freed block");
        true
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.inner.lock().blocks.contains_key(id)
    }

    /// Metadata for a single block
    pub fn block_info(&self, id: &BlockId) -> Option<BlockRecord> {
        self.inner.lock().blocks.get(id).map(Block::record)
    }

    /// Whether the decoded payload of `id` is currently cached
    pub fn is_cached(&self, id: &BlockId) -> bool {
        self.inner.lock().cache.contains(id)
    }

    /// Number of live blocks
    pub fn len(&self) -> usize {
        self.inner.lock().blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate totals, cache occupancy and per-block summaries
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock();

        let mut blocks: Vec<&Block> = inner.blocks.values().collect();
        blocks.sort_by_key(|b| b.sequence);

        StoreStats {
            totals: inner.totals,
            ratio: inner.totals.ratio(),
            cache: inner.cache.stats(),
            blocks: blocks.into_iter().map(Block::summary).collect(),
        }
    }

    /// Timestamped dump of totals and per-block metadata (no payload bytes)
    pub fn export_snapshot(&self) -> Snapshot {
        let inner = self.inner.lock();

        let mut blocks: Vec<&Block> = inner.blocks.values().collect();
        blocks.sort_by_key(|b| b.sequence);

        Snapshot {
            exported_at: Utc::now(),
            totals: inner.totals,
            cache: inner.cache.stats(),
            blocks: blocks.into_iter().map(Block::record).collect(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
