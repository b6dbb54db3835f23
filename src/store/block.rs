//! Block definitions
//!
//! A block is one stored container plus the store's bookkeeping for it.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::Encoded;
use crate::error::VaultError;

/// Number of hex characters of the digest shown in summaries
const DIGEST_PREFIX_LEN: usize = 16;

/// Opaque block identifier, unique per allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlockId {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| VaultError::Protocol(format!("invalid block id {:?}: {}", s, e)))
    }
}

/// A stored container and its bookkeeping
#[derive(Debug, Clone)]
pub struct Block {
    pub id: BlockId,

    /// Encoded container (header + body)
    pub container: Bytes,

    pub original_size: usize,
    pub encoded_size: usize,

    /// Hex SHA-256 of the original payload, copied from the header
    pub digest: String,

    pub created_at: DateTime<Utc>,

    /// Number of reads served for this block. Written only by the store.
    pub access_count: u64,

    /// Seed the block was allocated with
    pub seed: String,

    /// Allocation order within the store
    pub(crate) sequence: u64,
}

impl Block {
    pub(crate) fn from_encoded(id: BlockId, encoded: Encoded, seed: String, sequence: u64) -> Self {
        Self {
            id,
            original_size: encoded.original_size,
            encoded_size: encoded.container_size,
            digest: encoded.digest,
            container: encoded.container,
            created_at: Utc::now(),
            access_count: 0,
            seed,
            sequence,
        }
    }

    /// `original_size / encoded_size`, or 0.0 for an empty container
    pub fn ratio(&self) -> f64 {
        if self.encoded_size == 0 {
            0.0
        } else {
            self.original_size as f64 / self.encoded_size as f64
        }
    }

    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            id: self.id,
            original_size: self.original_size,
            encoded_size: self.encoded_size,
            ratio: self.ratio(),
            access_count: self.access_count,
            digest_prefix: self.digest.chars().take(DIGEST_PREFIX_LEN).collect(),
        }
    }

    pub fn record(&self) -> BlockRecord {
        BlockRecord {
            id: self.id,
            original_size: self.original_size,
            encoded_size: self.encoded_size,
            digest: self.digest.clone(),
            created_at: self.created_at,
            access_count: self.access_count,
            seed: self.seed.clone(),
        }
    }
}

/// Per-block line in `StoreStats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub id: BlockId,
    pub original_size: usize,
    pub encoded_size: usize,
    pub ratio: f64,
    pub access_count: u64,
    pub digest_prefix: String,
}

/// Per-block metadata exported in a `Snapshot` (no payload bytes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: BlockId,
    pub original_size: usize,
    pub encoded_size: usize,
    pub digest: String,
    pub created_at: DateTime<Utc>,
    pub access_count: u64,
    pub seed: String,
}
