//! Store snapshots
//!
//! A timestamped export of store totals and per-block metadata. Payload
//! and container bytes are never included.
//!
//! ## Binary Frame
//! ```text
//! ┌──────────┬─────────────┬──────────┬──────────┬──────────────────┐
//! │Magic (4) │ Version (2) │ CRC (4)  │ Len (4)  │  bincode body    │
//! └──────────┴─────────────┴──────────┴──────────┴──────────────────┘
//! ```
//! Integers are little-endian. The CRC32 covers the body only.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

use super::{BlockRecord, CacheStats, StoreTotals};

/// Magic bytes identifying a snapshot frame
const SNAPSHOT_MAGIC: &[u8; 4] = b"BVSN";

/// Current snapshot frame version
pub const SNAPSHOT_VERSION: u16 = 1;

/// Frame header: Magic (4) + Version (2) + CRC (4) + Len (4) = 14 bytes
const FRAME_HEADER_SIZE: usize = 14;

/// Exported store state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub exported_at: DateTime<Utc>,
    pub totals: StoreTotals,
    pub cache: CacheStats,
    pub blocks: Vec<BlockRecord>,
}

impl Snapshot {
    /// Pretty-printed JSON rendering
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as a checksummed binary frame
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let body = bincode::serialize(self)?;
        let len = u32::try_from(body.len()).map_err(|_| {
            VaultError::Serialization(format!("snapshot body too large: {} bytes", body.len()))
        })?;
        let crc = crc32fast::hash(&body);

        let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + body.len());
        frame.extend_from_slice(SNAPSHOT_MAGIC);
        frame.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&len.to_le_bytes());
        frame.extend_from_slice(&body);
        Ok(frame)
    }

    /// Decode a binary frame, validating magic, version, length and CRC
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FRAME_HEADER_SIZE {
            return Err(VaultError::SnapshotCorruption(format!(
                "incomplete header: expected {} bytes, got {}",
                FRAME_HEADER_SIZE,
                bytes.len()
            )));
        }

        if &bytes[0..4] != SNAPSHOT_MAGIC {
            return Err(VaultError::SnapshotCorruption(format!(
                "invalid magic: expected BVSN, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != SNAPSHOT_VERSION {
            return Err(VaultError::SnapshotCorruption(format!(
                "unsupported version: {}",
                version
            )));
        }

        let stored_crc = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]) as usize;

        let body = &bytes[FRAME_HEADER_SIZE..];
        if body.len() != len {
            return Err(VaultError::SnapshotCorruption(format!(
                "body length mismatch: header says {}, found {}",
                len,
                body.len()
            )));
        }

        let crc = crc32fast::hash(body);
        if crc != stored_crc {
            return Err(VaultError::SnapshotCorruption(format!(
                "CRC mismatch: expected {:08x}, computed {:08x}",
                stored_crc, crc
            )));
        }

        Ok(bincode::deserialize(body)?)
    }

    /// Write the binary frame to `path`, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let frame = self.to_bytes()?;
        fs::write(path, frame)?;
        tracing::debug!(path = %path.display(), blocks = self.blocks.len(), "wrote snapshot");
        Ok(())
    }

    /// Read a binary frame from `path`
    pub fn read_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
