//! Error types for BlockVault
//!
//! Provides a unified error type for all operations.

use bytes::Bytes;
use thiserror::Error;

use crate::store::BlockId;

/// Result type alias using VaultError
pub type Result<T> = std::result::Result<T, VaultError>;

/// Unified error type for BlockVault operations
#[derive(Debug, Error)]
pub enum VaultError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Container Errors
    // -------------------------------------------------------------------------
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    #[error("Magic mismatch: found {found:?}")]
    MagicMismatch { found: Vec<u8> },

    #[error("Seed mismatch: container was sealed with a different seed")]
    SeedMismatch,

    #[error("Unsupported encoding marker: 0x{0:02x}")]
    UnsupportedEncoding(u8),

    #[error("Payload too large: {0} bytes (max {max})", max = u32::MAX)]
    PayloadTooLarge(usize),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    /// Digest mismatch after decode. The decoded bytes are kept for
    /// inspection but must not be trusted.
    #[error("Integrity failure for block {id}: expected {expected}, got {actual}")]
    IntegrityFailure {
        id: BlockId,
        expected: String,
        actual: String,
        payload: Bytes,
    },

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Worker error: {0}")]
    Worker(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Snapshot corruption detected: {0}")]
    SnapshotCorruption(String),

    // -------------------------------------------------------------------------
    // Boundary Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for VaultError {
    fn from(err: bincode::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}
