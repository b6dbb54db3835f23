//! Container header
//!
//! Fixed 96-byte header layout. All multi-byte integers are big-endian.
//!
//! ```text
//! offset  size  field
//!      0    12  magic, NUL-padded
//!     12     4  original length (u32)
//!     16     4  entropy (f32)
//!     20    32  SHA-256 of the original payload
//!     52    32  seed token
//!     84     1  encoding marker
//!     85    11  reserved, zero
//! ```

use crate::error::{Result, VaultError};

use super::seed::{SeedToken, SEED_SIZE};
use super::EncodingLevel;

/// Magic constant identifying a BlockVault container (before NUL padding)
pub const MAGIC: &[u8] = b"BLOCKVAULT";

/// Width of the magic field
pub const MAGIC_SIZE: usize = 12;

/// Width of the integrity digest (SHA-256)
pub const DIGEST_SIZE: usize = 32;

/// Total header size
pub const HEADER_SIZE: usize = 96;

const LENGTH_OFFSET: usize = 12;
const ENTROPY_OFFSET: usize = 16;
const DIGEST_OFFSET: usize = 20;
const SEED_OFFSET: usize = 52;
const MARKER_OFFSET: usize = 84;
const RESERVED_OFFSET: usize = 85;

/// Parsed container header
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerHeader {
    /// Length of the original payload in bytes
    pub original_len: u32,

    /// Entropy score of the original payload (bits per byte)
    pub entropy: f32,

    /// SHA-256 of the original payload
    pub digest: [u8; DIGEST_SIZE],

    /// Normalized seed recorded at encode time
    pub seed: SeedToken,

    /// How the body is encoded
    pub level: EncodingLevel,
}

impl ContainerHeader {
    /// Serialize to the fixed 96-byte layout
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..MAGIC.len()].copy_from_slice(MAGIC);
        buf[LENGTH_OFFSET..ENTROPY_OFFSET].copy_from_slice(&self.original_len.to_be_bytes());
        buf[ENTROPY_OFFSET..DIGEST_OFFSET].copy_from_slice(&self.entropy.to_be_bytes());
        buf[DIGEST_OFFSET..SEED_OFFSET].copy_from_slice(&self.digest);
        buf[SEED_OFFSET..MARKER_OFFSET].copy_from_slice(self.seed.as_bytes());
        buf[MARKER_OFFSET] = self.level.marker();
        // RESERVED_OFFSET..HEADER_SIZE stays zero
        buf
    }

    /// Parse and validate a header from the front of `bytes`
    ///
    /// Fails with `MalformedContainer` if fewer than 96 bytes are present,
    /// `MagicMismatch` if the NUL-trimmed magic is wrong,
    /// `UnsupportedEncoding` for an unknown marker, and `MalformedContainer`
    /// if any reserved byte is set.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(VaultError::MalformedContainer(format!(
                "expected at least {} header bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let magic_field = &bytes[..MAGIC_SIZE];
        let trimmed_end = magic_field
            .iter()
            .rposition(|&b| b != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        if &magic_field[..trimmed_end] != MAGIC {
            return Err(VaultError::MagicMismatch {
                found: magic_field[..trimmed_end].to_vec(),
            });
        }

        let original_len = u32::from_be_bytes(read_array(bytes, LENGTH_OFFSET));
        let entropy = f32::from_be_bytes(read_array(bytes, ENTROPY_OFFSET));
        let digest: [u8; DIGEST_SIZE] = read_array(bytes, DIGEST_OFFSET);
        let seed = SeedToken::from_bytes(read_array::<SEED_SIZE>(bytes, SEED_OFFSET));

        let marker = bytes[MARKER_OFFSET];
        let level =
            EncodingLevel::from_marker(marker).ok_or(VaultError::UnsupportedEncoding(marker))?;

        let reserved = &bytes[RESERVED_OFFSET..HEADER_SIZE];
        if let Some(offset) = reserved.iter().position(|&b| b != 0) {
            return Err(VaultError::MalformedContainer(format!(
                "reserved header byte {} is not zero",
                RESERVED_OFFSET + offset
            )));
        }

        Ok(Self {
            original_len,
            entropy,
            digest,
            seed,
            level,
        })
    }

    /// Hex rendering of the stored digest
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Copy a fixed-size field out of a buffer already checked to hold the header
fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}
