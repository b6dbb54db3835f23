//! Seed normalization
//!
//! Maps an arbitrary provenance string to the fixed 32-byte token stored in
//! every container header.

use std::fmt;

/// Width of a normalized seed token in bytes
pub const SEED_SIZE: usize = 32;

/// A normalized seed: the first 32 UTF-8 bytes of the seed, zero-padded
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeedToken([u8; SEED_SIZE]);

impl SeedToken {
    /// Wrap raw token bytes (as read from a header)
    pub fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.0
    }

    /// The token with trailing zero padding removed, lossily decoded.
    /// Only meant for display; comparisons use the raw bytes.
    pub fn display_lossy(&self) -> String {
        let end = self
            .0
            .iter()
            .rposition(|&b| b != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Debug for SeedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedToken({:?})", self.display_lossy())
    }
}

/// Normalize a seed string to a 32-byte token.
///
/// Longer input is truncated at byte 32 (possibly inside a multi-byte
/// character); shorter input is zero-padded. Never fails.
pub fn normalize(seed: &str) -> SeedToken {
    let mut token = [0u8; SEED_SIZE];
    let bytes = seed.as_bytes();
    let len = bytes.len().min(SEED_SIZE);
    token[..len].copy_from_slice(&bytes[..len]);
    SeedToken(token)
}
