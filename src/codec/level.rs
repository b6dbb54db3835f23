//! Encoding levels
//!
//! The header marker byte records how the body was produced. Non-zero
//! markers are the zlib compression level used.

use flate2::Compression;
use serde::{Deserialize, Serialize};

/// Entropy above this picks the fastest compressor
pub const HIGH_ENTROPY_THRESHOLD: f64 = 7.5;

/// Entropy above this (and up to the high threshold) picks the balanced compressor
pub const MEDIUM_ENTROPY_THRESHOLD: f64 = 5.0;

/// How a container body is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EncodingLevel {
    /// Body is the payload verbatim
    Uncompressed = 0,

    /// zlib level 1, for high-entropy payloads
    Fast = 1,

    /// zlib level 6
    Balanced = 6,

    /// zlib level 9, for low-entropy payloads
    Best = 9,
}

impl EncodingLevel {
    /// Pick a compression level from a payload's entropy score
    pub fn for_entropy(entropy: f64) -> Self {
        if entropy > HIGH_ENTROPY_THRESHOLD {
            EncodingLevel::Fast
        } else if entropy > MEDIUM_ENTROPY_THRESHOLD {
            EncodingLevel::Balanced
        } else {
            EncodingLevel::Best
        }
    }

    /// Convert from the header marker byte
    pub fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            0 => Some(EncodingLevel::Uncompressed),
            1 => Some(EncodingLevel::Fast),
            6 => Some(EncodingLevel::Balanced),
            9 => Some(EncodingLevel::Best),
            _ => None,
        }
    }

    /// The header marker byte
    pub fn marker(self) -> u8 {
        self as u8
    }

    /// The zlib setting for this level (`None` for uncompressed)
    pub fn compression(self) -> Option<Compression> {
        match self {
            EncodingLevel::Uncompressed => None,
            level => Some(Compression::new(level.marker() as u32)),
        }
    }

    pub fn is_compressed(self) -> bool {
        self != EncodingLevel::Uncompressed
    }
}
