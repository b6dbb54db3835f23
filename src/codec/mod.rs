//! Codec Module
//!
//! Packs a payload into a self-describing container and unpacks it again.
//!
//! ## Responsibilities
//! - Normalize provenance seeds to a fixed-width token
//! - Score payload entropy and pick a compression strength
//! - Write and validate the fixed 96-byte header
//! - Verify the SHA-256 digest of every decoded payload
//!
//! ## Container Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (96 bytes)                                       │
//! │   Magic: "BLOCKVAULT\0\0" (12)                          │
//! │   Original length: u32 BE (4)                           │
//! │   Entropy: f32 BE (4)                                   │
//! │   SHA-256 of original payload (32)                      │
//! │   Seed token (32)                                       │
//! │   Encoding marker (1) | Reserved, zero (11)             │
//! ├─────────────────────────────────────────────────────────┤
//! │ Body (variable)                                         │
//! │   zlib stream, or the payload verbatim (marker 0)       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The empty payload encodes to a zero-length container.

mod container;
mod entropy;
mod header;
mod level;
mod seed;

pub use container::{decode, decode_with_policy, encode, inspect, Decoded, Encoded};
pub use entropy::entropy;
pub use header::{ContainerHeader, DIGEST_SIZE, HEADER_SIZE, MAGIC, MAGIC_SIZE};
pub use level::{EncodingLevel, HIGH_ENTROPY_THRESHOLD, MEDIUM_ENTROPY_THRESHOLD};
pub use seed::{normalize, SeedToken, SEED_SIZE};
