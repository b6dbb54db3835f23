//! Container encode / decode
//!
//! Stateless functions that turn a payload into a container and back.

use std::io::{Read, Write};

use bytes::Bytes;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use sha2::{Digest, Sha256};

use crate::config::SeedPolicy;
use crate::error::{Result, VaultError};

use super::header::{ContainerHeader, HEADER_SIZE};
use super::seed::normalize;
use super::{entropy, EncodingLevel};

/// Result of encoding a payload
#[derive(Debug, Clone)]
pub struct Encoded {
    /// Header + body (empty for the empty payload)
    pub container: Bytes,

    /// Length of the original payload
    pub original_size: usize,

    /// Length of `container`
    pub container_size: usize,

    /// `original_size / container_size`, or 0.0 for an empty container
    pub ratio: f64,

    /// Hex SHA-256 of the payload (empty string for the empty payload)
    pub digest: String,

    /// Encoding actually used for the body
    pub level: EncodingLevel,

    /// Entropy score of the payload
    pub entropy: f64,
}

/// Result of decoding a container
#[derive(Debug, Clone)]
pub struct Decoded {
    /// The decoded payload. Untrusted when `verified` is false.
    pub payload: Bytes,

    /// Whether the recomputed digest matches the stored one
    pub verified: bool,

    /// Hex SHA-256 of the decoded payload
    pub digest: String,

    /// Hex digest recorded in the header
    pub expected_digest: String,
}

/// Encode `payload` into a container, recording `seed` in the header.
///
/// The empty payload yields an empty container. Payloads that do not shrink
/// under compression are stored verbatim with `EncodingLevel::Uncompressed`.
pub fn encode(payload: &[u8], seed: &str) -> Result<Encoded> {
    if payload.is_empty() {
        return Ok(Encoded {
            container: Bytes::new(),
            original_size: 0,
            container_size: 0,
            ratio: 0.0,
            digest: String::new(),
            level: EncodingLevel::Uncompressed,
            entropy: 0.0,
        });
    }

    let original_len =
        u32::try_from(payload.len()).map_err(|_| VaultError::PayloadTooLarge(payload.len()))?;

    let digest: [u8; 32] = Sha256::digest(payload).into();
    let score = entropy(payload);
    let chosen = EncodingLevel::for_entropy(score);

    let compressed = compress(payload, chosen)?;
    let (level, body) = if compressed.len() < payload.len() {
        (chosen, compressed)
    } else {
        (EncodingLevel::Uncompressed, payload.to_vec())
    };

    let header = ContainerHeader {
        original_len,
        entropy: score as f32,
        digest,
        seed: normalize(seed),
        level,
    };

    let mut container = Vec::with_capacity(HEADER_SIZE + body.len());
    container.extend_from_slice(&header.to_bytes());
    container.extend_from_slice(&body);

    let container_size = container.len();
    tracing::trace!(
        original = payload.len(),
        container = container_size,
        entropy = score,
        ?level,
        "encoded payload"
    );

    Ok(Encoded {
        container: Bytes::from(container),
        original_size: payload.len(),
        container_size,
        ratio: payload.len() as f64 / container_size as f64,
        digest: hex::encode(digest),
        level,
        entropy: score,
    })
}

/// Decode a container, ignoring the seed.
///
/// See [`decode_with_policy`] for seed-gated decoding.
pub fn decode(container: &[u8], seed: &str) -> Result<Decoded> {
    decode_with_policy(container, seed, SeedPolicy::Ignore)
}

/// Decode a container under an explicit seed policy.
///
/// A digest or length mismatch is reported through `Decoded::verified`, not
/// as an error, and neither is a broken zlib stream: whatever inflated before
/// the break is returned unverified. Inflation stops one byte past the header
/// length. Structural header problems (short buffer,
/// wrong magic, unknown marker) and enforced seed mismatches are errors.
pub fn decode_with_policy(container: &[u8], seed: &str, policy: SeedPolicy) -> Result<Decoded> {
    if container.is_empty() {
        return Ok(Decoded {
            payload: Bytes::new(),
            verified: true,
            digest: String::new(),
            expected_digest: String::new(),
        });
    }

    let header = ContainerHeader::parse(container)?;

    if policy == SeedPolicy::Enforce && header.seed != normalize(seed) {
        return Err(VaultError::SeedMismatch);
    }

    let body = &container[HEADER_SIZE..];
    let (payload, stream_intact) = match header.level {
        EncodingLevel::Uncompressed => (body.to_vec(), true),
        _ => decompress(body, header.original_len as usize),
    };

    let actual: [u8; 32] = Sha256::digest(&payload).into();
    let verified = stream_intact
        && payload.len() == header.original_len as usize
        && actual == header.digest;
    if !verified {
        tracing::debug!(
            expected = %header.digest_hex(),
            actual = %hex::encode(actual),
            "container digest mismatch"
        );
    }

    Ok(Decoded {
        payload: Bytes::from(payload),
        verified,
        digest: hex::encode(actual),
        expected_digest: header.digest_hex(),
    })
}

/// Parse and validate a container's header without decoding its body
pub fn inspect(container: &[u8]) -> Result<ContainerHeader> {
    ContainerHeader::parse(container)
}

// =============================================================================
// zlib helpers
// =============================================================================

fn compress(payload: &[u8], level: EncodingLevel) -> Result<Vec<u8>> {
    let compression = match level.compression() {
        Some(c) => c,
        None => return Ok(payload.to_vec()),
    };

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(payload.len() / 2), compression);
    encoder.write_all(payload)?;
    Ok(encoder.finish()?)
}

/// Upper bound on the up-front allocation trusted from a header length
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Inflate `body`, producing at most `expected_len + 1` bytes.
///
/// Returns the bytes produced and whether the stream ended cleanly within
/// `expected_len`. On a broken or overlong stream the partial output is kept.
fn decompress(body: &[u8], expected_len: usize) -> (Vec<u8>, bool) {
    let limit = expected_len as u64 + 1;
    let mut decoder = ZlibDecoder::new(body).take(limit);
    let mut out = Vec::with_capacity(expected_len.min(MAX_PREALLOC));
    if let Err(e) = decoder.read_to_end(&mut out) {
        tracing::warn!(error = %e, inflated = out.len(), "zlib stream broken");
        return (out, false);
    }

    if out.len() > expected_len {
        tracing::warn!(expected = expected_len, "zlib stream longer than header length");
        return (out, false);
    }
    (out, true)
}
