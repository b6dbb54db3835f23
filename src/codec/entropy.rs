//! Entropy analysis
//!
//! Shannon entropy of a byte histogram, in bits per byte.

/// Compute the Shannon entropy of `payload` in bits per byte.
///
/// Result is in `[0.0, 8.0]`; an empty payload scores `0.0`.
pub fn entropy(payload: &[u8]) -> f64 {
    if payload.is_empty() {
        return 0.0;
    }

    let mut histogram = [0u64; 256];
    for &byte in payload {
        histogram[byte as usize] += 1;
    }

    let total = payload.len() as f64;
    let bits = histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>();

    // A single-symbol payload sums to -0.0; rounding can push a uniform
    // histogram a hair past 8.0
    if bits <= 0.0 {
        0.0
    } else {
        bits.min(8.0)
    }
}
