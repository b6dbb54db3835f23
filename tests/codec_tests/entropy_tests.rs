//! Tests for entropy scoring

use blockvault::codec::entropy;

#[test]
fn test_entropy_empty_is_zero() {
    assert_eq!(entropy(&[]), 0.0);
}

#[test]
fn test_entropy_constant_bytes_is_zero() {
    assert_eq!(entropy(&[0x41; 4096]), 0.0);
}

#[test]
fn test_entropy_two_symbols_is_one_bit() {
    let payload: Vec<u8> = (0..1000).map(|i| if i % 2 == 0 { 0 } else { 1 }).collect();
    assert!((entropy(&payload) - 1.0).abs() < 1e-9);
}

#[test]
fn test_entropy_uniform_histogram_is_eight_bits() {
    let payload: Vec<u8> = (0..256 * 16).map(|i| (i % 256) as u8).collect();
    assert!((entropy(&payload) - 8.0).abs() < 1e-9);
}

#[test]
fn test_entropy_is_order_independent() {
    let forward: Vec<u8> = (0..=255u8).chain(0..=127u8).collect();
    let mut reversed = forward.clone();
    reversed.reverse();

    assert_eq!(entropy(&forward), entropy(&reversed));
}

#[test]
fn test_entropy_text_is_moderate() {
    let text = b"the quick brown fox jumps over the lazy dog ".repeat(50);
    let score = entropy(&text);

    assert!(score > 3.0 && score < 5.0, "score was {}", score);
}
