//! Codec test suite
//!
//! Seed normalization, entropy scoring, header layout and container
//! encode/decode.

mod entropy_tests;
