//! # BlockVault
//!
//! Self-describing compressed containers and a virtual block store with:
//! - A fixed 96-byte container header (magic, length, entropy, digest, seed, marker)
//! - Entropy-driven choice of zlib compression strength
//! - SHA-256 integrity verification on every decode
//! - A byte-budgeted decode cache with least-accessed eviction
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Protocol (JSON + base64)                     │
//! │                    Command / Response                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                                │
//! └──────────┬───────────────────────────────────┬──────────────┘
//!            │                                   │
//!            ▼                                   ▼
//!   ┌─────────────────┐                 ┌─────────────────┐
//!   │   BlockStore    │────────────────▶│      Codec      │
//!   │    (Mutex)      │  encode/decode  │ (seed, entropy, │
//!   └────────┬────────┘                 │  header, zlib)  │
//!            │                          └─────────────────┘
//!            ▼
//!   ┌─────────────────┐
//!   │   DecodeCache   │
//!   │ (byte budget)   │
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod store;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{VaultError, Result};
pub use config::{Config, SeedPolicy};
pub use engine::Engine;
pub use store::{BlockId, BlockStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of BlockVault
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
