//! Store Module
//!
//! In-memory virtual block store over encoded containers.
//!
//! ## Responsibilities
//! - Assign identifiers and own every stored container
//! - Count accesses per block
//! - Serve decoded payloads from a byte-budgeted cache
//! - Keep running totals of original and encoded bytes
//! - Export a timestamped snapshot of store state
//!
//! ## Block Lifecycle
//! ```text
//!   absent ──allocate──▶ allocated ──read──▶ cached
//!                            ▲                 │
//!                            └────evicted◀─────┘
//!   allocated / cached ──free──▶ freed
//! ```
//!
//! ## Concurrency
//! Blocks, cache and totals sit behind one mutex so every operation is
//! atomic. Encoding runs before the lock is taken.

mod block;
mod cache;
mod manager;
mod snapshot;

pub use block::{Block, BlockId, BlockRecord, BlockSummary};
pub use cache::{CacheStats, DecodeCache};
pub use manager::{BlockStore, StoreStats, StoreTotals};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
