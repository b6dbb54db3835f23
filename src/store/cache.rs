//! Decode cache
//!
//! Byte-budgeted cache of decoded payloads keyed by block id.
//!
//! Eviction is frequency-based: the victim is the entry whose block has the
//! lowest access count at eviction time. Ties go to the entry inserted
//! earliest. Access counts belong to the store, so callers pass a lookup.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::BlockId;

/// A cached payload and its insertion order
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Bytes,
    inserted: u64,
}

/// Cache counters, reported in store stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Bytes of payload currently held
    pub used_bytes: usize,

    /// Maximum bytes the cache may hold
    pub budget_bytes: usize,

    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Bounded cache of decoded payloads
#[derive(Debug)]
pub struct DecodeCache {
    budget: usize,
    used: usize,
    entries: HashMap<BlockId, CacheEntry>,
    next_insert: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl DecodeCache {
    /// Create an empty cache holding at most `budget` payload bytes
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            used: 0,
            entries: HashMap::new(),
            next_insert: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a payload, counting the hit or miss
    pub fn get(&mut self, id: &BlockId) -> Option<Bytes> {
        match self.entries.get(id) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.payload.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Check for an entry without touching the hit/miss counters
    pub fn contains(&self, id: &BlockId) -> bool {
        self.entries.contains_key(id)
    }

    /// Insert a payload, evicting until it fits.
    ///
    /// `access_of` reports the current access count of a block. Returns the
    /// ids evicted to make room. A payload larger than the whole budget is
    /// not cached (and any older entry for `id` is dropped).
    pub fn put<F>(&mut self, id: BlockId, payload: Bytes, access_of: F) -> Vec<BlockId>
    where
        F: Fn(&BlockId) -> u64,
    {
        self.remove(&id);

        if payload.len() > self.budget {
            tracing::debug!(
                block = %id,
                size = payload.len(),
                budget = self.budget,
                "payload exceeds cache budget, not cached"
            );
            return Vec::new();
        }

        let mut evicted = Vec::new();
        while self.used + payload.len() > self.budget {
            match self.evict_one(&access_of) {
                Some(victim) => evicted.push(victim),
                None => break,
            }
        }

        self.used += payload.len();
        self.entries.insert(
            id,
            CacheEntry {
                payload,
                inserted: self.next_insert,
            },
        );
        self.next_insert += 1;

        evicted
    }

    /// Evict the entry with the lowest access count (earliest insertion on
    /// ties). Returns the evicted id, or `None` if the cache is empty.
    pub fn evict_one<F>(&mut self, access_of: F) -> Option<BlockId>
    where
        F: Fn(&BlockId) -> u64,
    {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(id, entry)| (access_of(*id), entry.inserted))
            .map(|(id, _)| *id)?;

        if let Some(entry) = self.entries.remove(&victim) {
            self.used -= entry.payload.len();
            self.evictions += 1;
            tracing::debug!(
                block = %victim,
                size = entry.payload.len(),
                access_count = access_of(&victim),
                "evicted decoded payload"
            );
        }
        Some(victim)
    }

    /// Drop the entry for `id`, if any
    pub fn remove(&mut self, id: &BlockId) -> Option<Bytes> {
        let entry = self.entries.remove(id)?;
        self.used -= entry.payload.len();
        Some(entry.payload)
    }

    /// Bytes of payload currently held
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            used_bytes: self.used,
            budget_bytes: self.budget,
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}
