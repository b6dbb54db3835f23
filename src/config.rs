//! Configuration for BlockVault
//!
//! Centralized configuration with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// Main configuration for a BlockVault store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Decode Cache Configuration
    // -------------------------------------------------------------------------
    /// Total bytes of decoded payloads the cache may hold
    pub cache_budget: usize,

    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Whether decoding checks the caller's seed against the header
    pub seed_policy: SeedPolicy,

    // -------------------------------------------------------------------------
    // Batch Configuration
    // -------------------------------------------------------------------------
    /// Batches whose total payload size is below this are encoded on the
    /// calling thread
    pub parallel_threshold: usize,
}

/// How the seed stored in a container gates decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Seed is recorded but any seed decodes the container
    #[default]
    Ignore,

    /// Decoding fails with `SeedMismatch` unless the normalized seeds match
    Enforce,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_budget: 64 * 1024 * 1024, // 64 MB
            seed_policy: SeedPolicy::Ignore,
            parallel_threshold: 4 * 1024 * 1024, // 4 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values the store cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.cache_budget == 0 {
            return Err(VaultError::Config(
                "cache_budget must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the decode cache budget (in bytes)
    pub fn cache_budget(mut self, bytes: usize) -> Self {
        self.config.cache_budget = bytes;
        self
    }

    /// Set the seed policy used when decoding
    pub fn seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.config.seed_policy = policy;
        self
    }

    /// Set the batch size (in bytes) above which encoding is spread over threads
    pub fn parallel_threshold(mut self, bytes: usize) -> Self {
        self.config.parallel_threshold = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
