//! Command definitions
//!
//! Represents requests from callers.

use serde::{Deserialize, Serialize};

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Encode and store a payload
    Allocate {
        payload: String,
        #[serde(default)]
        seed: String,
    },

    /// Read a block's payload
    Read { id: String },

    /// Remove a block
    Free { id: String },

    /// Aggregate store statistics
    Stats,

    /// Timestamped snapshot of store metadata
    Export,

    /// One-shot encode, nothing stored
    Encode {
        payload: String,
        #[serde(default)]
        seed: String,
    },

    /// One-shot decode, nothing stored
    Decode {
        container: String,
        #[serde(default)]
        seed: String,
    },

    /// Health check
    Ping,
}

impl Command {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Allocate { .. } => "allocate",
            Command::Read { .. } => "read",
            Command::Free { .. } => "free",
            Command::Stats => "stats",
            Command::Export => "export",
            Command::Encode { .. } => "encode",
            Command::Decode { .. } => "decode",
            Command::Ping => "ping",
        }
    }
}
