//! Response definitions
//!
//! Represents responses to callers.

use serde::{Deserialize, Serialize};

use crate::codec::EncodingLevel;
use crate::store::{Snapshot, StoreStats};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    NotFound,
    IntegrityFailure,
    Error,
}

/// Successful result of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseBody {
    Allocated {
        id: String,
    },

    /// Base64 payload
    Payload {
        payload: String,
    },

    Freed {
        freed: bool,
    },

    Stats(StoreStats),

    Snapshot(Snapshot),

    Encoded {
        /// Base64 container
        container: String,
        original_size: usize,
        container_size: usize,
        ratio: f64,
        digest: String,
        level: EncodingLevel,
    },

    Decoded {
        /// Base64 payload
        payload: String,
        verified: bool,
        digest: String,
    },

    Pong,
}

/// A response to send to a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Result body (for OK)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ResponseBody>,

    /// Error message (for every other status)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Create an OK response
    pub fn ok(body: ResponseBody) -> Self {
        Self {
            status: Status::Ok,
            body: Some(body),
            error: None,
        }
    }

    /// Create a NOT_FOUND response
    pub fn not_found(message: &str) -> Self {
        Self::failure(Status::NotFound, message)
    }

    /// Create an INTEGRITY_FAILURE response
    pub fn integrity_failure(message: &str) -> Self {
        Self::failure(Status::IntegrityFailure, message)
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self::failure(Status::Error, message)
    }

    fn failure(status: Status, message: &str) -> Self {
        Self {
            status,
            body: None,
            error: Some(message.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
