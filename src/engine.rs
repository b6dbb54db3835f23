//! Engine Module
//!
//! Routes boundary commands to the block store and the stateless codec.
//!
//! ## Responsibilities
//! - Decode base64 inputs and encode base64 outputs
//! - Execute store operations (allocate/read/free/stats/export)
//! - Execute one-shot encode/decode without touching the store
//! - Map errors to response statuses

use crate::codec;
use crate::config::Config;
use crate::error::{Result, VaultError};
use crate::protocol::{decode_base64, encode_base64, Command, Response, ResponseBody};
use crate::store::{BlockId, BlockStore};

/// Command executor over one block store
///
/// The engine owns its store. Callers that need to share it across threads
/// wrap the engine in an `Arc`; every store operation is internally
/// serialized.
pub struct Engine {
    store: BlockStore,
}

impl Engine {
    /// Create an engine with a fresh, empty store
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            store: BlockStore::new(config)?,
        })
    }

    /// Wrap an existing store
    pub fn with_store(store: BlockStore) -> Self {
        Self { store }
    }

    /// Execute a command, mapping any failure to an error response
    pub fn execute(&self, command: Command) -> Response {
        let name = command.name();
        match self.try_execute(command) {
            Ok(body) => Response::ok(body),
            Err(e @ VaultError::BlockNotFound(_)) => Response::not_found(&e.to_string()),
            Err(e @ VaultError::IntegrityFailure { .. }) => {
                Response::integrity_failure(&e.to_string())
            }
            Err(e) => {
                tracing::debug!(command = name, error = %e, "command failed");
                Response::error(&e.to_string())
            }
        }
    }

    /// Execute a command
    pub fn try_execute(&self, command: Command) -> Result<ResponseBody> {
        tracing::trace!(command = command.name(), "executing command");

        match command {
            Command::Allocate { payload, seed } => {
                let payload = decode_base64("payload", &payload)?;
                let id = self.store.allocate(&payload, &seed)?;
                Ok(ResponseBody::Allocated { id: id.to_string() })
            }
            Command::Read { id } => {
                let id: BlockId = id.parse()?;
                let payload = self.store.read(&id)?;
                Ok(ResponseBody::Payload {
                    payload: encode_base64(&payload),
                })
            }
            Command::Free { id } => {
                let id: BlockId = id.parse()?;
                Ok(ResponseBody::Freed {
                    freed: self.store.free(&id),
                })
            }
            Command::Stats => Ok(ResponseBody::Stats(self.store.stats())),
            Command::Export => Ok(ResponseBody::Snapshot(self.store.export_snapshot())),
            Command::Encode { payload, seed } => {
                let payload = decode_base64("payload", &payload)?;
                let encoded = codec::encode(&payload, &seed)?;
                Ok(ResponseBody::Encoded {
                    container: encode_base64(&encoded.container),
                    original_size: encoded.original_size,
                    container_size: encoded.container_size,
                    ratio: encoded.ratio,
                    digest: encoded.digest,
                    level: encoded.level,
                })
            }
            Command::Decode { container, seed } => {
                let container = decode_base64("container", &container)?;
                let decoded =
                    codec::decode_with_policy(&container, &seed, self.store.config().seed_policy)?;
                Ok(ResponseBody::Decoded {
                    payload: encode_base64(&decoded.payload),
                    verified: decoded.verified,
                    digest: decoded.digest,
                })
            }
            Command::Ping => Ok(ResponseBody::Pong),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &BlockStore {
        &self.store
    }
}
