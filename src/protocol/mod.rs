//! Protocol Module
//!
//! Typed commands and responses for callers outside the crate. Payloads and
//! containers cross this boundary as base64 text; everything behind it
//! works on raw bytes.
//!
//! ## Framing
//! One JSON object per line, in both directions.
//!
//! ### Commands (`op`)
//! - `allocate` - payload (base64), seed
//! - `read`     - id
//! - `free`     - id
//! - `stats`
//! - `export`
//! - `encode`   - payload (base64), seed
//! - `decode`   - container (base64), seed
//! - `ping`
//!
//! ### Response `status`
//! - `ok`
//! - `not_found`
//! - `integrity_failure`
//! - `error`

mod command;
mod response;
mod wire;

pub use command::Command;
pub use response::{Response, ResponseBody, Status};
pub use wire::{
    decode_base64, decode_command, encode_base64, encode_command, encode_response,
    decode_response, read_command, read_command_with_limit, write_response, MAX_LINE_SIZE,
};
