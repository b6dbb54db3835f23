//! Wire helpers
//!
//! Line-delimited JSON framing and base64 conversion.
//!
//! ## Wire Format
//! ```text
//! {"op":"allocate","payload":"aGVsbG8=","seed":"t1"}\n
//! {"status":"ok","body":{"kind":"allocated","id":"..."}}\n
//! ```

use std::io::{BufRead, Read, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{Result, VaultError};

use super::{Command, Response};

/// Maximum accepted line length (64 MB of base64 text)
pub const MAX_LINE_SIZE: usize = 64 * 1024 * 1024;

// =============================================================================
// Base64
// =============================================================================

/// Encode bytes as standard, padded base64
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode standard, padded base64. `field` names the input in errors.
pub fn decode_base64(field: &str, text: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(text.trim())
        .map_err(|e| VaultError::Protocol(format!("{}: invalid base64: {}", field, e)))
}

// =============================================================================
// Command / Response Encoding
// =============================================================================

/// Encode a command as one JSON line (without the newline)
pub fn encode_command(command: &Command) -> Result<String> {
    Ok(serde_json::to_string(command)?)
}

/// Decode a command from one JSON line
pub fn decode_command(line: &str) -> Result<Command> {
    serde_json::from_str(line.trim())
        .map_err(|e| VaultError::Protocol(format!("invalid command: {}", e)))
}

/// Encode a response as one JSON line (without the newline)
pub fn encode_response(response: &Response) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Decode a response from one JSON line
pub fn decode_response(line: &str) -> Result<Response> {
    serde_json::from_str(line.trim())
        .map_err(|e| VaultError::Protocol(format!("invalid response: {}", e)))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read the next command from a stream.
///
/// Blank lines are skipped. Returns `Ok(None)` at end of input.
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<Option<Command>> {
    read_command_with_limit(reader, MAX_LINE_SIZE)
}

/// Read the next command, buffering at most `max_line` bytes of one line.
///
/// An overlong line is skipped up to its newline and reported as a
/// `Protocol` error, as is a line that is not UTF-8; the stream stays
/// positioned at the next line either way.
pub fn read_command_with_limit<R: BufRead>(
    reader: &mut R,
    max_line: usize,
) -> Result<Option<Command>> {
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .by_ref()
            .take(max_line as u64 + 1)
            .read_until(b'\n', &mut line)?;
        if read == 0 {
            return Ok(None);
        }
        if line.len() > max_line {
            if line.last() != Some(&b'\n') {
                discard_line(reader)?;
            }
            return Err(VaultError::Protocol(format!(
                "Line too large: more than {} bytes",
                max_line
            )));
        }

        let text = std::str::from_utf8(&line)
            .map_err(|e| VaultError::Protocol(format!("command is not valid UTF-8: {}", e)))?;
        if !text.trim().is_empty() {
            return decode_command(text).map(Some);
        }
    }
}

/// Consume input up to and including the next newline without buffering it
fn discard_line<R: BufRead>(reader: &mut R) -> Result<()> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        match buf.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(());
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

/// Write a response to a stream as one line
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let line = encode_response(response)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
