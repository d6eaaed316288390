//! Protocol codec
//!
//! Line-level encoding and decoding for the wire protocol. Decoding is done
//! in two steps so that a malformed or invalid line can still yield the
//! best-known player id for the ERROR response.

use std::io::{BufRead, Write};

use serde_json::Value;

use crate::error::{QuestlineError, Result};

use super::{Command, Response};

/// Sentinel player id reported when a line is too broken to recover one
pub const UNKNOWN_PLAYER_ID: i64 = -1;

const KNOWN_TYPES: [&str; 4] = ["LOAD", "SAVE", "EVENT", "PING"];

/// Decode one request line into a command
///
/// Errors are `Protocol` for malformed JSON / bad shape / unknown command,
/// `Validation` for a non-positive player id. The connection handler maps
/// both onto an ERROR response and keeps the connection open.
pub fn decode_command(line: &str) -> Result<Command> {
    let value: Value = serde_json::from_str(line.trim())
        .map_err(|e| QuestlineError::Protocol(format!("malformed request: {}", e)))?;

    let cmd_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| QuestlineError::Protocol("missing command type".to_string()))?
        .to_string();

    if !KNOWN_TYPES.contains(&cmd_type.as_str()) {
        return Err(QuestlineError::Protocol(format!(
            "unknown command: {}",
            cmd_type
        )));
    }

    let command: Command = serde_json::from_value(value)
        .map_err(|e| QuestlineError::Protocol(format!("invalid {} command: {}", cmd_type, e)))?;

    if command.player_id() <= 0 {
        return Err(QuestlineError::Validation(format!(
            "playerId must be positive, got {}",
            command.player_id()
        )));
    }

    Ok(command)
}

/// Best-effort extraction of the player id from a request line, for error
/// reporting when full decoding failed.
pub fn player_id_hint(line: &str) -> i64 {
    serde_json::from_str::<Value>(line.trim())
        .ok()
        .and_then(|v| v.get("playerId").and_then(Value::as_i64))
        .unwrap_or(UNKNOWN_PLAYER_ID)
}

/// Encode a command as a single request line (no trailing newline)
pub fn encode_command(command: &Command) -> Result<String> {
    Ok(serde_json::to_string(command)?)
}

/// Encode a response as a single response line (no trailing newline)
pub fn encode_response(response: &Response) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Write one response line to a stream and flush it
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let line = encode_response(response)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read one response line from a stream
///
/// Returns `Ok(None)` on a clean end-of-stream.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Option<Response>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let response: Response = serde_json::from_str(line.trim())
        .map_err(|e| QuestlineError::Protocol(format!("malformed response: {}", e)))?;
    Ok(Some(response))
}
