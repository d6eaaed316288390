//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (JSON lines)
//!
//! One request or response per line, newline-delimited UTF-8, each line a
//! JSON object.
//!
//! ### Requests
//! ```text
//! {"type":"LOAD","playerId":42}
//! {"type":"EVENT","playerId":42,"eventType":"kill_boss","amount":100}
//! {"type":"SAVE","playerId":42,"data":{...full progression...}}
//! {"type":"PING","playerId":42}
//! ```
//!
//! ### Responses
//! ```text
//! {"status":"OK","playerId":42,"level":1,"xp":100,"quests":{"kill_boss":100,...}}
//! {"status":"PONG","playerId":42}
//! {"status":"ERROR","playerId":-1,"message":"..."}
//! ```
//!
//! A bare SAVE is acknowledged by silence: no response line is emitted unless
//! it fails. Peers infer success from the absence of an ERROR line.

mod codec;
mod command;
mod response;

pub use codec::{
    decode_command, encode_command, encode_response, player_id_hint, read_response,
    write_response, UNKNOWN_PLAYER_ID,
};
pub use command::Command;
pub use response::{Response, Status};
