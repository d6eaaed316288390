//! Command definitions
//!
//! Represents commands from clients.

use serde::{Deserialize, Serialize};

use crate::progression::PlayerProgression;

/// A parsed command
///
/// Tagged on the wire by the `type` field; anything outside this closed set
/// is rejected by the codec as an unknown command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Load (or lazily create) a player's progression
    #[serde(rename = "LOAD", rename_all = "camelCase")]
    Load { player_id: i64 },

    /// Overwrite a player's progression with a full client-supplied state
    #[serde(rename = "SAVE", rename_all = "camelCase")]
    Save {
        player_id: i64,
        data: PlayerProgression,
    },

    /// Apply a quest event and persist the result
    #[serde(rename = "EVENT", rename_all = "camelCase")]
    Event {
        player_id: i64,
        event_type: String,
        amount: i64,
    },

    /// Liveness check
    #[serde(rename = "PING", rename_all = "camelCase")]
    Ping { player_id: i64 },
}

impl Command {
    /// The player this command addresses
    pub fn player_id(&self) -> i64 {
        match self {
            Command::Load { player_id }
            | Command::Save { player_id, .. }
            | Command::Event { player_id, .. }
            | Command::Ping { player_id } => *player_id,
        }
    }
}
