//! Response definitions
//!
//! Represents responses to clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::progression::PlayerProgression;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "PONG")]
    Pong,
    #[serde(rename = "ERROR")]
    Error,
}

/// A response to send to a client
///
/// Plain responses carry only `status` and `playerId` (plus `message` on
/// errors); progression responses additionally carry `level`, `xp` and the
/// flattened quest counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: Status,
    pub player_id: i64,

    /// Present only on ERROR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quests: Option<BTreeMap<String, i64>>,
}

impl Response {
    /// OK response carrying the full progression snapshot
    pub fn progression(state: &PlayerProgression) -> Self {
        Self {
            status: Status::Ok,
            player_id: state.player_id,
            message: None,
            level: Some(state.level),
            xp: Some(state.xp),
            quests: Some(state.quest_counters()),
        }
    }

    /// PONG response echoing the player id
    pub fn pong(player_id: i64) -> Self {
        Self {
            status: Status::Pong,
            player_id,
            message: None,
            level: None,
            xp: None,
            quests: None,
        }
    }

    /// ERROR response with the triggering message
    pub fn error(player_id: i64, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            player_id,
            message: Some(message.into()),
            level: None,
            xp: None,
            quests: None,
        }
    }
}
