//! Durable Store Module
//!
//! Narrow read/write contract against durable storage: keyed fetch, keyed
//! upsert, and an atomic batch append onto the rewards log. The pipeline
//! only ever talks to the [`DurableStore`] trait; the shipped implementation
//! is sled-backed.

mod sled;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::progression::PlayerProgression;

pub use self::sled::SledStore;

/// Durable player row: the progression blob plus its last-updated stamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlayer {
    pub state: PlayerProgression,
    pub updated_at: DateTime<Utc>,
}

/// One row in the append-only rewards log, keyed by (player, level)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRow {
    pub player_id: i64,
    pub level: u32,
    pub reward: String,
    pub granted_at: DateTime<Utc>,
}

/// Contract the synchronization pipeline holds against durable storage
///
/// `upsert` must commit as a single atomic unit, and `append_rewards` must
/// apply its whole batch atomically; keying rewards by (player, level) makes
/// re-issuing a level's reward overwrite rather than duplicate.
pub trait DurableStore: Send + Sync {
    /// Fetch the committed progression for a player, if any
    fn fetch(&self, player_id: i64) -> Result<Option<PlayerProgression>>;

    /// Insert or overwrite the player row in one atomic unit
    fn upsert(&self, state: &PlayerProgression) -> Result<()>;

    /// Append a batch of reward rows atomically
    fn append_rewards(&self, rows: &[RewardRow]) -> Result<()>;

    /// All reward rows recorded for a player, in ascending level order
    fn rewards_for(&self, player_id: i64) -> Result<Vec<RewardRow>>;
}
