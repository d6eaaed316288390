//! Sled-backed durable store
//!
//! Two trees inside one sled database: `players` holds bincode-encoded
//! [`StoredPlayer`] rows keyed by decimal player id, `rewards` holds the
//! append-only reward log keyed by `"{player_id}:{level}"`. Reward batches
//! go through [`sled::Batch`], which sled applies atomically.

use std::path::Path;

use chrono::Utc;
use sled::IVec;

use crate::error::Result;
use crate::progression::PlayerProgression;

use super::{DurableStore, RewardRow, StoredPlayer};

const TREE_PLAYERS: &str = "players";
const TREE_REWARDS: &str = "rewards";

/// Sled-backed persistence for player progression and reward rows
pub struct SledStore {
    db: sled::Db,
    players: sled::Tree,
    rewards: sled::Tree,
}

impl SledStore {
    /// Open (or create) the store rooted at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let players = db.open_tree(TREE_PLAYERS)?;
        let rewards = db.open_tree(TREE_REWARDS)?;
        Ok(Self {
            db,
            players,
            rewards,
        })
    }

    fn player_key(player_id: i64) -> Vec<u8> {
        player_id.to_string().into_bytes()
    }

    /// Zero-padding the level keeps reward rows for a player in ascending
    /// level order under the lexicographic tree ordering.
    fn reward_key(player_id: i64, level: u32) -> Vec<u8> {
        format!("{}:{:010}", player_id, level).into_bytes()
    }

    fn reward_prefix(player_id: i64) -> Vec<u8> {
        format!("{}:", player_id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Force pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl DurableStore for SledStore {
    fn fetch(&self, player_id: i64) -> Result<Option<PlayerProgression>> {
        match self.players.get(Self::player_key(player_id))? {
            Some(bytes) => {
                let row: StoredPlayer = Self::deserialize(bytes)?;
                Ok(Some(row.state))
            }
            None => Ok(None),
        }
    }

    fn upsert(&self, state: &PlayerProgression) -> Result<()> {
        let row = StoredPlayer {
            state: state.clone(),
            updated_at: Utc::now(),
        };
        self.players
            .insert(Self::player_key(state.player_id), Self::serialize(&row)?)?;
        Ok(())
    }

    fn append_rewards(&self, rows: &[RewardRow]) -> Result<()> {
        let mut batch = sled::Batch::default();
        for row in rows {
            batch.insert(
                Self::reward_key(row.player_id, row.level),
                Self::serialize(row)?,
            );
        }
        self.rewards.apply_batch(batch)?;
        Ok(())
    }

    fn rewards_for(&self, player_id: i64) -> Result<Vec<RewardRow>> {
        let mut rows = Vec::new();
        for entry in self.rewards.scan_prefix(Self::reward_prefix(player_id)) {
            let (_key, bytes) = entry?;
            rows.push(Self::deserialize::<RewardRow>(bytes)?);
        }
        Ok(rows)
    }
}

impl Drop for SledStore {
    fn drop(&mut self) {
        if let Err(e) = self.db.flush() {
            tracing::warn!("store flush on close failed: {}", e);
        }
    }
}
