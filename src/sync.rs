//! Synchronization Pipeline
//!
//! Orchestrates the cache and durable store for player progression.
//!
//! ## Consistency contract
//!
//! - **Cache-aside load**: cache first; any cache failure (including an
//!   undecodable blob) is a miss, never a hard error. On a durable hit the
//!   cache is refreshed best-effort.
//! - **Write-through after commit**: the cache is only updated once the
//!   durable upsert has committed. A failed durable write leaves the cache
//!   untouched, so a cached blob is always a committed state.
//! - **Rewards**: one row per crossed level, appended as a single atomic
//!   batch, at most one attempt. A failure here is logged and does not roll
//!   back the progression save that already committed.

use std::sync::Arc;

use crate::cache::{cache_key, ProgressionCache};
use crate::error::Result;
use crate::progression::{rewards_between, PlayerProgression, ProgressionRules};
use crate::store::{DurableStore, RewardRow};

/// Cache-aside synchronization pipeline for player progression
pub struct SyncPipeline {
    store: Arc<dyn DurableStore>,
    cache: Arc<dyn ProgressionCache>,
    rules: Arc<ProgressionRules>,
    cache_ttl_secs: u64,
}

impl SyncPipeline {
    pub fn new(
        store: Arc<dyn DurableStore>,
        cache: Arc<dyn ProgressionCache>,
        rules: Arc<ProgressionRules>,
        cache_ttl_secs: u64,
    ) -> Self {
        Self {
            store,
            cache,
            rules,
            cache_ttl_secs,
        }
    }

    /// The shared leveling rules
    pub fn rules(&self) -> &ProgressionRules {
        &self.rules
    }

    /// Load a player's progression: cache, then durable store, then create
    /// a persisted default for a player never seen before.
    pub fn load(&self, player_id: i64) -> Result<PlayerProgression> {
        let key = cache_key(player_id);

        match self.cache.get(&key) {
            Ok(Some(blob)) => match serde_json::from_str::<PlayerProgression>(&blob) {
                Ok(state) => {
                    tracing::trace!(player_id, "cache hit");
                    return Ok(state);
                }
                Err(e) => {
                    tracing::warn!(player_id, "undecodable cache blob, treating as miss: {}", e);
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(player_id, "cache read failed, treating as miss: {}", e);
            }
        }

        if let Some(state) = self.store.fetch(player_id)? {
            self.refresh_cache(&state);
            return Ok(state);
        }

        // First sight of this player: persist the default immediately so a
        // concurrent first-load converges on the same committed row.
        tracing::debug!(player_id, "creating default progression");
        let state = PlayerProgression::new_default(player_id, &self.rules);
        self.save(&state)?;
        Ok(state)
    }

    /// Persist a progression state, then refresh the cache.
    ///
    /// The durable upsert commits first; only then is the cache written.
    pub fn save(&self, state: &PlayerProgression) -> Result<()> {
        self.store.upsert(state)?;
        self.refresh_cache(state);
        Ok(())
    }

    /// Record one reward row per newly crossed level, ascending, as one
    /// atomic batch. Best effort: failures are logged, never propagated,
    /// and there is no retry.
    pub fn issue_level_rewards(&self, state: &PlayerProgression, levels_gained: u32) {
        let from = state.level.saturating_sub(levels_gained);
        let granted_at = chrono::Utc::now();
        let rows: Vec<RewardRow> = rewards_between(&self.rules, from, state.level)
            .map(|(level, reward)| RewardRow {
                player_id: state.player_id,
                level,
                reward: reward.to_string(),
                granted_at,
            })
            .collect();

        if rows.is_empty() {
            return;
        }

        match self.store.append_rewards(&rows) {
            Ok(()) => {
                tracing::info!(
                    player_id = state.player_id,
                    count = rows.len(),
                    level = state.level,
                    "issued level rewards"
                );
            }
            Err(e) => {
                tracing::warn!(
                    player_id = state.player_id,
                    "reward issuance failed (progression already committed): {}",
                    e
                );
            }
        }
    }

    /// Best-effort cache write; called only with committed states.
    fn refresh_cache(&self, state: &PlayerProgression) {
        let blob = match serde_json::to_string(state) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(player_id = state.player_id, "cache encode failed: {}", e);
                return;
            }
        };
        let key = cache_key(state.player_id);
        if let Err(e) = self.cache.set_with_ttl(&key, &blob, self.cache_ttl_secs) {
            tracing::warn!(player_id = state.player_id, "cache write failed: {}", e);
        }
    }
}
