//! Progression state types
//!
//! The player aggregate and the shared level-threshold rules.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuestlineError, Result};

/// Cumulative progress on a single named quest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    /// Running counter of delivered event amounts. Negative amounts are
    /// applied as-is, so the counter itself may dip below zero.
    pub counter: i64,
}

/// Per-player progression aggregate
///
/// `level` only ever moves up; it is re-derived from the quest counters on
/// every event rather than accumulated from deltas, so redelivered events
/// cannot double-count a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgression {
    pub player_id: i64,
    pub level: u32,
    pub xp: i64,
    pub quests: BTreeMap<String, QuestProgress>,
}

impl PlayerProgression {
    /// Default state for a player never seen before: level 0, zeroed
    /// counters for every recognized event type.
    pub fn new_default(player_id: i64, rules: &ProgressionRules) -> Self {
        let quests = rules
            .quests
            .iter()
            .map(|name| (name.clone(), QuestProgress::default()))
            .collect();

        Self {
            player_id,
            level: 0,
            xp: 0,
            quests,
        }
    }

    /// Flatten the quest map to name -> counter (wire shape)
    pub fn quest_counters(&self) -> BTreeMap<String, i64> {
        self.quests
            .iter()
            .map(|(name, q)| (name.clone(), q.counter))
            .collect()
    }
}

/// Which counters feed the level computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMetric {
    /// Sum of every quest counter
    Sum,
    /// A single designated quest counter
    Quest(String),
}

/// A single level threshold: the aggregate progress required to reach
/// `level` and the reward granted for crossing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelThreshold {
    pub level: u32,
    pub xp_required: i64,
    pub reward: String,
}

/// Immutable leveling rules, loaded once at startup and shared read-only
/// across every connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionRules {
    /// Recognized event types; events outside this set are ignored
    pub quests: Vec<String>,

    /// Aggregate progress rule
    pub metric: ProgressMetric,

    /// Thresholds in ascending level order
    pub thresholds: Vec<LevelThreshold>,
}

impl ProgressionRules {
    /// Load rules from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let rules: Self = serde_json::from_str(&raw)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Thresholds must be strictly ascending in both level and requirement,
    /// otherwise level derivation is ambiguous.
    pub fn validate(&self) -> Result<()> {
        for pair in self.thresholds.windows(2) {
            if pair[1].level <= pair[0].level || pair[1].xp_required < pair[0].xp_required {
                return Err(QuestlineError::Config(format!(
                    "thresholds out of order at level {}",
                    pair[1].level
                )));
            }
        }
        Ok(())
    }
}

impl Default for ProgressionRules {
    /// Reference configuration used when no rules file is supplied
    fn default() -> Self {
        let thresholds = [
            (1, 100, "Bronze Chest"),
            (2, 250, "Silver Chest"),
            (3, 500, "Gold Chest"),
            (4, 1000, "Epic Emote"),
            (5, 2000, "Legendary Skin"),
        ]
        .into_iter()
        .map(|(level, xp_required, reward)| LevelThreshold {
            level,
            xp_required,
            reward: reward.to_string(),
        })
        .collect();

        Self {
            quests: vec![
                "kill_boss".to_string(),
                "win_match".to_string(),
                "daily_login".to_string(),
            ],
            metric: ProgressMetric::Sum,
            thresholds,
        }
    }
}
