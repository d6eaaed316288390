//! Progression Module
//!
//! Pure battle-pass leveling logic over a player's quest counters.
//!
//! ## Responsibilities
//! - Hold the per-player progression state (level, xp, quest counters)
//! - Apply quest events and re-derive the level from current progress
//! - Describe the immutable level-threshold rules shared by all players
//!
//! The engine never touches the store or the cache; it is plain data in,
//! plain data out, which keeps it independently testable.

mod engine;
mod state;

pub use engine::{apply_event, level_for_progress, rewards_between};
pub use state::{
    LevelThreshold, PlayerProgression, ProgressMetric, ProgressionRules, QuestProgress,
};
