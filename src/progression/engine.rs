//! Progression engine
//!
//! Applies quest events to a player aggregate and re-derives the level.
//!
//! ## Leveling model
//!
//! A level is "reached" when the aggregate progress metric meets its
//! configured requirement. The engine always recomputes the level from the
//! full current state, never from the delta just applied, so delivering the
//! same event twice (or with `amount = 0`) can never double-count a level.

use super::state::{PlayerProgression, ProgressMetric, ProgressionRules};

/// Aggregate progress for a player under the configured metric, clamped to
/// zero so negative counters cannot produce a negative requirement check.
fn aggregate_progress(state: &PlayerProgression, rules: &ProgressionRules) -> i64 {
    let raw = match &rules.metric {
        ProgressMetric::Sum => state.quests.values().map(|q| q.counter).sum(),
        ProgressMetric::Quest(name) => state.quests.get(name).map(|q| q.counter).unwrap_or(0),
    };
    raw.max(0)
}

/// Highest configured level whose requirement is satisfied by the player's
/// current progress. Level 0 when no threshold is met.
pub fn level_for_progress(state: &PlayerProgression, rules: &ProgressionRules) -> u32 {
    let progress = aggregate_progress(state, rules);
    rules
        .thresholds
        .iter()
        .take_while(|t| progress >= t.xp_required)
        .map(|t| t.level)
        .last()
        .unwrap_or(0)
}

/// Apply one event to the player and return how many levels it crossed.
///
/// Unrecognized event types are a no-op, not an error. The amount is applied
/// as-is (negative amounts decrease the counter), but the level never moves
/// down: a shrinking counter leaves `level` where it was and gains zero.
pub fn apply_event(
    state: &mut PlayerProgression,
    rules: &ProgressionRules,
    event_type: &str,
    amount: i64,
) -> u32 {
    let Some(quest) = state.quests.get_mut(event_type) else {
        return 0;
    };
    quest.counter += amount;

    state.xp = aggregate_progress(state, rules);

    let derived = level_for_progress(state, rules);
    let gained = derived.saturating_sub(state.level);
    state.level = state.level.max(derived);
    gained
}

/// Reward descriptions for the levels strictly above `from` up to and
/// including `to`, in ascending level order. Levels without a configured
/// threshold are skipped.
pub fn rewards_between<'r>(
    rules: &'r ProgressionRules,
    from: u32,
    to: u32,
) -> impl Iterator<Item = (u32, &'r str)> {
    rules
        .thresholds
        .iter()
        .filter(move |t| t.level > from && t.level <= to)
        .map(|t| (t.level, t.reward.as_str()))
}
