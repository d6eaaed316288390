//! Tests for the synchronization pipeline: cache-aside loads,
//! write-through-after-commit saves, and reward issuance.

use std::sync::Arc;

use questline::cache::{cache_key, MemoryCache, ProgressionCache};
use questline::config::DEFAULT_CACHE_TTL_SECS;
use questline::progression::{apply_event, PlayerProgression, ProgressionRules};
use questline::store::{DurableStore, RewardRow, SledStore};
use questline::{Result, SyncPipeline};

struct Fixture {
    _dir: tempfile::TempDir,
    store: Arc<SledStore>,
    cache: Arc<MemoryCache>,
    rules: Arc<ProgressionRules>,
    pipeline: SyncPipeline,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(SledStore::open(dir.path()).expect("open store"));
    let cache = Arc::new(MemoryCache::new());
    let rules = Arc::new(ProgressionRules::default());
    let pipeline = SyncPipeline::new(
        store.clone(),
        cache.clone(),
        rules.clone(),
        DEFAULT_CACHE_TTL_SECS,
    );
    Fixture {
        _dir: dir,
        store,
        cache,
        rules,
        pipeline,
    }
}

fn cached_state(cache: &MemoryCache, player_id: i64) -> Option<PlayerProgression> {
    cache
        .get(&cache_key(player_id))
        .expect("memory cache never fails")
        .map(|blob| serde_json::from_str(&blob).expect("cache blob decodes"))
}

#[test]
fn first_load_creates_and_persists_the_default() {
    let f = fixture();

    let state = f.pipeline.load(42).expect("load");
    assert_eq!(state, PlayerProgression::new_default(42, &f.rules));

    // The default was committed, not just returned
    assert_eq!(f.store.fetch(42).expect("fetch"), Some(state.clone()));

    // Even after an induced cache miss, a reload sees the same default
    f.cache.evict(&cache_key(42));
    assert_eq!(f.pipeline.load(42).expect("reload"), state);
}

#[test]
fn save_refreshes_the_cache_only_after_commit() {
    let f = fixture();

    let mut state = PlayerProgression::new_default(7, &f.rules);
    apply_event(&mut state, &f.rules, "kill_boss", 100);

    f.pipeline.save(&state).expect("save");

    // Cache blob deserializes to exactly the committed state
    assert_eq!(cached_state(&f.cache, 7), Some(state.clone()));
    assert_eq!(f.store.fetch(7).expect("fetch"), Some(state));
}

#[test]
fn load_prefers_the_cache_over_the_store() {
    let f = fixture();

    let committed = f.pipeline.load(9).expect("load");

    // Plant a divergent blob directly in the cache; load must return it
    // without consulting the store.
    let mut divergent = committed.clone();
    divergent.xp = 999;
    f.cache
        .set_with_ttl(
            &cache_key(9),
            &serde_json::to_string(&divergent).unwrap(),
            DEFAULT_CACHE_TTL_SECS,
        )
        .unwrap();

    assert_eq!(f.pipeline.load(9).expect("load"), divergent);
}

#[test]
fn undecodable_cache_blob_is_a_miss_not_an_error() {
    let f = fixture();

    let state = f.pipeline.load(11).expect("load");

    f.cache
        .set_with_ttl(&cache_key(11), "{not json", DEFAULT_CACHE_TTL_SECS)
        .unwrap();

    // Falls through to the durable store and repairs the cache
    assert_eq!(f.pipeline.load(11).expect("load"), state);
    assert_eq!(cached_state(&f.cache, 11), Some(state));
}

#[test]
fn failed_durable_write_leaves_the_cache_untouched() {
    let f = fixture();

    let mut state = PlayerProgression::new_default(5, &f.rules);
    f.pipeline.save(&state).expect("seed save");
    let cached_before = cached_state(&f.cache, 5).expect("cached");

    // Same cache, but a store that refuses every write
    let broken = SyncPipeline::new(
        Arc::new(FailingStore),
        f.cache.clone(),
        f.rules.clone(),
        DEFAULT_CACHE_TTL_SECS,
    );

    apply_event(&mut state, &f.rules, "win_match", 300);
    assert!(broken.save(&state).is_err());

    // Cache still holds the last committed state, not the failed write
    assert_eq!(cached_state(&f.cache, 5), Some(cached_before));
}

#[test]
fn rewards_are_issued_once_per_crossed_level_in_ascending_order() {
    let f = fixture();

    let mut state = f.pipeline.load(3).expect("load");
    let gained = apply_event(&mut state, &f.rules, "kill_boss", 600);
    assert_eq!(gained, 3);
    f.pipeline.save(&state).expect("save");
    f.pipeline.issue_level_rewards(&state, gained);

    let rows = f.store.rewards_for(3).expect("rewards");
    let summary: Vec<_> = rows.iter().map(|r| (r.level, r.reward.as_str())).collect();
    assert_eq!(
        summary,
        vec![(1, "Bronze Chest"), (2, "Silver Chest"), (3, "Gold Chest")]
    );
    assert!(rows.iter().all(|r| r.player_id == 3));

    // A redelivered zero-amount event crosses nothing and issues nothing
    let gained = apply_event(&mut state, &f.rules, "kill_boss", 0);
    assert_eq!(gained, 0);
    f.pipeline.issue_level_rewards(&state, gained);
    assert_eq!(f.store.rewards_for(3).expect("rewards").len(), 3);
}

#[test]
fn reward_failure_does_not_roll_back_the_committed_save() {
    let f = fixture();

    let mut state = f.pipeline.load(8).expect("load");
    let gained = apply_event(&mut state, &f.rules, "kill_boss", 100);
    f.pipeline.save(&state).expect("save");

    // Rewards go to a dead store; the committed progression must survive
    let broken = SyncPipeline::new(
        Arc::new(FailingStore),
        f.cache.clone(),
        f.rules.clone(),
        DEFAULT_CACHE_TTL_SECS,
    );
    broken.issue_level_rewards(&state, gained);

    assert_eq!(f.store.fetch(8).expect("fetch"), Some(state));
}

#[test]
fn cache_read_failure_falls_through_to_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(SledStore::open(dir.path()).expect("open store"));
    let rules = Arc::new(ProgressionRules::default());
    let pipeline = SyncPipeline::new(
        store.clone(),
        Arc::new(FailingCache),
        rules.clone(),
        DEFAULT_CACHE_TTL_SECS,
    );

    // Every cache call fails, yet loads and saves still work
    let state = pipeline.load(21).expect("load");
    assert_eq!(state, PlayerProgression::new_default(21, &rules));
    assert_eq!(store.fetch(21).expect("fetch"), Some(state));
}

// =============================================================================
// Failure-injection doubles
// =============================================================================

struct FailingStore;

impl DurableStore for FailingStore {
    fn fetch(&self, _player_id: i64) -> Result<Option<PlayerProgression>> {
        Err(injected())
    }

    fn upsert(&self, _state: &PlayerProgression) -> Result<()> {
        Err(injected())
    }

    fn append_rewards(&self, _rows: &[RewardRow]) -> Result<()> {
        Err(injected())
    }

    fn rewards_for(&self, _player_id: i64) -> Result<Vec<RewardRow>> {
        Err(injected())
    }
}

struct FailingCache;

impl ProgressionCache for FailingCache {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(questline::QuestlineError::Cache("injected failure".into()))
    }

    fn set_with_ttl(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Err(questline::QuestlineError::Cache("injected failure".into()))
    }
}

fn injected() -> questline::QuestlineError {
    std::io::Error::new(std::io::ErrorKind::Other, "injected failure").into()
}
