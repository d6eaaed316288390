//! Cache Module
//!
//! Keyed get / set-with-expiry against a fast volatile store. The cache is
//! an optimization, never a correctness dependency: every caller treats a
//! cache failure as a miss and logs it.

mod memory;
mod redis;

use crate::error::Result;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

/// Cache key for a player's progression blob
pub fn cache_key(player_id: i64) -> String {
    format!("bp:{}", player_id)
}

/// Contract the synchronization pipeline holds against the cache service
pub trait ProgressionCache: Send + Sync {
    /// Fetch a cached blob, `None` on miss or expiry
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a blob with an expiry in seconds
    fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
}
