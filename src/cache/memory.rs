//! In-process cache adapter
//!
//! A TTL-honoring map used for cacheless/standalone deployments and tests.
//! Expired entries are dropped lazily on read.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::Result;

use super::ProgressionCache;

/// In-memory progression cache with per-entry expiry
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, String)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a single entry, regardless of expiry (test hook for inducing
    /// cache misses)
    pub fn evict(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

impl ProgressionCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((deadline, value)) if Instant::now() < *deadline => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries
            .lock()
            .insert(key.to_string(), (deadline, value.to_string()));
        Ok(())
    }
}
