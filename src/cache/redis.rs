//! Redis cache adapter
//!
//! Uses the synchronous redis API with one connection checked out per
//! operation, so a slow or dead cache node is scoped to the operation that
//! touched it.

use redis::Commands;

use crate::error::{QuestlineError, Result};

use super::ProgressionCache;

/// Redis-backed progression cache
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    /// Create a cache adapter for the given redis URL
    ///
    /// Only validates the URL; connections are established per operation.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| QuestlineError::Config(format!("invalid redis URL: {}", e)))?;
        Ok(Self { client })
    }

    fn connection(&self) -> Result<redis::Connection> {
        self.client
            .get_connection()
            .map_err(|e| QuestlineError::Cache(e.to_string()))
    }
}

impl ProgressionCache for RedisCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection()?;
        let value: Option<String> = conn
            .get(key)
            .map_err(|e| QuestlineError::Cache(e.to_string()))?;
        Ok(value)
    }

    fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.connection()?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .map_err(|e| QuestlineError::Cache(e.to_string()))?;
        Ok(())
    }
}
