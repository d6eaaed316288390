//! Configuration for Questline
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Cache TTL used by the reference deployment (seconds).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 1800;

/// Main configuration for a Questline instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the durable store (sled database)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// Redis connection URL; `None` selects the in-process cache
    pub redis_url: Option<String>,

    /// Expiry applied to cache entries (seconds)
    pub cache_ttl_secs: u64,

    // -------------------------------------------------------------------------
    // Progression Configuration
    // -------------------------------------------------------------------------
    /// Path to a JSON rules file (quests, metric, level thresholds);
    /// `None` uses the built-in reference rules
    pub rules_path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Worker threads in the connection pool (one active connection each)
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./questline_data"),
            redis_url: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            rules_path: None,
            listen_addr: "127.0.0.1:7600".to_string(),
            worker_threads: 64,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the durable store directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the redis URL for the cache adapter
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = Some(url.into());
        self
    }

    /// Set the cache entry TTL (in seconds)
    pub fn cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.cache_ttl_secs = secs;
        self
    }

    /// Set the progression rules file path
    pub fn rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rules_path = Some(path.into());
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
