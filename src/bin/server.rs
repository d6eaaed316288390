//! Questline Server Binary
//!
//! Starts the TCP progression server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use questline::cache::{MemoryCache, ProgressionCache, RedisCache};
use questline::network::Server;
use questline::progression::ProgressionRules;
use questline::store::SledStore;
use questline::{Config, SyncPipeline};

/// Questline Server
#[derive(Parser, Debug)]
#[command(name = "questline-server")]
#[command(about = "Battle-pass progression sync server")]
#[command(version)]
struct Args {
    /// Data directory for the durable store
    #[arg(short, long, default_value = "./questline_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7600")]
    listen: String,

    /// Connection worker threads
    #[arg(short, long, default_value = "64")]
    workers: usize,

    /// Redis URL for the cache; omitted = in-process cache
    #[arg(short, long)]
    redis_url: Option<String>,

    /// Cache entry TTL in seconds
    #[arg(long, default_value = "1800")]
    cache_ttl: u64,

    /// Path to a JSON progression rules file (quests, metric, thresholds)
    #[arg(long)]
    rules: Option<PathBuf>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,questline=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Questline Server v{}", questline::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    let mut builder = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .cache_ttl_secs(args.cache_ttl);
    if let Some(url) = &args.redis_url {
        builder = builder.redis_url(url);
    }
    if let Some(path) = &args.rules {
        builder = builder.rules_path(path);
    }
    let config = builder.build();

    // Level rules: loaded once, shared read-only by every connection
    let rules = match &config.rules_path {
        Some(path) => match ProgressionRules::from_path(path) {
            Ok(rules) => rules,
            Err(e) => {
                tracing::error!("failed to load rules from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ProgressionRules::default(),
    };
    tracing::info!(
        "loaded {} quests, {} level thresholds",
        rules.quests.len(),
        rules.thresholds.len()
    );

    // Durable store: failure to open is fatal at startup
    let store = match SledStore::open(&config.data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("failed to open durable store: {}", e);
            std::process::exit(1);
        }
    };

    // Cache: a bad redis URL is fatal, runtime cache errors never are
    let cache: Arc<dyn ProgressionCache> = match &config.redis_url {
        Some(url) => match RedisCache::new(url) {
            Ok(cache) => {
                tracing::info!("using redis cache at {}", url);
                Arc::new(cache)
            }
            Err(e) => {
                tracing::error!("failed to configure redis cache: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("using in-process cache");
            Arc::new(MemoryCache::new())
        }
    };

    let pipeline = Arc::new(SyncPipeline::new(
        store,
        cache,
        Arc::new(rules),
        config.cache_ttl_secs,
    ));

    let server = match Server::bind(config, pipeline) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("failed to bind listener: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("server stopped");
}
