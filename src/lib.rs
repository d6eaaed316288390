//! # Questline
//!
//! A battle-pass progression backend with:
//! - Cache-aside reads and write-through-after-commit saves
//! - Event-driven leveling with at-most-once reward issuance per level
//! - A newline-delimited JSON TCP protocol
//! - Fixed worker pool, one blocking connection per worker
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                             │
//! │            (acceptor → bounded worker pool)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one Connection per worker
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection Handler                          │
//! │       decode line → dispatch → encode response              │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐            ┌─────────────────┐
//!   │  Progression    │            │  SyncPipeline   │
//!   │  Engine (pure)  │            │  (cache-aside)  │
//!   └─────────────────┘            └───────┬─────────┘
//!                                          │
//!                             ┌────────────┴────────────┐
//!                             ▼                         ▼
//!                      ┌─────────────┐          ┌─────────────┐
//!                      │    Cache    │          │   Durable   │
//!                      │ (redis/mem) │          │ Store (sled)│
//!                      └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod cache;
pub mod network;
pub mod progression;
pub mod protocol;
pub mod store;
pub mod sync;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{QuestlineError, Result};
pub use sync::SyncPipeline;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Questline
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
