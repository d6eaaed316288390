//! Error types for Questline
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using QuestlineError
pub type Result<T> = std::result::Result<T, QuestlineError>;

/// Unified error type for Questline operations
#[derive(Debug, Error)]
pub enum QuestlineError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Durable Store Errors
    // -------------------------------------------------------------------------
    #[error("Store error: {0}")]
    Store(#[from] sled::Error),

    // -------------------------------------------------------------------------
    // Cache Errors
    //
    // The pipeline logs and swallows these; they never reach a peer.
    // -------------------------------------------------------------------------
    #[error("Cache error: {0}")]
    Cache(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
