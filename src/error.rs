//! Error types for Hydro Pace

use thiserror::Error;

/// Errors that can occur at the engine's data boundaries
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse entries: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),
}
