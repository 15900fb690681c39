//! ShiftLang Error Types
//!
//! Centralized error handling for the capture-translate-replace pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Central error type for ShiftLang
#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid hotkey '{hotkey}': {reason}")]
    Hotkey { hotkey: String, reason: String },

    #[error("Input device error: {0}")]
    Device(String),

    #[error("No keyboard devices found")]
    NoKeyboards,

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Key injection error: {0}")]
    Injection(String),

    #[error("{provider} provider error: {message}")]
    Provider { provider: String, message: String },

    #[error("Another instance is already running (lock held on {0:?})")]
    AlreadyRunning(PathBuf),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShiftError {
    /// Shorthand for a provider failure
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        ShiftError::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for ShiftLang operations
pub type ShiftResult<T> = Result<T, ShiftError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for ShiftError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        ShiftError::Lock(err.to_string())
    }
}
