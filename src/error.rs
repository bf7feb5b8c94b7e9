// src/error.rs

//! Unified error handling for gh-watch.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for gh-watch operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Filter pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A persisted state file is unreadable or malformed
    #[error("Storage error in {path}: {message}")]
    Storage { path: String, message: String },

    /// A single source failed to produce candidates
    #[error("Source '{source_key}' failed: {message}")]
    Adapter { source_key: String, message: String },

    /// Repository identifier is not of the form `owner/name`
    #[error("Invalid repository id '{0}': expected owner/name")]
    InvalidRepoId(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a storage error for the given file.
    pub fn storage(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        Self::Storage {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create an adapter error for the given source key.
    pub fn adapter(source_key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Adapter {
            source_key: source_key.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
