// src/error.rs

//! Unified error handling for the watcher.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for watcher operations.
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

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A listing page could not be fetched after all retries
    #[error("Fetch error on page {page}: {message}")]
    Fetch { page: u32, message: String },

    /// Notification delivery failed
    #[error("Notify error: {0}")]
    Notify(String),

    /// The seen-state file exists but cannot be used
    #[error("Seen state at {path:?} is unreadable: {message}")]
    State { path: PathBuf, message: String },

    /// The seen-state file could not be written
    #[error("Failed to persist seen state to {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error for a page.
    pub fn fetch(page: u32, message: impl fmt::Display) -> Self {
        Self::Fetch {
            page,
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }

    /// Create a seen-state error.
    pub fn state(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        Self::State {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Create a persistence error.
    pub fn persist(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error breaks the mark-then-notify guarantee.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persist { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let err = AppError::fetch(3, "timed out");
        assert_eq!(err.to_string(), "Fetch error on page 3: timed out");
    }

    #[test]
    fn test_persist_is_persistence() {
        let err = AppError::persist(
            "seen.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_persistence());
        assert!(!AppError::notify("smtp down").is_persistence());
    }
}
