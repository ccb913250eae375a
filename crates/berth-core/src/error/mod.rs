//! Error types and result aliases for Berth operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the Berth ecosystem with actionable error messages.

use thiserror::Error;

/// Unified error type for all Berth operations
#[derive(Error, Debug)]
pub enum BerthError {
    // Registry errors
    #[error("Registry document '{key}' not found")]
    RegistryNotFound { key: String },

    #[error("Registry connection failed for '{key}': {message}")]
    RegistryConnection {
        key: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Registry document '{key}' is malformed: {message}")]
    RegistryData { key: String, message: String },

    // Config errors
    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Berth operations
pub type BerthResult<T> = Result<T, BerthError>;

impl BerthError {
    /// Create a connection error with an underlying source
    pub fn connection<E>(key: impl Into<String>, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::RegistryConnection {
            key: key.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a connection error without an underlying source
    pub fn connection_msg(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistryConnection {
            key: key.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a data error for a malformed or unsupported document
    pub fn data(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistryData {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check if this error is transient and worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, BerthError::RegistryConnection { .. } | BerthError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            BerthError::RegistryNotFound { .. } => {
                Some("Check the category and id spelling or list the manifest catalog")
            }
            BerthError::RegistryConnection { .. } => {
                Some("Check your internet connection and try again")
            }
            BerthError::RegistryData { .. } => {
                Some("The registry published a bad document; try again after the next publish")
            }
            BerthError::ConfigValidation { .. } => {
                Some("Review the registry configuration passed at construction")
            }
            _ => None,
        }
    }
}
