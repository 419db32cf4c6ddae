//! Error types for the timeseal library
//!
//! This module defines the errors that can occur while creating seals,
//! configuring the sealing engine or decoding fingerprints.
//!
//! Seal *verification* never produces one of these errors. A failed
//! verification is a normal outcome and is reported through
//! [`SealVerification`](crate::types::SealVerification) instead.

use thiserror::Error;

/// Type alias for Results in the timeseal library
pub type Result<T> = std::result::Result<T, SealError>;

/// Main error type for all timeseal operations
#[derive(Debug, Error)]
pub enum SealError {
    /// I/O errors while reading or writing evidence records
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed or missing input to a hashing or sealing operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Content larger than the configured limit
    #[error("Content too large: {size} bytes exceeds limit of {limit} bytes")]
    ContentTooLarge {
        /// Actual content size in bytes
        size: usize,
        /// Configured size limit
        limit: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Malformed hex string passed to a strict decoder
    #[error("Decode error: {0}")]
    Decode(String),

    /// Seal format version this build does not understand
    #[error("Unsupported seal version: {0}")]
    UnsupportedVersion(u32),

    /// Thread pool construction error
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl SealError {
    /// Create an invalid input error with a custom message
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        SealError::InvalidInput(msg.into())
    }

    /// Create a configuration error with a custom message
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        SealError::InvalidConfiguration(msg.into())
    }

    /// Create a decode error with a custom message
    pub fn decode(msg: impl Into<String>) -> Self {
        SealError::Decode(msg.into())
    }

    /// Check if this error is recoverable by retrying with the same input
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SealError::Io(_) | SealError::ThreadPool(_))
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            SealError::ContentTooLarge { size, limit } => {
                format!(
                    "Content is too large to seal ({} bytes). Maximum allowed size is {} bytes. \
                     Raise the limit with `max_content_size` or seal a smaller document.",
                    size, limit
                )
            }
            SealError::UnsupportedVersion(v) => {
                format!(
                    "Seal uses format version {}, which this build cannot verify. \
                     Upgrade timeseal to read it.",
                    v
                )
            }
            SealError::Decode(msg) => {
                format!("Could not decode fingerprint ({}). Expected 16 hex characters.", msg)
            }
            _ => self.to_string(),
        }
    }
}
