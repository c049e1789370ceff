//! Shared Error Types
//!
//! This module defines error types that are shared by the realtime and HTTP
//! delivery paths. They describe failures that do not depend on the transport:
//! a frame that cannot be decoded or a message that breaks a content rule.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Message or request validation failures
//!
//! # Usage
//!
//! ```rust
//! use tapspot::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "Message content cannot be empty");
//! assert_eq!(error.detail(), "Message content cannot be empty");
//! ```
use thiserror::Error;

/// Shared error types raised before anything touches the store or the hub
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Validation error on a single field
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The message without the category prefix, suitable for clients
    pub fn detail(&self) -> &str {
        match self {
            Self::SerializationError { message } => message,
            Self::ValidationError { message, .. } => message,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
