//! Shared Module
//!
//! This module contains types that are independent of the server runtime:
//! the messaging data model, the WebSocket wire protocol and the validation
//! rules every delivery path applies. They are plain serde types and can be
//! used by clients as well as by the backend.

/// Shared error types
pub mod error;

/// Messaging types and wire protocol
pub mod messaging;

/// Re-export commonly used types for convenience
pub use error::SharedError;
