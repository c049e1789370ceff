//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! Handlers and the delivery path return `Result<T, BackendError>` and
//! propagate with `?`. The error is converted to a JSON body with the
//! matching status code at the HTTP boundary. The realtime path logs the
//! error and reports it to the sender as an `error` frame instead.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
