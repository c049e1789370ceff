//! Authentication Module
//!
//! This module handles user registration, login and token verification.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── register.rs - User registration handler
//!     ├── login.rs    - User authentication handler
//!     └── me.rs       - Get current user handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username + password → user created → JWT returned
//! 2. **Login**: username + password → credentials verified → JWT returned
//! 3. **Authenticated requests**: `Authorization: Bearer <token>`, or the
//!    `token` query parameter on the WebSocket endpoint
//!
//! Passwords are hashed with bcrypt. Invalid credentials return 401 without
//! saying which part was wrong.

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use handlers::{get_me, login, register};
