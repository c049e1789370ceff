//! Server Module
//!
//! This module contains the code for configuring and starting the Axum HTTP
//! server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading and validation
//! └── init.rs         - Database setup and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: defaults, optional TOML file, environment
//! 2. **Database**: connect and migrate
//! 3. **Hub**: start the connection registry task
//! 4. **Router Creation**: configure routes and middleware

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::ServerConfig;
pub use init::{build_app, connect_database, create_app};
pub use state::AppState;
