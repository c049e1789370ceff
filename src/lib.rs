//! TapSpot - Messaging Service
//!
//! One-to-one messaging for TapSpot users: REST endpoints for history and
//! conversation management, plus a WebSocket channel that delivers new
//! messages to both participants the moment they are stored.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire and API types shared by server and clients
//!   - Chat messages, conversation summaries, WebSocket frames
//!   - Shared error type
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server and WebSocket gateway
//!   - JWT authentication
//!   - SQLite persistence through sqlx
//!
//! # Usage
//!
//! ```rust,no_run
//! use tapspot::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let addr = config.bind_address();
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
