//! Backend Module
//!
//! This module contains all server-side code for TapSpot's one-to-one
//! messaging service: an Axum HTTP API, a WebSocket gateway and the SQLite
//! persistence behind both.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Registration, login, JWT tokens, user lookup
//! - **`middleware`** - Bearer token authentication
//! - **`messaging`** - Message and conversation persistence, REST handlers
//! - **`realtime`** - Connection hub and per-connection WebSocket sessions
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── messaging/      - Messages and conversations
//! ├── realtime/       - Hub and WebSocket sessions
//! └── error/          - Error types
//! ```
//!
//! # Message Flow
//!
//! A chat message, whether posted over REST or sent as a WebSocket frame,
//! goes through `messaging::record_chat`: it is validated, stored together
//! with both conversation rows in one transaction, and then handed to the
//! hub, which pushes a copy to each participant that is online. Offline
//! recipients read it later through the history endpoint.

pub mod auth;
pub mod error;
pub mod messaging;
pub mod middleware;
pub mod realtime;
pub mod routes;
pub mod server;
