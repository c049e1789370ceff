//! Realtime Module
//!
//! WebSocket delivery of direct messages.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs      - Module exports and documentation
//! ├── hub.rs      - Registry of online users and fan-out
//! ├── session.rs  - Per-connection read and write pumps
//! └── handlers.rs - Authenticated upgrade endpoint
//! ```
//!
//! # Flow
//!
//! 1. `GET /api/ws?token=...` is authenticated and upgraded
//! 2. The session registers with the hub and gets an outbound queue
//! 3. Inbound `chat` frames go through the message router, which persists
//!    them before the hub fans them out to both participants
//! 4. When the connection ends the session unregisters itself
//!
//! The hub is created once at startup and shared through `AppState`.

/// Connection registry and fan-out
pub mod hub;

/// Per-connection pumps
pub mod session;

/// Upgrade endpoint
pub mod handlers;

pub use handlers::ws_handler;
pub use hub::{ConnectionId, Hub, HubError, Registration};
