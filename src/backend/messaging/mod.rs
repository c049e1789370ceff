//! Messaging Module
//!
//! This module handles direct messages between users.
//!
//! - **`db`** - Conversation store (messages and per-owner conversation rows)
//! - **`dispatch`** - Validate, persist and prepare a message for fan-out
//! - **`handlers`** - HTTP fallback sender and read/list endpoints

pub mod db;
pub mod dispatch;
pub mod handlers;

pub use dispatch::{record_chat, ChatDelivery};
