//! WebSocket Wire Protocol
//!
//! Frames exchanged over the upgraded connection are JSON text frames tagged
//! by a `type` field.
//!
//! # Inbound
//!
//! ```json
//! {"type": "chat", "receiver_id": 2, "content": "hi", "post_id": 10}
//! {"type": "read", "receiver_id": 2}
//! ```
//!
//! For `read`, `receiver_id` names the peer whose messages are acknowledged.
//!
//! # Outbound
//!
//! A chat delivery is sent to both participants. The copies differ only in
//! `conversation_id` (each side's own row) and `is_me`.
//!
//! ```json
//! {"type": "chat", "message_id": 5, "conversation_id": 3, "sender_id": 1,
//!  "sender_name": "alice", "receiver_id": 2, "content": "hi",
//!  "created_at": "2026-01-01T10:00:00Z", "is_me": false}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::UserId;
use crate::shared::error::SharedError;

/// Frame sent by a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// Send a message to `receiver_id`
    Chat {
        receiver_id: UserId,
        #[serde(default)]
        content: String,
        #[serde(default)]
        post_id: Option<i64>,
    },
    /// Acknowledge everything received from `receiver_id`
    Read { receiver_id: UserId },
}

impl InboundFrame {
    /// Decode a text frame
    pub fn decode(text: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One copy of a chat delivery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatFrame {
    pub message_id: i64,
    /// Conversation row owned by the socket receiving this copy
    pub conversation_id: i64,
    pub sender_id: UserId,
    pub sender_name: String,
    pub receiver_id: UserId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    /// True on the sender's own echo
    pub is_me: bool,
}

/// Frame sent by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    Chat(ChatFrame),
    /// A chat frame from this connection was not delivered
    Error {
        receiver_id: UserId,
        message: String,
    },
}

impl OutboundFrame {
    pub fn encode(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
