//! Direct Message Data Structures
//!
//! A message is created once by the delivery path and never edited. Both the
//! realtime session and the HTTP fallback validate through [`validate_outgoing`]
//! so the two paths accept exactly the same inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Identity of a registered user
pub type UserId = i64;

/// Longest accepted message, counted in characters
pub const MAX_CONTENT_CHARS: usize = 1000;

/// A persisted direct message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: i64,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    /// Post the message refers to, if any
    pub post_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Get a preview of the message (first N characters)
    pub fn preview(&self, max_len: usize) -> String {
        if self.content.chars().count() <= max_len {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }
}

/// A message as seen by one participant of the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageView {
    pub id: i64,
    pub sender_id: UserId,
    pub sender_name: String,
    pub content: String,
    pub post_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// True when the viewer sent this message
    pub is_me: bool,
}

/// Request to send a message over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub receiver_id: UserId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub post_id: Option<i64>,
}

/// Response after sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: ChatMessage,
}

/// Response for a page of conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<MessageView>,
    pub page: u32,
    pub page_size: u32,
}

/// Total of unread messages addressed to the caller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// Check a message before it is persisted
///
/// Rejects self-addressed messages and content outside
/// `1..=MAX_CONTENT_CHARS` characters.
pub fn validate_outgoing(
    sender_id: UserId,
    receiver_id: UserId,
    content: &str,
) -> Result<(), SharedError> {
    if sender_id == receiver_id {
        return Err(SharedError::validation(
            "receiver_id",
            "Cannot send a message to yourself",
        ));
    }

    let length = content.chars().count();
    if length == 0 || length > MAX_CONTENT_CHARS {
        return Err(SharedError::validation(
            "content",
            format!("Message content must be between 1 and {} characters", MAX_CONTENT_CHARS),
        ));
    }

    Ok(())
}
