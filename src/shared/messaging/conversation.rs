//! Conversation Data Structures
//!
//! A conversation row is owned by one user and describes that user's view of
//! a relationship with a single peer. Every delivered message touches two rows,
//! `(sender, receiver)` and `(receiver, sender)`, which share the last message
//! and its time but keep separate unread counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::UserId;

/// One owner's summary of a conversation with a peer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Surrogate id, different for each side of the same pair
    pub id: i64,
    pub owner_id: UserId,
    pub peer_id: UserId,
    pub last_message: String,
    /// `None` until the first message is exchanged
    pub last_message_at: Option<DateTime<Utc>>,
    /// Messages from the peer that the owner has not read yet
    pub unread_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Conversation ids of both sides after a message was recorded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationPair {
    /// Row owned by the sender
    pub sender_conversation_id: i64,
    /// Row owned by the receiver
    pub receiver_conversation_id: i64,
}

/// Conversation enriched with the peer's public profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: i64,
    pub peer_id: UserId,
    pub peer_name: String,
    pub peer_avatar: String,
    pub last_message: String,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i64,
}

impl ConversationSummary {
    pub fn new(conversation: Conversation, peer_name: String, peer_avatar: String) -> Self {
        Self {
            id: conversation.id,
            peer_id: conversation.peer_id,
            peer_name,
            peer_avatar,
            last_message: conversation.last_message,
            last_message_at: conversation.last_message_at,
            unread_count: conversation.unread_count,
        }
    }
}

/// Response for listing conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConversationsResponse {
    pub conversations: Vec<ConversationSummary>,
}

/// Response for get-or-create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetConversationResponse {
    pub conversation: ConversationSummary,
}

/// Response after acknowledging a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkReadResponse {
    pub conversation_id: i64,
    /// Messages that flipped to read
    pub marked: u64,
}
