//! Message Router
//!
//! Shared by the realtime session and the HTTP fallback: validate, persist,
//! update both conversation rows, and resolve what the hub needs to fan the
//! message out. Nothing is handed to the hub before the transaction commits.

use sqlx::SqlitePool;

use crate::backend::auth::users;
use crate::backend::error::BackendError;
use crate::shared::messaging::{
    validate_outgoing, ChatFrame, ChatMessage, ConversationPair, OutboundFrame,
    SendMessageRequest, UserId,
};

use super::db;

/// A persisted message ready for fan-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDelivery {
    pub message: ChatMessage,
    /// Display name of the sender at send time
    pub sender_name: String,
    pub conversations: ConversationPair,
}

impl ChatDelivery {
    fn frame(&self, conversation_id: i64, is_me: bool) -> OutboundFrame {
        OutboundFrame::Chat(ChatFrame {
            message_id: self.message.id,
            conversation_id,
            sender_id: self.message.sender_id,
            sender_name: self.sender_name.clone(),
            receiver_id: self.message.receiver_id,
            content: self.message.content.clone(),
            post_id: self.message.post_id,
            created_at: self.message.created_at,
            is_me,
        })
    }

    /// Copy for the receiver, carrying the receiver's conversation id
    pub fn frame_for_receiver(&self) -> OutboundFrame {
        self.frame(self.conversations.receiver_conversation_id, false)
    }

    /// Echo for the sender, carrying the sender's conversation id
    pub fn frame_for_sender(&self) -> OutboundFrame {
        self.frame(self.conversations.sender_conversation_id, true)
    }
}

/// Validate and persist a message from `sender_id`
///
/// # Errors
///
/// * `400` - Self-addressed message or content outside 1-1000 characters
/// * `404` - Receiver does not exist
/// * `500` - Store failure; nothing was persisted
pub async fn record_chat(
    pool: &SqlitePool,
    sender_id: UserId,
    request: &SendMessageRequest,
) -> Result<ChatDelivery, BackendError> {
    validate_outgoing(sender_id, request.receiver_id, &request.content)?;

    if !users::user_exists(pool, request.receiver_id).await? {
        return Err(BackendError::not_found("Receiver does not exist"));
    }

    // Resolved up front so a lookup failure leaves nothing persisted
    let sender_name = users::display_name(pool, sender_id).await?;

    let (message, conversations) = db::record_message(
        pool,
        sender_id,
        request.receiver_id,
        &request.content,
        request.post_id,
    )
    .await?;

    tracing::debug!(
        "[Messaging] Message {} from {} to {}: {}",
        message.id,
        sender_id,
        message.receiver_id,
        message.preview(32)
    );

    Ok(ChatDelivery {
        message,
        sender_name,
        conversations,
    })
}
