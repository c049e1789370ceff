//! Messaging HTTP Handlers
//!
//! This module contains the HTTP handlers for direct messages and
//! conversations. All routes sit behind `auth_middleware`.
//!
//! `send_message` is the non-realtime path: it persists through the same
//! router as the WebSocket session and then pushes through the hub when the
//! receiver is online.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::Hub;
use crate::shared::messaging::{
    Conversation, ConversationSummary, GetConversationResponse, ListConversationsResponse,
    ListMessagesResponse, MarkReadResponse, SendMessageRequest, SendMessageResponse,
    UnreadCountResponse, UserId,
};

use super::{db, dispatch};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Only return messages with a greater id
    pub after_id: Option<i64>,
}

impl HistoryQuery {
    /// Page number, at least 1
    pub fn page(&self) -> u32 {
        match self.page {
            Some(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
            _ => 1,
        }
    }

    /// Page size in 1-100, anything else falls back to the default
    pub fn page_size(&self) -> u32 {
        match self.page_size {
            Some(size) if (1..=i64::from(MAX_PAGE_SIZE)).contains(&size) => size as u32,
            _ => DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WithUserQuery {
    pub user_id: UserId,
}

async fn summarize(pool: &SqlitePool, conversation: Conversation) -> Result<ConversationSummary, BackendError> {
    let (name, avatar) = match get_user_by_id(pool, conversation.peer_id).await? {
        Some(peer) => (peer.display_name().to_string(), peer.avatar),
        None => (String::new(), String::new()),
    };
    Ok(ConversationSummary::new(conversation, name, avatar))
}

async fn owned_conversation(
    pool: &SqlitePool,
    conversation_id: i64,
    owner_id: UserId,
) -> Result<Conversation, BackendError> {
    db::get_conversation_for_owner(pool, conversation_id, owner_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Conversation not found"))
}

/// Send a message (POST /api/messages)
///
/// Returns the persisted message whether or not the receiver is online.
pub async fn send_message(
    State(pool): State<SqlitePool>,
    State(hub): State<Hub>,
    AuthUser(auth): AuthUser,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    let Json(request) = payload?;
    let delivery = dispatch::record_chat(&pool, auth.user_id, &request).await?;
    let message = delivery.message.clone();

    if hub.is_online(message.receiver_id).await {
        hub.broadcast(delivery).await;
    } else {
        tracing::debug!(
            "[Messaging] Receiver {} offline, message {} stored only",
            message.receiver_id,
            message.id
        );
    }

    Ok(Json(SendMessageResponse {
        success: true,
        message,
    }))
}

/// List the caller's conversations (GET /api/conversations)
pub async fn list_conversations(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ListConversationsResponse>, BackendError> {
    let rows = db::list_conversations(&pool, auth.user_id).await?;

    let mut conversations = Vec::with_capacity(rows.len());
    for row in rows {
        conversations.push(summarize(&pool, row).await?);
    }

    Ok(Json(ListConversationsResponse { conversations }))
}

/// Get or create the caller's conversation with a user (GET /api/conversations/with?user_id=)
pub async fn get_or_create_conversation(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Query(query): Query<WithUserQuery>,
) -> Result<Json<GetConversationResponse>, BackendError> {
    if query.user_id == auth.user_id {
        return Err(BackendError::bad_request("Cannot open a conversation with yourself"));
    }
    if get_user_by_id(&pool, query.user_id).await?.is_none() {
        return Err(BackendError::not_found("User not found"));
    }

    let conversation = db::get_or_create_conversation(&pool, auth.user_id, query.user_id).await?;

    Ok(Json(GetConversationResponse {
        conversation: summarize(&pool, conversation).await?,
    }))
}

/// Resolve the history path parameter to a peer
///
/// The caller's own conversation id wins. Any other value is taken as the
/// peer's user id, so clients can open history before a conversation exists.
async fn history_peer(pool: &SqlitePool, param: i64, viewer: UserId) -> Result<UserId, BackendError> {
    if let Some(conversation) = db::get_conversation_for_owner(pool, param, viewer).await? {
        return Ok(conversation.peer_id);
    }
    if param == viewer {
        return Err(BackendError::bad_request("Cannot read a conversation with yourself"));
    }
    if get_user_by_id(pool, param).await?.is_none() {
        return Err(BackendError::not_found("Conversation not found"));
    }
    Ok(param)
}

/// Fetch history (GET /api/conversations/{id}/messages)
///
/// `{id}` is one of the caller's conversation ids or a peer's user id.
/// Does not acknowledge anything; clients call the read endpoint for that.
pub async fn get_messages(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(conversation_or_peer): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ListMessagesResponse>, BackendError> {
    let peer_id = history_peer(&pool, conversation_or_peer, auth.user_id).await?;
    let page = query.page();
    let page_size = query.page_size();

    let messages = db::fetch_history(
        &pool,
        auth.user_id,
        peer_id,
        page,
        page_size,
        query.after_id,
    )
    .await?;

    Ok(Json(ListMessagesResponse {
        messages,
        page,
        page_size,
    }))
}

/// Acknowledge a conversation (POST /api/conversations/{id}/read)
pub async fn mark_conversation_read(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(conversation_id): Path<i64>,
) -> Result<Json<MarkReadResponse>, BackendError> {
    let conversation = owned_conversation(&pool, conversation_id, auth.user_id).await?;
    let marked = db::mark_conversation_read(&pool, auth.user_id, conversation.peer_id).await?;

    Ok(Json(MarkReadResponse {
        conversation_id,
        marked,
    }))
}

/// Total unread messages for the caller (GET /api/messages/unread)
pub async fn unread_count(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UnreadCountResponse>, BackendError> {
    let unread_count = db::unread_total(&pool, auth.user_id).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}
