/**
 * API Route Handlers
 *
 * This module defines the API routes.
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/register` - User registration
 * - `POST /api/login` - User login
 * - `GET /api/health` - Liveness and online user count
 * - `GET /api/ws` - WebSocket upgrade (authenticates its own token)
 *
 * ## Authenticated (`Authorization: Bearer <token>`)
 * - `GET /api/me` - Current user
 * - `POST /api/messages` - Send a message
 * - `GET /api/messages/unread` - Unread total
 * - `GET /api/conversations` - Conversation list
 * - `GET /api/conversations/with?user_id=` - Get or create a conversation
 * - `GET /api/conversations/{id}/messages` - History
 * - `POST /api/conversations/{id}/read` - Mark read
 */

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::backend::auth::{get_me, login, register};
use crate::backend::error::BackendError;
use crate::backend::messaging::handlers::{
    get_messages, get_or_create_conversation, list_conversations, mark_conversation_read,
    send_message, unread_count,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::{ws_handler, Hub};
use crate::backend::server::state::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub online_users: usize,
}

/// Health check (GET /api/health)
///
/// The count comes from a snapshot through the hub loop, so a stopped hub
/// reports 503 instead of a stale number.
pub async fn health(State(hub): State<Hub>) -> Result<Json<HealthResponse>, BackendError> {
    let online = hub.online_users().await.map_err(|e| {
        tracing::error!("[Hub] Health check failed: {}", e);
        BackendError::handler(StatusCode::SERVICE_UNAVAILABLE, "Connection hub is not running")
    })?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        online_users: online.len(),
    }))
}

/// Configure API routes
///
/// Authenticated routes get `auth_middleware` as a route layer, so unknown
/// paths still fall through to the router's fallback instead of a 401.
pub fn configure_api_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/health", get(health))
        .route("/api/ws", get(ws_handler));

    let protected = Router::new()
        .route("/api/me", get(get_me))
        .route("/api/messages", post(send_message))
        .route("/api/messages/unread", get(unread_count))
        .route("/api/conversations", get(list_conversations))
        .route("/api/conversations/with", get(get_or_create_conversation))
        .route(
            "/api/conversations/{conversation_id}/messages",
            get(get_messages),
        )
        .route(
            "/api/conversations/{conversation_id}/read",
            post(mark_conversation_read),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    public.merge(protected)
}
