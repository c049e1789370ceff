/**
 * WebSocket Upgrade Handler
 *
 * `GET /api/ws` upgrades an authenticated request into a realtime session.
 * The token is read from the `token` query parameter (browsers cannot set
 * headers on WebSocket requests) or from an `Authorization: Bearer` header.
 * Authentication happens before the upgrade, so a bad token is a plain 401.
 */

use axum::{
    extract::{ws::WebSocketUpgrade, Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

use crate::backend::error::BackendError;
use crate::backend::middleware::{authenticate, bearer_token};
use crate::backend::realtime::session::run_session;
use crate::backend::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// Upgrade handler (GET /api/ws)
///
/// # Errors
///
/// * `401 Unauthorized` - Missing, invalid or expired token, or unknown user
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
) -> Result<Response, BackendError> {
    let token = query
        .token
        .as_deref()
        .filter(|token| !token.is_empty())
        .or_else(|| bearer_token(&headers))
        .ok_or_else(|| {
            tracing::warn!("[Auth] WebSocket request without token");
            BackendError::unauthorized("Missing token")
        })?;

    let user = authenticate(&state, token).await?;
    let session = state.config.session;
    let pool = state.db.clone();
    let hub = state.hub.clone();

    Ok(ws
        .max_message_size(session.max_frame_bytes)
        .max_frame_size(session.max_frame_bytes)
        .on_upgrade(move |socket| run_session(socket, pool, hub, session, user)))
}
