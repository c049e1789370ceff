/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/register.
 *
 * # Registration Process
 *
 * 1. Validate username format and password length
 * 2. Check if the username is taken
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Generate JWT token
 * 6. Return token and user info
 */

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, get_user_by_username};
use crate::backend::error::BackendError;
use crate::backend::server::config::ServerConfig;
use crate::shared::SharedError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate username format
///
/// Usernames are 3-30 characters of ASCII letters, digits and underscores.
pub fn is_valid_username(username: &str) -> bool {
    (3..=30).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Invalid username or password too short
/// * `409 Conflict` - Username already taken
/// * `500 Internal Server Error` - Hashing, insert or token generation failed
///
/// # Example Request
///
/// ```http
/// POST /api/register HTTP/1.1
/// Content-Type: application/json
///
/// {"username": "alice", "password": "secret1", "nickname": "Ally"}
/// ```
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Arc<ServerConfig>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, BackendError> {
    let Json(request) = payload?;
    tracing::info!("[Auth] Register request for username: {}", request.username);

    if !is_valid_username(&request.username) {
        return Err(SharedError::validation(
            "username",
            "Username must be 3-30 characters of letters, digits or underscores",
        )
        .into());
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        )
        .into());
    }

    if get_user_by_username(&pool, &request.username).await?.is_some() {
        tracing::warn!("[Auth] Username already taken: {}", request.username);
        return Err(BackendError::handler(
            StatusCode::CONFLICT,
            "Username already taken",
        ));
    }

    let password_hash = bcrypt::hash(&request.password, config.auth.bcrypt_cost)?;
    let nickname = request.nickname.as_deref().map(str::trim).unwrap_or("");
    let user = create_user(&pool, &request.username, nickname, &password_hash).await?;

    let token = create_token(
        user.id,
        &user.username,
        &config.auth.jwt_secret,
        config.auth.token_ttl_days,
    )?;

    tracing::info!("[Auth] User registered: {} (id {})", user.username, user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("user_01"));
        assert!(is_valid_username(&"a".repeat(30)));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username(&"a".repeat(31)));
        assert!(!is_valid_username("bad name"));
        assert!(!is_valid_username("héllo"));
    }
}
