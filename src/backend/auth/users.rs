/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations. Users are the
 * identities messages are addressed to; the delivery path only needs to know
 * whether a user exists and how to display them.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::shared::messaging::UserId;

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: UserId,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// Optional display name, empty when unset
    pub nickname: String,
    /// Avatar URL, empty when unset
    pub avatar: String,
    /// Hashed password (bcrypt)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name shown to other users: the nickname if set, else the username
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.username
        } else {
            &self.nickname
        }
    }
}

/// Create a new user
///
/// # Returns
/// Created user, or a database error (a duplicate username surfaces as a
/// unique constraint violation)
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    nickname: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, nickname, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, username, nickname, avatar, password_hash, created_at, updated_at
        "#,
    )
    .bind(username)
    .bind(nickname)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, nickname, avatar, password_hash, created_at, updated_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, nickname, avatar, password_hash, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn user_exists(pool: &SqlitePool, id: UserId) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Resolve a display name, empty if the user is gone
pub async fn display_name(pool: &SqlitePool, id: UserId) -> Result<String, sqlx::Error> {
    Ok(get_user_by_id(pool, id)
        .await?
        .map(|user| user.display_name().to_string())
        .unwrap_or_default())
}
