//! Database operations for messaging
//!
//! This module contains the conversation store: message history and the
//! per-owner conversation rows that mirror each other for every pair.
//!
//! # Pair Consistency
//!
//! [`record_message`] inserts the message and updates both conversation rows
//! inside one transaction. Each row is written with a single upsert, so two
//! concurrent senders on the same pair can never lose an unread increment.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::shared::messaging::{ChatMessage, Conversation, ConversationPair, MessageView, UserId};

fn message_from_row(row: &SqliteRow) -> ChatMessage {
    ChatMessage {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        content: row.get("content"),
        post_id: row.get("post_id"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}

fn conversation_from_row(row: &SqliteRow) -> Conversation {
    Conversation {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        peer_id: row.get("peer_id"),
        last_message: row.get("last_message"),
        last_message_at: row.get("last_message_at"),
        unread_count: row.get("unread_count"),
        created_at: row.get("created_at"),
    }
}

/// Upsert one side of a pair and return its id
///
/// `unread_delta` is 1 for the receiver's row and 0 for the sender's.
async fn upsert_conversation(
    conn: &mut SqliteConnection,
    owner_id: UserId,
    peer_id: UserId,
    content: &str,
    at: DateTime<Utc>,
    unread_delta: i64,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO conversations (owner_id, peer_id, last_message, last_message_at, unread_count, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (owner_id, peer_id) DO UPDATE SET
            last_message = excluded.last_message,
            last_message_at = excluded.last_message_at,
            unread_count = conversations.unread_count + excluded.unread_count
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(peer_id)
    .bind(content)
    .bind(at)
    .bind(unread_delta)
    .bind(at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.get("id"))
}

/// Persist a message and update both conversation rows atomically
///
/// The caller is expected to have validated the message and checked that the
/// receiver exists.
pub async fn record_message(
    pool: &SqlitePool,
    sender_id: UserId,
    receiver_id: UserId,
    content: &str,
    post_id: Option<i64>,
) -> Result<(ChatMessage, ConversationPair), sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        INSERT INTO messages (sender_id, receiver_id, content, post_id, is_read, created_at)
        VALUES (?, ?, ?, ?, FALSE, ?)
        RETURNING id
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(content)
    .bind(post_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    let message_id: i64 = row.get("id");

    let sender_conversation_id =
        upsert_conversation(&mut *tx, sender_id, receiver_id, content, now, 0).await?;
    let receiver_conversation_id =
        upsert_conversation(&mut *tx, receiver_id, sender_id, content, now, 1).await?;

    tx.commit().await?;

    Ok((
        ChatMessage {
            id: message_id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            post_id,
            is_read: false,
            created_at: now,
        },
        ConversationPair {
            sender_conversation_id,
            receiver_conversation_id,
        },
    ))
}

/// Get the owner's conversation with a peer, creating an empty one if missing
///
/// Only the owner's row is created. The peer's row appears with the first
/// message.
pub async fn get_or_create_conversation(
    pool: &SqlitePool,
    owner_id: UserId,
    peer_id: UserId,
) -> Result<Conversation, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO conversations (owner_id, peer_id, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT (owner_id, peer_id) DO NOTHING
        "#,
    )
    .bind(owner_id)
    .bind(peer_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    find_conversation(pool, owner_id, peer_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Find the owner's conversation with a peer
pub async fn find_conversation(
    pool: &SqlitePool,
    owner_id: UserId,
    peer_id: UserId,
) -> Result<Option<Conversation>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, owner_id, peer_id, last_message, last_message_at, unread_count, created_at
        FROM conversations
        WHERE owner_id = ? AND peer_id = ?
        "#,
    )
    .bind(owner_id)
    .bind(peer_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(conversation_from_row))
}

/// Get a conversation by id, only if it belongs to `owner_id`
pub async fn get_conversation_for_owner(
    pool: &SqlitePool,
    conversation_id: i64,
    owner_id: UserId,
) -> Result<Option<Conversation>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, owner_id, peer_id, last_message, last_message_at, unread_count, created_at
        FROM conversations
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(conversation_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(conversation_from_row))
}

/// List the owner's conversations, most recent activity first
///
/// Rows without any message yet sort last.
pub async fn list_conversations(
    pool: &SqlitePool,
    owner_id: UserId,
) -> Result<Vec<Conversation>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, peer_id, last_message, last_message_at, unread_count, created_at
        FROM conversations
        WHERE owner_id = ?
        ORDER BY last_message_at IS NULL, last_message_at DESC, id DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(conversation_from_row).collect())
}

/// Fetch one page of history between `viewer_id` and `peer_id`
///
/// Pages count backwards from the newest message; the returned page is in
/// chronological order. With `after_id`, only messages newer than that id
/// are considered, which lets a polling client fetch just what it missed.
pub async fn fetch_history(
    pool: &SqlitePool,
    viewer_id: UserId,
    peer_id: UserId,
    page: u32,
    page_size: u32,
    after_id: Option<i64>,
) -> Result<Vec<MessageView>, sqlx::Error> {
    let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);

    let rows = sqlx::query(
        r#"
        SELECT m.id, m.sender_id, m.receiver_id, m.content, m.post_id, m.is_read, m.created_at,
               COALESCE(NULLIF(u.nickname, ''), u.username, '') AS sender_name
        FROM messages m
        LEFT JOIN users u ON u.id = m.sender_id
        WHERE ((m.sender_id = ? AND m.receiver_id = ?) OR (m.sender_id = ? AND m.receiver_id = ?))
          AND m.id > ?
        ORDER BY m.id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(viewer_id)
    .bind(peer_id)
    .bind(peer_id)
    .bind(viewer_id)
    .bind(after_id.unwrap_or(0))
    .bind(i64::from(page_size))
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut messages: Vec<MessageView> = rows
        .iter()
        .map(|row| {
            let message = message_from_row(row);
            MessageView {
                id: message.id,
                sender_id: message.sender_id,
                sender_name: row.get("sender_name"),
                content: message.content,
                post_id: message.post_id,
                is_read: message.is_read,
                created_at: message.created_at,
                is_me: message.sender_id == viewer_id,
            }
        })
        .collect();
    messages.reverse();

    Ok(messages)
}

/// Acknowledge everything the owner received from a peer
///
/// Resets the owner's unread counter and flips `is_read` on the peer's
/// messages. Returns the number of messages that changed.
pub async fn mark_conversation_read(
    pool: &SqlitePool,
    owner_id: UserId,
    peer_id: UserId,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE messages SET is_read = TRUE
        WHERE sender_id = ? AND receiver_id = ? AND is_read = FALSE
        "#,
    )
    .bind(peer_id)
    .bind(owner_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE conversations SET unread_count = 0
        WHERE owner_id = ? AND peer_id = ?
        "#,
    )
    .bind(owner_id)
    .bind(peer_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}

/// Count unread messages addressed to a user
pub async fn unread_total(pool: &SqlitePool, user_id: UserId) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count FROM messages WHERE receiver_id = ? AND is_read = FALSE
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("count"))
}
