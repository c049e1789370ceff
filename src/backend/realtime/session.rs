/**
 * Client Session
 *
 * One session per upgraded connection. The socket is split and driven by two
 * tasks:
 *
 * - **read pump**: decodes inbound frames and routes them. Chat frames are
 *   persisted and broadcast in the order they arrive; read frames acknowledge
 *   a conversation. Any frame, including pongs, resets the idle timer. Idle
 *   past the read timeout, a transport error or a close ends the session.
 * - **write pump**: drains the hub's outbound queue into the socket with a
 *   deadline per write, and pings whenever the connection has been quiet for
 *   a ping period. When the hub closes the queue the pump sends a close frame.
 *
 * Whichever pump finishes first tears the session down and unregisters it.
 */

use std::fmt::Display;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::backend::messaging::{db, dispatch};
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::realtime::hub::Hub;
use crate::backend::server::config::SessionConfig;
use crate::shared::messaging::{InboundFrame, OutboundFrame, SendMessageRequest, UserId};

/// Why the read pump stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Peer closed the connection
    Closed,
    /// Nothing arrived within the read timeout
    IdleTimeout,
    TransportError,
}

/// Why the write pump stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Outbound queue closed by the hub; a close frame was sent
    QueueClosed,
    /// A write or ping failed or missed its deadline
    WriteFailed,
}

/// What the read pump needs to route frames
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub user_id: UserId,
    pub pool: SqlitePool,
    pub hub: Hub,
    pub read_timeout: Duration,
}

impl SessionContext {
    async fn handle_text(&self, text: &str) {
        let frame = match InboundFrame::decode(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("[Session] Dropping frame from user {}: {}", self.user_id, e);
                return;
            }
        };

        match frame {
            InboundFrame::Chat {
                receiver_id,
                content,
                post_id,
            } => {
                let request = SendMessageRequest {
                    receiver_id,
                    content,
                    post_id,
                };
                match dispatch::record_chat(&self.pool, self.user_id, &request).await {
                    Ok(delivery) => self.hub.broadcast(delivery).await,
                    Err(e) => {
                        if e.status_code().is_server_error() {
                            tracing::error!(
                                "[Session] Message from {} to {} not stored: {}",
                                self.user_id,
                                receiver_id,
                                e
                            );
                        } else {
                            tracing::warn!(
                                "[Session] Message from {} to {} rejected: {}",
                                self.user_id,
                                receiver_id,
                                e
                            );
                        }
                        self.hub
                            .send_to_user(
                                self.user_id,
                                OutboundFrame::Error {
                                    receiver_id,
                                    message: e.message(),
                                },
                            )
                            .await;
                    }
                }
            }
            InboundFrame::Read { receiver_id } => {
                match db::mark_conversation_read(&self.pool, self.user_id, receiver_id).await {
                    Ok(marked) => tracing::debug!(
                        "[Session] User {} read {} messages from {}",
                        self.user_id,
                        marked,
                        receiver_id
                    ),
                    Err(e) => tracing::error!(
                        "[Session] Failed to mark conversation {} -> {} read: {}",
                        self.user_id,
                        receiver_id,
                        e
                    ),
                }
            }
        }
    }
}

/// Read frames until the peer goes away or stays silent too long
pub async fn read_pump<S>(mut stream: S, ctx: SessionContext) -> ReadOutcome
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let message = match tokio::time::timeout(ctx.read_timeout, stream.next()).await {
            Err(_) => {
                tracing::info!(
                    "[Session] User {} idle for {:?}, closing",
                    ctx.user_id,
                    ctx.read_timeout
                );
                return ReadOutcome::IdleTimeout;
            }
            Ok(None) => return ReadOutcome::Closed,
            Ok(Some(Err(e))) => {
                tracing::debug!("[Session] Read error for user {}: {}", ctx.user_id, e);
                return ReadOutcome::TransportError;
            }
            Ok(Some(Ok(message))) => message,
        };

        match message {
            Message::Text(text) => ctx.handle_text(text.as_str()).await,
            Message::Close(_) => return ReadOutcome::Closed,
            Message::Binary(_) => {
                tracing::warn!("[Session] Ignoring binary frame from user {}", ctx.user_id);
            }
            // Pings are answered by the transport; both still count as activity
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
}

async fn send_with_deadline<K>(sink: &mut K, message: Message, deadline: Duration) -> Result<(), String>
where
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    match tokio::time::timeout(deadline, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("write timed out after {:?}", deadline)),
    }
}

/// Write queued frames and keep the connection alive with pings
pub async fn write_pump<K>(
    mut sink: K,
    mut outbound: mpsc::Receiver<String>,
    config: SessionConfig,
) -> WriteOutcome
where
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    let ping_period = config.ping_period();
    let write_timeout = config.write_timeout();
    let mut ping = tokio::time::interval_at(Instant::now() + ping_period, ping_period);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            payload = outbound.recv() => match payload {
                Some(text) => {
                    if let Err(e) = send_with_deadline(&mut sink, Message::Text(text.into()), write_timeout).await {
                        tracing::debug!("[Session] Write failed: {}", e);
                        return WriteOutcome::WriteFailed;
                    }
                    ping.reset();
                }
                None => {
                    if let Err(e) = send_with_deadline(&mut sink, Message::Close(None), write_timeout).await {
                        tracing::debug!("[Session] Close frame not sent: {}", e);
                    }
                    return WriteOutcome::QueueClosed;
                }
            },
            _ = ping.tick() => {
                if let Err(e) = send_with_deadline(&mut sink, Message::Ping(Bytes::new()), write_timeout).await {
                    tracing::debug!("[Session] Ping failed: {}", e);
                    return WriteOutcome::WriteFailed;
                }
            }
        }
    }
}

/// Drive an upgraded connection until either side ends it
pub async fn run_session(
    socket: WebSocket,
    pool: SqlitePool,
    hub: Hub,
    config: SessionConfig,
    user: AuthenticatedUser,
) {
    let registration = match hub.register(user.user_id).await {
        Ok(registration) => registration,
        Err(e) => {
            tracing::error!("[Session] Could not register user {}: {}", user.user_id, e);
            return;
        }
    };
    let connection_id = registration.connection_id;
    tracing::info!(
        "[Session] {} (user {}) connected as connection {}",
        user.username,
        user.user_id,
        connection_id
    );

    let (sink, stream) = socket.split();
    let ctx = SessionContext {
        user_id: user.user_id,
        pool,
        hub: hub.clone(),
        read_timeout: config.read_timeout(),
    };

    let mut writer = tokio::spawn(write_pump(sink, registration.outbound, config));
    let mut reader = tokio::spawn(read_pump(stream, ctx));

    tokio::select! {
        outcome = &mut reader => {
            tracing::debug!("[Session] Reader for connection {} ended: {:?}", connection_id, outcome);
            hub.unregister(user.user_id, connection_id).await;
            // Unregister closes the queue, which lets the writer send its close frame
            if tokio::time::timeout(config.write_timeout(), &mut writer).await.is_err() {
                writer.abort();
            }
        }
        outcome = &mut writer => {
            tracing::debug!("[Session] Writer for connection {} ended: {:?}", connection_id, outcome);
            reader.abort();
            hub.unregister(user.user_id, connection_id).await;
        }
    }

    tracing::info!("[Session] Connection {} for user {} closed", connection_id, user.user_id);
}
