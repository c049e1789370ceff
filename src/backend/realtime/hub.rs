/**
 * Connection Hub
 *
 * The hub owns the registry of online users and fans chat deliveries out to
 * their connections. All registry mutations happen inside one coordinating
 * task; callers talk to it through a bounded command channel.
 *
 * # Delivery Semantics
 *
 * - At most one connection per user. Registering again supersedes the old
 *   connection: its outbound channel is closed and its session winds down.
 * - Each connection has a bounded outbound queue. The hub never waits on it:
 *   a full queue means the client is not keeping up, so the connection is
 *   evicted and its queue closed. Frames already queued are still written.
 * - Offline users are skipped. Nothing is queued for later.
 *
 * # Liveness Queries
 *
 * The registry sits behind a `tokio::sync::RwLock` so `is_online` can be
 * answered from any task without a round trip through the loop. Only the loop
 * takes the write lock.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::backend::messaging::dispatch::ChatDelivery;
use crate::backend::server::config::HubConfig;
use crate::shared::messaging::{OutboundFrame, UserId};

/// Connection ID (unique per WebSocket connection)
pub type ConnectionId = u64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("hub is not running")]
    Stopped,
}

/// Registry entry for one live connection
#[derive(Debug)]
struct ClientSlot {
    connection_id: ConnectionId,
    outbound: mpsc::Sender<String>,
}

/// Handed to a session after it has been registered
#[derive(Debug)]
pub struct Registration {
    pub connection_id: ConnectionId,
    /// Encoded frames to write to the socket; closed on unregister, eviction or supersession
    pub outbound: mpsc::Receiver<String>,
}

#[derive(Debug)]
enum HubCommand {
    Register {
        user_id: UserId,
        slot: ClientSlot,
        ack: oneshot::Sender<()>,
    },
    Unregister {
        user_id: UserId,
        connection_id: ConnectionId,
    },
    Broadcast(ChatDelivery),
    SendToUser {
        user_id: UserId,
        frame: OutboundFrame,
    },
    Snapshot(oneshot::Sender<Vec<UserId>>),
}

/// Handle to the hub task
///
/// Cheap to clone. The task stops once every handle is dropped.
#[derive(Clone, Debug)]
pub struct Hub {
    commands: mpsc::Sender<HubCommand>,
    online: Arc<RwLock<HashMap<UserId, ClientSlot>>>,
    next_connection_id: Arc<AtomicU64>,
    send_buffer: usize,
}

impl Hub {
    /// Spawn the hub task and return a handle to it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: HubConfig) -> Self {
        let (commands, rx) = mpsc::channel(config.command_buffer.max(1));
        let online = Arc::new(RwLock::new(HashMap::new()));

        let hub_loop = HubLoop {
            commands: rx,
            online: Arc::clone(&online),
        };
        tokio::spawn(hub_loop.run());

        tracing::info!(
            "[Hub] Started (send_buffer={}, command_buffer={})",
            config.send_buffer,
            config.command_buffer
        );

        Self {
            commands,
            online,
            next_connection_id: Arc::new(AtomicU64::new(1)),
            send_buffer: config.send_buffer.max(1),
        }
    }

    /// Register a connection for `user_id`
    ///
    /// Returns once the registry has been updated, so a broadcast issued after
    /// this call sees the new connection.
    pub async fn register(&self, user_id: UserId) -> Result<Registration, HubError> {
        let connection_id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
        let (outbound, rx) = mpsc::channel(self.send_buffer);
        let (ack, acked) = oneshot::channel();

        self.send(HubCommand::Register {
            user_id,
            slot: ClientSlot {
                connection_id,
                outbound,
            },
            ack,
        })
        .await?;
        acked.await.map_err(|_| HubError::Stopped)?;

        Ok(Registration {
            connection_id,
            outbound: rx,
        })
    }

    /// Remove the user's entry if it still belongs to `connection_id`
    ///
    /// Idempotent. A superseded session calling this does not affect its
    /// successor.
    pub async fn unregister(&self, user_id: UserId, connection_id: ConnectionId) {
        if self
            .send(HubCommand::Unregister {
                user_id,
                connection_id,
            })
            .await
            .is_err()
        {
            tracing::debug!("[Hub] Unregister after shutdown for user {}", user_id);
        }
    }

    /// Deliver a chat message to the receiver and echo it to the sender
    pub async fn broadcast(&self, delivery: ChatDelivery) {
        if self.send(HubCommand::Broadcast(delivery)).await.is_err() {
            tracing::warn!("[Hub] Broadcast dropped, hub is not running");
        }
    }

    /// Deliver a single frame to one user's connection, if online
    pub async fn send_to_user(&self, user_id: UserId, frame: OutboundFrame) {
        if self
            .send(HubCommand::SendToUser { user_id, frame })
            .await
            .is_err()
        {
            tracing::warn!("[Hub] Frame for user {} dropped, hub is not running", user_id);
        }
    }

    pub async fn is_online(&self, user_id: UserId) -> bool {
        self.online.read().await.contains_key(&user_id)
    }

    pub async fn online_count(&self) -> usize {
        self.online.read().await.len()
    }

    /// Online users as seen by the loop after every earlier command was applied
    pub async fn online_users(&self) -> Result<Vec<UserId>, HubError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Snapshot(reply)).await?;
        rx.await.map_err(|_| HubError::Stopped)
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HubError::Stopped)
    }
}

struct HubLoop {
    commands: mpsc::Receiver<HubCommand>,
    online: Arc<RwLock<HashMap<UserId, ClientSlot>>>,
}

impl HubLoop {
    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                HubCommand::Register { user_id, slot, ack } => {
                    let connection_id = slot.connection_id;
                    let previous = self.online.write().await.insert(user_id, slot);
                    if let Some(previous) = previous {
                        // Dropping the old sender closes the superseded connection's queue
                        tracing::info!(
                            "[Hub] User {} reconnected, closing connection {}",
                            user_id,
                            previous.connection_id
                        );
                    }
                    tracing::debug!("[Hub] User {} registered (connection {})", user_id, connection_id);
                    let _ = ack.send(());
                }
                HubCommand::Unregister {
                    user_id,
                    connection_id,
                } => {
                    let mut online = self.online.write().await;
                    if online
                        .get(&user_id)
                        .is_some_and(|slot| slot.connection_id == connection_id)
                    {
                        online.remove(&user_id);
                        tracing::debug!(
                            "[Hub] User {} unregistered (connection {}, online={})",
                            user_id,
                            connection_id,
                            online.len()
                        );
                    }
                }
                HubCommand::Broadcast(delivery) => self.broadcast(delivery).await,
                HubCommand::SendToUser { user_id, frame } => match frame.encode() {
                    Ok(payload) => self.deliver(user_id, payload).await,
                    Err(e) => tracing::error!("[Hub] Failed to encode frame for user {}: {}", user_id, e),
                },
                HubCommand::Snapshot(reply) => {
                    let mut users: Vec<UserId> = self.online.read().await.keys().copied().collect();
                    users.sort_unstable();
                    let _ = reply.send(users);
                }
            }
        }
        tracing::info!("[Hub] Stopped");
    }

    async fn broadcast(&self, delivery: ChatDelivery) {
        let receiver_id = delivery.message.receiver_id;
        let sender_id = delivery.message.sender_id;

        match delivery.frame_for_receiver().encode() {
            Ok(payload) => self.deliver(receiver_id, payload).await,
            Err(e) => tracing::error!("[Hub] Failed to encode message {}: {}", delivery.message.id, e),
        }
        match delivery.frame_for_sender().encode() {
            Ok(payload) => self.deliver(sender_id, payload).await,
            Err(e) => tracing::error!("[Hub] Failed to encode message {}: {}", delivery.message.id, e),
        }
    }

    /// Non-blocking send; a full or closed queue evicts the connection
    async fn deliver(&self, user_id: UserId, payload: String) {
        let mut online = self.online.write().await;
        let Some(slot) = online.get(&user_id) else {
            tracing::debug!("[Hub] User {} offline, skipping", user_id);
            return;
        };

        match slot.outbound.try_send(payload) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "[Hub] Outbound queue full for user {} (connection {}), evicting",
                    user_id,
                    slot.connection_id
                );
                online.remove(&user_id);
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(
                    "[Hub] Connection {} for user {} already closed",
                    slot.connection_id,
                    user_id
                );
                online.remove(&user_id);
            }
        }
    }
}
