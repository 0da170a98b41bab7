//! # Relay Actor
//!
//! Owns the room table and the chat channel. Like a `ResourceActor`, it
//! handles one request at a time, so the per-room ordering check needs no lock.

use crate::model::{clamp_to_now, DeliveryId, DeliveryLocationUpdate};
use crate::relay::error::RelayError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

/// Requests accepted by the [`RelayActor`].
#[derive(Debug)]
pub enum RelayRequest {
    Join {
        delivery_id: DeliveryId,
        respond_to: oneshot::Sender<broadcast::Receiver<DeliveryLocationUpdate>>,
    },
    Publish {
        update: DeliveryLocationUpdate,
        respond_to: oneshot::Sender<Result<usize, RelayError>>,
    },
    SubscribeChat {
        respond_to: oneshot::Sender<broadcast::Receiver<serde_json::Value>>,
    },
    SendChat {
        message: serde_json::Value,
        respond_to: oneshot::Sender<usize>,
    },
    Stats {
        respond_to: oneshot::Sender<RelayStats>,
    },
    /// Stops the loop even while sessions still hold clients.
    Shutdown,
}

/// Snapshot of the relay's fan-out state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayStats {
    pub rooms: usize,
    pub watchers: usize,
    pub chat_subscribers: usize,
}

struct Room {
    sender: broadcast::Sender<DeliveryLocationUpdate>,
    last_timestamp: Option<DateTime<Utc>>,
}

pub struct RelayActor {
    receiver: mpsc::Receiver<RelayRequest>,
    rooms: HashMap<DeliveryId, Room>,
    chat: broadcast::Sender<serde_json::Value>,
    room_capacity: usize,
}

impl RelayActor {
    pub(crate) fn new(
        receiver: mpsc::Receiver<RelayRequest>,
        room_capacity: usize,
        chat_capacity: usize,
    ) -> Self {
        let (chat, _) = broadcast::channel(chat_capacity.max(1));
        Self {
            receiver,
            rooms: HashMap::new(),
            chat,
            room_capacity: room_capacity.max(1),
        }
    }

    /// Runs until every client is gone or a `Shutdown` arrives.
    ///
    /// Exiting drops every room and the chat sender, which ends all
    /// subscriber streams.
    pub async fn run(mut self) {
        info!("Relay started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RelayRequest::Join {
                    delivery_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.join(delivery_id));
                }
                RelayRequest::Publish { update, respond_to } => {
                    let _ = respond_to.send(self.publish(update));
                }
                RelayRequest::SubscribeChat { respond_to } => {
                    let _ = respond_to.send(self.chat.subscribe());
                }
                RelayRequest::SendChat {
                    message,
                    respond_to,
                } => {
                    // No subscribers is not an error for chat.
                    let receivers = self.chat.send(message).unwrap_or(0);
                    debug!(receivers, "Chat message relayed");
                    let _ = respond_to.send(receivers);
                }
                RelayRequest::Stats { respond_to } => {
                    let _ = respond_to.send(self.stats());
                }
                RelayRequest::Shutdown => break,
            }
        }

        info!(rooms = self.rooms.len(), "Relay shutdown");
    }

    fn join(&mut self, delivery_id: DeliveryId) -> broadcast::Receiver<DeliveryLocationUpdate> {
        self.prune();
        let capacity = self.room_capacity;
        let room = self.rooms.entry(delivery_id).or_insert_with(|| Room {
            sender: broadcast::channel(capacity).0,
            last_timestamp: None,
        });
        let receiver = room.sender.subscribe();
        info!(%delivery_id, watchers = room.sender.receiver_count(), "Joined room");
        receiver
    }

    fn publish(&mut self, mut update: DeliveryLocationUpdate) -> Result<usize, RelayError> {
        let delivery_id = update.delivery_id;
        let received = clamp_to_now(update.timestamp.unwrap_or_else(Utc::now));
        update.timestamp = Some(received);

        let Some(room) = self.rooms.get_mut(&delivery_id) else {
            debug!(%delivery_id, "No watchers");
            return Ok(0);
        };
        if let Some(last) = room.last_timestamp {
            if received < last {
                warn!(%delivery_id, %last, %received, "Stale update dropped");
                return Err(RelayError::Stale {
                    delivery_id,
                    last,
                    received,
                });
            }
        }
        room.last_timestamp = Some(received);

        match room.sender.send(update) {
            Ok(receivers) => {
                debug!(%delivery_id, receivers, "Update relayed");
                Ok(receivers)
            }
            Err(_) => {
                self.rooms.remove(&delivery_id);
                debug!(%delivery_id, "Room empty, pruned");
                Ok(0)
            }
        }
    }

    fn prune(&mut self) {
        let before = self.rooms.len();
        self.rooms.retain(|_, room| room.sender.receiver_count() > 0);
        let pruned = before - self.rooms.len();
        if pruned > 0 {
            debug!(pruned, "Pruned empty rooms");
        }
    }

    fn stats(&self) -> RelayStats {
        RelayStats {
            rooms: self.rooms.len(),
            watchers: self
                .rooms
                .values()
                .map(|room| room.sender.receiver_count())
                .sum(),
            chat_subscribers: self.chat.receiver_count(),
        }
    }
}
