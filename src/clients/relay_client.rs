//! # Relay Client
//!
//! Handle for the location relay. Mirrors `ResourceClient`: every call is a
//! request over the relay's channel answered on a oneshot.
use crate::model::{DeliveryId, DeliveryLocationUpdate};
use crate::relay::{RelayError, RelayRequest, RelayStats};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct RelayClient {
    sender: mpsc::Sender<RelayRequest>,
}

impl RelayClient {
    pub fn new(sender: mpsc::Sender<RelayRequest>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> RelayRequest,
    ) -> Result<R, RelayError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| RelayError::Unavailable)?;
        response.await.map_err(|_| RelayError::Unavailable)
    }

    /// Joins the room for `delivery_id`. Dropping the receiver leaves it.
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        delivery_id: DeliveryId,
    ) -> Result<broadcast::Receiver<DeliveryLocationUpdate>, RelayError> {
        self.request(|respond_to| RelayRequest::Join {
            delivery_id,
            respond_to,
        })
        .await
    }

    /// Broadcasts to the update's room and returns how many watchers got it.
    #[instrument(skip(self))]
    pub async fn publish(&self, update: DeliveryLocationUpdate) -> Result<usize, RelayError> {
        debug!("Sending request");
        self.request(|respond_to| RelayRequest::Publish { update, respond_to })
            .await?
    }

    pub async fn subscribe_chat(&self) -> Result<broadcast::Receiver<serde_json::Value>, RelayError> {
        self.request(|respond_to| RelayRequest::SubscribeChat { respond_to })
            .await
    }

    /// Relays `message` verbatim to every chat subscriber.
    #[instrument(skip(self))]
    pub async fn send_chat(&self, message: serde_json::Value) -> Result<usize, RelayError> {
        self.request(|respond_to| RelayRequest::SendChat {
            message,
            respond_to,
        })
        .await
    }

    pub async fn stats(&self) -> Result<RelayStats, RelayError> {
        self.request(|respond_to| RelayRequest::Stats { respond_to })
            .await
    }

    /// Asks the relay to stop. Open subscriptions end once it does.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(RelayRequest::Shutdown).await;
    }
}
