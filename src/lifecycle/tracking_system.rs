use crate::clients::{DeliveryClient, PartnerClient, RelayClient};
use crate::{delivery_actor, partner_actor, relay};
use tracing::{error, info};

/// Channel sizes for the actors the system starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    /// Requests queued per actor before callers wait.
    pub actor_buffer: usize,
    /// Updates a room buffers for its slowest watcher.
    pub room_capacity: usize,
    /// Chat messages buffered for the slowest subscriber.
    pub chat_capacity: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            actor_buffer: 32,
            room_capacity: 64,
            chat_capacity: 256,
        }
    }
}

/// The runtime orchestrator for delivery tracking.
///
/// `TrackingSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping every actor
/// - **Dependency Wiring**: the Delivery actor runs with a `PartnerClient` context
///
/// # Example
///
/// ```rust
/// use kisansetu_tracking::lifecycle::{SystemConfig, TrackingSystem};
///
/// #[tokio::main]
/// async fn main() {
///     let system = TrackingSystem::new(SystemConfig::default());
///     let stats = system.relay_client.stats().await.unwrap();
///     assert_eq!(stats.rooms, 0);
///     system.shutdown().await.unwrap();
/// }
/// ```
pub struct TrackingSystem {
    /// Client for interacting with the Delivery actor
    pub delivery_client: DeliveryClient,

    /// Client for interacting with the Delivery Partner actor
    pub partner_client: PartnerClient,

    /// Client for the location relay
    pub relay_client: RelayClient,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl TrackingSystem {
    /// Creates the actors and spawns each in its own Tokio task.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: SystemConfig) -> Self {
        // 1. Create actors (no dependencies)
        let (partner_actor, partner_client) = partner_actor::new(config.actor_buffer);
        let (delivery_actor, delivery_client) = delivery_actor::new(config.actor_buffer);
        let (relay_actor, relay_client) = relay::new(
            config.actor_buffer,
            config.room_capacity,
            config.chat_capacity,
        );

        // 2. Start actors with injected context
        let partner_handle = tokio::spawn(partner_actor.run(()));
        let delivery_handle = tokio::spawn(delivery_actor.run(partner_client.clone()));
        let relay_handle = tokio::spawn(relay_actor.run());

        info!(?config, "Tracking system started");
        Self {
            delivery_client,
            partner_client,
            relay_client,
            handles: vec![delivery_handle, partner_handle, relay_handle],
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Stops the relay explicitly, drops the resource clients so their actors
    /// see a closed channel, then waits for every task. Any other clone of a
    /// `DeliveryClient` or `PartnerClient` still alive (e.g. inside the HTTP
    /// router) keeps its actor running, so drop those first.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all actors shut down cleanly
    /// - `Err(String)` if any actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down tracking system...");

        self.relay_client.shutdown().await;
        drop(self.relay_client);
        drop(self.delivery_client);
        // The Delivery actor's context holds the last PartnerClient clone; the
        // partner actor stops once the Delivery actor has.
        drop(self.partner_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Tracking system shutdown complete.");
        Ok(())
    }
}
