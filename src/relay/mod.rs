//! # Location Relay
//!
//! Real-time fan-out for live delivery tracking. Every delivery has a *room*;
//! whoever joins it receives that delivery's location updates and nothing
//! else. A single chat channel is shared by all connected clients.
//!
//! The relay keeps no history. A watcher that joins late sees the next
//! update, not the previous ones; the stored location is available from
//! [`DeliveryClient::location`](crate::clients::DeliveryClient::location).
//!
//! ## Ordering
//!
//! Each room remembers the newest timestamp it forwarded. An update carrying
//! an older timestamp is dropped with [`RelayError::Stale`]; an update with no
//! timestamp is stamped on arrival.
//!
//! ## Slow consumers
//!
//! Rooms are bounded broadcast channels. A watcher that falls more than the
//! room capacity behind skips the missed updates and continues from the
//! newest.
//!
//! ```rust
//! use kisansetu_tracking::model::{DeliveryId, DeliveryLocationUpdate, DeliveryStatus};
//! use kisansetu_tracking::relay;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = relay::new(32, 16, 16);
//!     tokio::spawn(actor.run());
//!
//!     let mut watcher = client.join(DeliveryId(1)).await.unwrap();
//!     let update = DeliveryLocationUpdate {
//!         delivery_id: DeliveryId(1),
//!         lat: 22.72,
//!         lng: 75.86,
//!         status: DeliveryStatus::InTransit,
//!         timestamp: None,
//!     };
//!     assert_eq!(client.publish(update).await.unwrap(), 1);
//!     assert!(watcher.recv().await.unwrap().timestamp.is_some());
//! }
//! ```

pub mod actor;
pub mod error;

pub use actor::{RelayActor, RelayRequest, RelayStats};
pub use error::*;

use crate::clients::RelayClient;
use tokio::sync::mpsc;

/// Creates the relay actor and its client.
pub fn new(
    buffer_size: usize,
    room_capacity: usize,
    chat_capacity: usize,
) -> (RelayActor, RelayClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (
        RelayActor::new(receiver, room_capacity, chat_capacity),
        RelayClient::new(sender),
    )
}
