//! # Delivery Actor
//!
//! Owns every [`Delivery`] record: who carries it, where it was last seen and
//! how far along it is.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Delivery`]
//! - [`error`] - [`DeliveryError`] type for type-safe error handling
//! - [`actions`] - [`DeliveryAction`] (status changes, ETA)
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Dependencies
//!
//! `Context = PartnerClient`. The hooks claim a partner on create and release
//! it when the delivery is delivered or cancelled:
//!
//! ```rust,ignore
//! let (partner_actor, partner_client) = partner_actor::new(32);
//! let (delivery_actor, delivery_client) = delivery_actor::new(32);
//! tokio::spawn(partner_actor.run(()));
//! tokio::spawn(delivery_actor.run(partner_client.clone()));
//! ```
//!
//! ## Ordering
//!
//! Location reports carry a timestamp. A report older than the stored location
//! is rejected with [`DeliveryError::StaleLocation`], so out-of-order network
//! delivery cannot move a delivery backwards.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::DeliveryClient;
use crate::model::Delivery;
use actor_framework::ResourceActor;

/// Creates a new Delivery actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Delivery>, DeliveryClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, DeliveryClient::new(generic_client))
}
