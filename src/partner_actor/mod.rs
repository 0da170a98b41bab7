//! # Delivery Partner Actor
//!
//! Owns every registered [`DeliveryPartner`]: where they are, whether they can
//! take a job, and how many deliveries they have completed.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`DeliveryPartner`]
//! - [`error`] - [`PartnerError`] type for type-safe error handling
//! - [`actions`] - [`PartnerAction`] (claim / release)
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use kisansetu_tracking::geo::Coordinate;
//! use kisansetu_tracking::model::{PartnerCreate, VehicleType};
//! use kisansetu_tracking::partner_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = partner_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     let partner = client
//!         .register(PartnerCreate {
//!             name: "Ravi".into(),
//!             phone: "9800000001".into(),
//!             vehicle: VehicleType::Bike,
//!             location: Coordinate::new(22.7196, 75.8577),
//!             service_area: None,
//!         })
//!         .await?;
//!     let nearby = client.available_near(Some(Coordinate::new(22.75, 75.9))).await?;
//!     assert_eq!(nearby[0].partner.id, partner.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **No dependencies**: Context = ()
//! - **Unique phone numbers**: a second registration with the same phone is a conflict
//! - **Exclusive claims**: `Busy` only through [`PartnerAction::Claim`]

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::PartnerClient;
use crate::model::DeliveryPartner;
use actor_framework::ResourceActor;

/// Creates a new Delivery Partner actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<DeliveryPartner>, PartnerClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, PartnerClient::new(generic_client))
}
