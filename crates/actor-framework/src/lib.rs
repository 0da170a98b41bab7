//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent actor systems. Each resource type
//! (a delivery, a delivery partner, …) is owned by exactly one
//! [`ResourceActor`] running in its own Tokio task; everything else talks to it
//! through a cloneable [`ResourceClient`].
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain model and business rules
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing, the store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests
//!
//! Business logic is written once in the entity's hooks; the actor handles
//! message passing, ID generation and error wrapping.
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Parcel {
//!     id: u32,
//!     order_ref: String,
//!     delivered: bool,
//! }
//!
//! #[derive(Debug)] struct ParcelCreate { order_ref: String }
//! #[derive(Debug)] struct ParcelUpdate { delivered: Option<bool> }
//! #[derive(Debug)] enum ParcelAction { Describe }
//! #[derive(Debug, thiserror::Error)] #[error("parcel error")] struct ParcelError;
//!
//! #[async_trait]
//! impl ActorEntity for Parcel {
//!     type Id = u32;
//!     type Create = ParcelCreate;
//!     type Update = ParcelUpdate;
//!     type Action = ParcelAction;
//!     type ActionResult = String;
//!     type Context = ();
//!     type Error = ParcelError;
//!
//!     fn from_create_params(id: u32, params: ParcelCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, order_ref: params.order_ref, delivered: false })
//!     }
//!
//!     // One parcel per order.
//!     fn conflicts_with(&self, existing: &Self) -> bool {
//!         self.order_ref == existing.order_ref
//!     }
//!
//!     async fn on_update(&mut self, update: ParcelUpdate, _ctx: &()) -> Result<(), Self::Error> {
//!         if let Some(delivered) = update.delivered { self.delivered = delivered; }
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: ParcelAction, _ctx: &()) -> Result<String, Self::Error> {
//!         match action {
//!             ParcelAction::Describe => Ok(format!("{} ({})", self.order_ref, self.delivered)),
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Parcel>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(ParcelCreate { order_ref: "ORD-1".into() }).await.unwrap();
//!     assert!(client.create(ParcelCreate { order_ref: "ORD-1".into() }).await.is_err());
//!
//!     client.update(id, ParcelUpdate { delivered: Some(true) }).await.unwrap();
//!     let text = client.perform_action(id, ParcelAction::Describe).await.unwrap();
//!     assert_eq!(text, "ORD-1 (true)");
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies are handed to an actor at `run()` time, not at construction.
//! All actors are created first, then each is started with the clients it
//! needs, e.g. `delivery_actor.run(partner_client)`. This late binding keeps
//! the construction order free of cycles.
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** within an actor
//! - Different actors run in parallel and share nothing but channels
//!
//! ## Testing
//!
//! [`mock::MockClient`] hands out a real `ResourceClient<T>` answered from
//! scripted expectations, so code that depends on another actor can be tested
//! without spawning it.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Predicate, ResourceRequest, Response};
