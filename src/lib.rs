//! # KisanSetu Delivery Tracking
//!
//! > **Live delivery tracking for farm-to-buyer orders.**
//!
//! Buyers watch their delivery move on a map; partners report their position
//! from the road. This crate assigns deliveries to partners, stores the latest
//! location of each delivery, relays location updates to everyone watching
//! that delivery, and estimates arrival times.
//!
//! ## 🏗️ Design
//!
//! Every piece of mutable state lives inside exactly one actor:
//! - **Deliveries** and **Delivery Partners** are resources managed by the
//!   generic `ResourceActor` from [`actor_framework`].
//! - **Live rooms** are owned by the [`relay`] actor, one bounded broadcast
//!   channel per delivery.
//!
//! Actors talk only through their clients. Assigning a delivery claims its
//! partner from inside the Delivery actor, so two assignments can never race
//! for the same partner.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. Pure logic ([`geo`], [`model`])
//! Haversine distance, the ETA rule and the domain types with their state
//! machines. No I/O.
//!
//! ### 2. The actors ([`delivery_actor`], [`partner_actor`], [`relay`])
//! - **Role**: `ActorEntity` implementations plus the relay's room table.
//! - **Key items**: [`Delivery`](model::Delivery), [`DeliveryPartner`](model::DeliveryPartner),
//!   [`RelayActor`](relay::RelayActor).
//!
//! ### 3. The Interface ([`clients`])
//! Typed wrappers that turn framework errors back into domain errors.
//! - **Key items**: [`DeliveryClient`](clients::DeliveryClient),
//!   [`PartnerClient`](clients::PartnerClient), [`RelayClient`](clients::RelayClient).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! Starts the actors, wires the Delivery actor to the partner pool and shuts
//! everything down in order.
//!
//! ### 5. The outer surface ([`api`], [`config`])
//! REST routes and the `/ws` live-tracking socket on `axum`, configured with
//! `clap` flags or environment variables.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=debug cargo run -- --bind-address 127.0.0.1:5000
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod delivery_actor;
pub mod geo;
pub mod lifecycle;
pub mod model;
pub mod partner_actor;
pub mod relay;
