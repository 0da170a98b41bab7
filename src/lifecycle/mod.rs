//! # System Lifecycle & Orchestration
//!
//! Starts the actors, wires them together and shuts them down again.
//!
//! ## Wiring
//!
//! ```text
//!   partner actor  <── PartnerClient ──  delivery actor
//!        ^                                    ^
//!        └──────── api handlers ──────────────┘
//!                      │
//!                      v
//!                 relay actor  <── websocket sessions
//! ```
//!
//! Actors are created first and receive their dependencies at `run()` time:
//! the delivery actor gets a `PartnerClient` as its context. The graph is
//! acyclic, so dropping the clients is enough to stop the resource actors.
//! The relay is different: every open WebSocket session holds a
//! `RelayClient`, so it is stopped with an explicit `Shutdown` request, which
//! in turn ends those sessions.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the global subscriber. See [`tracing`](self::tracing) for the
//! fields the actors log.

pub mod tracing;
pub mod tracking_system;

pub use self::tracing::*;
pub use tracking_system::*;
