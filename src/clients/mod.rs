//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient)
//! and the relay's request channel.
//!
//! Handlers and hooks only ever see these clients; they translate framework
//! errors back into each actor's own error type.

pub mod delivery_client;
pub mod partner_client;
pub mod relay_client;

pub use delivery_client::*;
pub use partner_client::*;
pub use relay_client::*;
