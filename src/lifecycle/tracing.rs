//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by an `EnvFilter` directive (`--log-filter`, falling back to `RUST_LOG`).
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: `Actor started` / `Shutdown` with `entity_type`
//! - **Entity operations**: Create, Get, Update, Delete, Action, Find with `id`
//! - **Client calls**: one span per client method (`#[instrument]`)
//! - **HTTP requests**: method, path and status via `tower-http`'s `TraceLayer`
//! - **Relay**: joins, pruned rooms, stale updates, lagging watchers
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info kisansetu-tracking
//!
//! # Full payloads
//! kisansetu-tracking --log-filter debug
//!
//! # Quiet HTTP, chatty actors
//! RUST_LOG=tower_http=warn,actor_framework=debug,info kisansetu-tracking
//! ```
//!
//! ## Workflow Trace Example
//!
//! Assigning a delivery and reporting its first position, `RUST_LOG=info`:
//!
//! ```text
//! INFO assign: Sending assign to actor
//! INFO Action ok entity_type="DeliveryPartner" id=partner_1
//! INFO Partner claimed delivery_id=delivery_1 partner_id=partner_1
//! INFO Created entity_type="Delivery" id=delivery_1 size=1
//! INFO Updated entity_type="Delivery" id=delivery_1
//! ```
//!
//! The span names (`assign:`) come from the client methods; the actor lines
//! carry `entity_type` instead of a module target.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// An unparsable `filter` falls back to `info` rather than aborting start-up.
pub fn setup_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // Don't show module paths - actors log entity_type instead
        .compact()
        .init();
}
