//! # HTTP and WebSocket surface
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | POST | `/api/delivery/assign` | [`delivery::assign`] |
//! | GET | `/api/delivery/{id}` | [`delivery::get_delivery`] |
//! | GET | `/api/delivery/order/{order_id}` | [`delivery::for_order`] |
//! | PUT/GET | `/api/delivery/location/{id}` | [`delivery::update_location`], [`delivery::get_location`] |
//! | PUT | `/api/delivery/status/{id}` | [`delivery::update_status`] |
//! | GET | `/api/delivery/eta/{id}` | [`delivery::eta`] |
//! | GET | `/api/delivery/tracking/{id}` | [`delivery::tracking`] |
//! | POST | `/api/partners` | [`partner::register`] |
//! | GET | `/api/partners/available` | [`partner::available`] |
//! | GET | `/api/partners/{id}` | [`partner::get_partner`] |
//! | GET | `/api/partners/{id}/performance` | [`partner::performance`] |
//! | PUT | `/api/partners/{id}/location` | [`partner::update_location`] |
//! | PUT | `/api/partners/{id}/status` | [`partner::update_status`] |
//! | GET | `/ws` | [`socket::upgrade`] |
//! | GET | `/health` | relay stats |

pub mod delivery;
pub mod error;
pub mod partner;
pub mod socket;

use crate::clients::{DeliveryClient, PartnerClient, RelayClient};
use crate::lifecycle::TrackingSystem;
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ErrorBody};

#[derive(Clone)]
pub struct AppState {
    pub deliveries: DeliveryClient,
    pub partners: PartnerClient,
    pub relay: RelayClient,
    pub default_speed_kmph: f64,
}

impl AppState {
    pub fn new(system: &TrackingSystem, default_speed_kmph: f64) -> Self {
        Self {
            deliveries: system.delivery_client.clone(),
            partners: system.partner_client.clone(),
            relay: system.relay_client.clone(),
            default_speed_kmph,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/delivery/assign", post(delivery::assign))
        .route("/api/delivery/order/{order_id}", get(delivery::for_order))
        .route(
            "/api/delivery/location/{id}",
            put(delivery::update_location).get(delivery::get_location),
        )
        .route("/api/delivery/status/{id}", put(delivery::update_status))
        .route("/api/delivery/eta/{id}", get(delivery::eta))
        .route("/api/delivery/tracking/{id}", get(delivery::tracking))
        .route("/api/delivery/{id}", get(delivery::get_delivery))
        .route("/api/partners", post(partner::register))
        .route("/api/partners/available", get(partner::available))
        .route("/api/partners/{id}", get(partner::get_partner))
        .route("/api/partners/{id}/performance", get(partner::performance))
        .route("/api/partners/{id}/location", put(partner::update_location))
        .route("/api/partners/{id}/status", put(partner::update_status))
        .route("/ws", get(socket::upgrade))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let relay = state.relay.stats().await?;
    Ok(Json(json!({ "status": "ok", "relay": relay })))
}
