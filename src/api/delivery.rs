//! Delivery routes under `/api/delivery`.

use super::{error::ApiError, AppState};
use crate::clients::RelayClient;
use crate::geo::{Coordinate, EtaEstimate, GeoError};
use crate::model::{
    Delivery, DeliveryCreate, DeliveryId, DeliveryLocationUpdate, DeliveryStatus, LocationReport,
    TrackingView,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Body of `PUT /location/{id}`.
///
/// Accepts the legacy `{location: "lat,lng"}`, a nested
/// `{location: {lat, lng, ...}}` or a flat `{lat, lng, ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LocationBody {
    Wrapped {
        location: LocationPayload,
        #[serde(default)]
        status: Option<DeliveryStatus>,
    },
    Flat(LocationFields),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LocationPayload {
    Legacy(String),
    Fields(LocationFields),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFields {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub status: Option<DeliveryStatus>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LocationBody {
    /// Validates the position and stamps the report, now unless a timestamp was sent.
    pub fn into_report(self) -> Result<LocationReport, GeoError> {
        let (position, status, timestamp) = match self {
            LocationBody::Wrapped {
                location: LocationPayload::Legacy(text),
                status,
            } => (text.parse::<Coordinate>()?, status, None),
            LocationBody::Wrapped {
                location: LocationPayload::Fields(fields),
                status,
            } => (
                Coordinate::new(fields.lat, fields.lng).validate()?,
                fields.status.or(status),
                fields.timestamp,
            ),
            LocationBody::Flat(fields) => (
                Coordinate::new(fields.lat, fields.lng).validate()?,
                fields.status,
                fields.timestamp,
            ),
        };

        let mut report = LocationReport::now(position, status);
        if let Some(timestamp) = timestamp {
            report.recorded_at = timestamp;
        }
        Ok(report)
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: DeliveryStatus,
}

#[derive(Debug, Deserialize)]
pub struct EtaQuery {
    pub speed: Option<f64>,
}

pub async fn assign(
    State(state): State<AppState>,
    payload: Result<Json<DeliveryCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(params) = payload?;
    let delivery = state.deliveries.assign(params).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Delivery assigned successfully",
            "delivery": delivery,
        })),
    ))
}

pub async fn get_delivery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let delivery = state.deliveries.fetch(id.parse()?).await?;
    Ok(Json(json!({ "success": true, "delivery": delivery })))
}

pub async fn for_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deliveries = state.deliveries.for_order(order_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": deliveries.len(),
        "deliveries": deliveries,
    })))
}

/// Records the location, then broadcasts it to the delivery's room.
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LocationBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id: DeliveryId = id.parse()?;
    let Json(body) = payload?;
    let report = body.into_report()?;

    let delivery = state.deliveries.record_location(id, report).await?;
    broadcast_current(&state.relay, &delivery).await;
    Ok(Json(json!({ "success": true, "delivery": delivery })))
}

pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Coordinate>, ApiError> {
    let location = state.deliveries.location(id.parse()?).await?;
    Ok(Json(location))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id: DeliveryId = id.parse()?;
    let Json(StatusBody { status }) = payload?;

    let delivery = state.deliveries.advance_status(id, status).await?;
    broadcast_current(&state.relay, &delivery).await;
    Ok(Json(json!({ "success": true, "delivery": delivery })))
}

pub async fn eta(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<EtaQuery>, QueryRejection>,
) -> Result<Json<EtaEstimate>, ApiError> {
    let id: DeliveryId = id.parse()?;
    let Query(EtaQuery { speed }) = query?;
    let speed = speed.unwrap_or(state.default_speed_kmph);
    Ok(Json(state.deliveries.eta(id, Some(speed)).await?))
}

/// The delivery with its partner's contact details and the live ETA.
pub async fn tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackingView>, ApiError> {
    let delivery = state.deliveries.fetch(id.parse()?).await?;
    let partner = match delivery.partner_id {
        Some(partner_id) => match state.partners.fetch(partner_id).await {
            Ok(partner) => Some(partner),
            Err(e) => {
                warn!(delivery_id = %delivery.id, %partner_id, error = %e, "Partner lookup failed");
                None
            }
        },
        None => None,
    };
    Ok(Json(TrackingView::new(
        &delivery,
        partner.as_ref(),
        Some(state.default_speed_kmph),
    )))
}

/// The record is already saved, so a failed broadcast is logged, not returned.
async fn broadcast_current(relay: &RelayClient, delivery: &Delivery) {
    let Some(location) = &delivery.current_location else {
        return;
    };
    let update = DeliveryLocationUpdate::from_tracked(delivery.id, location);
    match relay.publish(update).await {
        Ok(receivers) => debug!(delivery_id = %delivery.id, receivers, "Location broadcast"),
        Err(e) => warn!(delivery_id = %delivery.id, error = %e, "Location broadcast failed"),
    }
}
