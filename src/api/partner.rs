//! Partner routes under `/api/partners`.

use super::{error::ApiError, AppState};
use crate::geo::Coordinate;
use crate::model::{PartnerCreate, PartnerId, PartnerPerformance, PartnerStatus};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct NearQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl NearQuery {
    fn point(&self) -> Result<Option<Coordinate>, ApiError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng).validate()?)),
            (None, None) => Ok(None),
            _ => Err(ApiError::BadRequest(
                "lat and lng must be given together".into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PartnerStatusBody {
    pub status: PartnerStatus,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<PartnerCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(params) = payload?;
    let partner = state.partners.register(params).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "partner": partner })),
    ))
}

/// Available partners near `?lat=&lng=`, nearest first.
pub async fn available(
    State(state): State<AppState>,
    query: Result<Query<NearQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let partners = state.partners.available_near(query.point()?).await?;
    Ok(Json(json!({
        "success": true,
        "count": partners.len(),
        "partners": partners,
    })))
}

pub async fn get_partner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id: PartnerId = id.parse()?;
    let partner = state.partners.fetch(id).await?;
    Ok(Json(json!({ "success": true, "partner": partner })))
}

pub async fn performance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id: PartnerId = id.parse()?;
    let partner = state.partners.fetch(id).await?;
    let history = state.deliveries.for_partner(id).await?;
    let performance = PartnerPerformance::from_history(&partner, &history);
    Ok(Json(json!({ "success": true, "performance": performance })))
}

pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Coordinate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id: PartnerId = id.parse()?;
    let Json(location) = payload?;
    let partner = state
        .partners
        .update_location(id, location.validate()?)
        .await?;
    Ok(Json(json!({ "success": true, "partner": partner })))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PartnerStatusBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id: PartnerId = id.parse()?;
    let Json(PartnerStatusBody { status }) = payload?;
    let partner = state.partners.set_status(id, status).await?;
    Ok(Json(json!({ "success": true, "partner": partner })))
}
