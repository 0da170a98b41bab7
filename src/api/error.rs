use crate::delivery_actor::DeliveryError;
use crate::geo::GeoError;
use crate::model::InvalidId;
use crate::partner_actor::PartnerError;
use crate::relay::RelayError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `{error, message}` body every failed request and socket event carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    NotFound { error: &'static str, message: String },

    #[error("{0}")]
    Conflict(String),

    #[error("Service unavailable, try again later")]
    Unavailable,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let error = match self {
            ApiError::BadRequest(_) => "Invalid request",
            ApiError::NotFound { error, .. } => *error,
            ApiError::Conflict(_) => "Conflict",
            ApiError::Unavailable => "Service unavailable",
            ApiError::Internal(_) => "Internal server error",
        };
        ErrorBody {
            error: error.to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(message) = &self {
            tracing::error!(%message, "Request failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<DeliveryError> for ApiError {
    fn from(e: DeliveryError) -> Self {
        let message = e.to_string();
        match e {
            DeliveryError::NotFound(_) | DeliveryError::LocationUnknown(_) => ApiError::NotFound {
                error: "Delivery not found",
                message,
            },
            DeliveryError::DestinationUnknown(_) => ApiError::NotFound {
                error: "Destination not found",
                message,
            },
            DeliveryError::Validation(_) | DeliveryError::InvalidLocation(_) => {
                ApiError::BadRequest(message)
            }
            DeliveryError::AlreadyAssigned(_)
            | DeliveryError::NoPartnerAvailable
            | DeliveryError::InvalidTransition { .. }
            | DeliveryError::Closed(_)
            | DeliveryError::StaleLocation { .. } => ApiError::Conflict(message),
            DeliveryError::Partner(e) => e.into(),
            DeliveryError::Unavailable => ApiError::Unavailable,
            DeliveryError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<PartnerError> for ApiError {
    fn from(e: PartnerError) -> Self {
        let message = e.to_string();
        match e {
            PartnerError::NotFound(_) => ApiError::NotFound {
                error: "Partner not found",
                message,
            },
            PartnerError::Validation(_) | PartnerError::InvalidLocation(_) => {
                ApiError::BadRequest(message)
            }
            PartnerError::DuplicatePhone(_)
            | PartnerError::NotAvailable { .. }
            | PartnerError::InvalidStatusChange { .. } => ApiError::Conflict(message),
            PartnerError::Unavailable => ApiError::Unavailable,
            PartnerError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::Stale { .. } => ApiError::Conflict(e.to_string()),
            RelayError::Unavailable => ApiError::Unavailable,
        }
    }
}

impl From<GeoError> for ApiError {
    fn from(e: GeoError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<InvalidId> for ApiError {
    fn from(e: InvalidId) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
