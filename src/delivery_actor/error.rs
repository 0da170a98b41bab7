//! Error types for the Delivery actor.

use crate::geo::GeoError;
use crate::model::DeliveryStatus;
use crate::partner_actor::PartnerError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during delivery operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryError {
    /// The requested delivery was not found.
    #[error("Delivery not found: {0}")]
    NotFound(String),

    /// The order already has a live delivery.
    #[error("Delivery already assigned for this order ({0})")]
    AlreadyAssigned(String),

    /// The assignment data is incomplete.
    #[error("Delivery validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    InvalidLocation(#[from] GeoError),

    /// No available partner serves the destination.
    #[error("No delivery partner available")]
    NoPartnerAvailable,

    /// Claiming or releasing the partner failed.
    #[error(transparent)]
    Partner(#[from] PartnerError),

    #[error("Cannot move delivery from {from} to {to}")]
    InvalidTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    /// Delivered and Cancelled deliveries take no more location reports.
    #[error("Delivery is already {0}")]
    Closed(DeliveryStatus),

    #[error("Location from {received} is older than the stored one from {stored}")]
    StaleLocation {
        stored: DateTime<Utc>,
        received: DateTime<Utc>,
    },

    #[error("Delivery location not found: {0}")]
    LocationUnknown(String),

    #[error("Delivery destination not set: {0}")]
    DestinationUnknown(String),

    /// The delivery actor is no longer running.
    #[error("Delivery service unavailable")]
    Unavailable,

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
