//! Error types for the Delivery Partner actor.

use crate::geo::GeoError;
use crate::model::{PartnerId, PartnerStatus};
use thiserror::Error;

/// Errors that can occur during partner operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PartnerError {
    /// The requested partner was not found.
    #[error("Partner not found: {0}")]
    NotFound(String),

    /// Registration data is incomplete.
    #[error("Partner validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    InvalidLocation(#[from] GeoError),

    /// Another partner already registered with this phone number.
    #[error("Phone number already registered by {0}")]
    DuplicatePhone(String),

    /// The partner cannot take a delivery right now.
    #[error("Partner {id} is not available (currently {status})")]
    NotAvailable { id: PartnerId, status: PartnerStatus },

    /// Busy is reserved for claim/release.
    #[error("Cannot change partner status from {from} to {to}")]
    InvalidStatusChange {
        from: PartnerStatus,
        to: PartnerStatus,
    },

    /// The partner actor is no longer running.
    #[error("Partner service unavailable")]
    Unavailable,

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
