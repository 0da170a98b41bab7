//! Error types for the location relay.

use crate::model::DeliveryId;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RelayError {
    /// The room already forwarded a newer position.
    #[error("Update for {delivery_id} from {received} is older than the last one from {last}")]
    Stale {
        delivery_id: DeliveryId,
        last: DateTime<Utc>,
        received: DateTime<Utc>,
    },

    /// The relay task has stopped.
    #[error("Location relay unavailable")]
    Unavailable,
}
