//! Custom actions for the Delivery actor.
//!
//! Location reports go through the framework's Update; these cover the rest
//! of a delivery's lifecycle. Results match the actions 1:1.

use crate::geo::EtaEstimate;
use crate::model::{Delivery, DeliveryStatus};

#[derive(Debug, Clone)]
pub enum DeliveryAction {
    /// Moves the delivery through the status machine.
    ///
    /// Reaching Delivered or Cancelled releases the partner.
    AdvanceStatus(DeliveryStatus),
    /// Estimates minutes from the current location to the destination.
    Eta { speed_kmph: Option<f64> },
}

#[derive(Debug, Clone)]
pub enum DeliveryActionResult {
    AdvanceStatus(Delivery),
    Eta(EtaEstimate),
}
