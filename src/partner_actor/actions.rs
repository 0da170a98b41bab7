//! Custom actions for the Delivery Partner actor.
//!
//! Claim and release are the only way a partner enters or leaves `Busy`, so
//! two deliveries can never hold the same partner. Both return the partner's
//! state after the action.

use crate::model::DeliveryOutcome;

#[derive(Debug, Clone)]
pub enum PartnerAction {
    /// Marks an available partner busy.
    ///
    /// # Errors
    /// Fails with `NotAvailable` if the partner is busy or offline.
    Claim,
    /// Frees a busy partner and records how the delivery ended.
    Release(DeliveryOutcome),
}
