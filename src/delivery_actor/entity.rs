//! ActorEntity trait implementation for the Delivery domain type.
//!
//! The Delivery actor depends on the partner actor: creating a delivery claims
//! a partner, and closing one releases it. Both happen inside the hooks, so a
//! delivery and its partner never disagree about who is busy.
//!
//! See the trait implementation on [`Delivery`] for method documentation.

use super::actions::{DeliveryAction, DeliveryActionResult};
use super::error::DeliveryError;
use crate::clients::PartnerClient;
use crate::geo::{Coordinate, EtaEstimate};
use crate::model::{
    clamp_to_now, Delivery, DeliveryCreate, DeliveryId, DeliveryOutcome, DeliveryPartner, DeliveryStatus,
    LocationReport, TrackedLocation,
};
use crate::partner_actor::PartnerError;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

#[async_trait]
impl ActorEntity for Delivery {
    type Id = DeliveryId;
    type Create = DeliveryCreate;
    type Update = LocationReport;
    type Action = DeliveryAction;
    type ActionResult = DeliveryActionResult;
    type Context = PartnerClient;
    type Error = DeliveryError;

    fn from_create_params(id: DeliveryId, params: DeliveryCreate) -> Result<Self, Self::Error> {
        let order_id = params.order_id.trim();
        if order_id.is_empty() {
            return Err(DeliveryError::Validation("orderId is required".into()));
        }
        let destination = params.destination.map(Coordinate::validate).transpose()?;
        Ok(Self::new(id, order_id, params.partner_id, destination))
    }

    /// An order has at most one live delivery; a cancelled one may be replaced.
    fn conflicts_with(&self, existing: &Self) -> bool {
        self.order_id == existing.order_id && existing.status != DeliveryStatus::Cancelled
    }

    /// Claims the requested partner, or the nearest available one, and starts
    /// tracking from the partner's position.
    async fn on_create(&mut self, partners: &PartnerClient) -> Result<(), Self::Error> {
        let partner = match self.partner_id {
            Some(id) => partners.claim(id).await?,
            None => claim_nearest(partners, self.destination).await?,
        };
        info!(delivery_id = %self.id, partner_id = %partner.id, "Partner claimed");

        self.partner_id = Some(partner.id);
        self.current_location = Some(TrackedLocation::new(
            partner.location,
            DeliveryStatus::Assigned,
            self.assigned_at,
        ));
        Ok(())
    }

    /// Overwrites the current location with a newer report.
    async fn on_update(
        &mut self,
        report: LocationReport,
        partners: &PartnerClient,
    ) -> Result<(), Self::Error> {
        let position = report.position.validate()?;
        let recorded_at = clamp_to_now(report.recorded_at);
        if self.status.is_terminal() {
            return Err(DeliveryError::Closed(self.status));
        }
        if let Some(current) = &self.current_location {
            if recorded_at < current.recorded_at {
                return Err(DeliveryError::StaleLocation {
                    stored: current.recorded_at,
                    received: recorded_at,
                });
            }
        }

        self.transition(report.status, partners).await?;
        self.current_location = Some(TrackedLocation::new(
            position,
            report.status,
            recorded_at,
        ));
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: DeliveryAction,
        partners: &PartnerClient,
    ) -> Result<DeliveryActionResult, Self::Error> {
        match action {
            DeliveryAction::AdvanceStatus(next) => {
                self.transition(next, partners).await?;
                // The broadcast must not be older than live updates already relayed.
                if let Some(location) = self.current_location.as_mut() {
                    location.status = next;
                    location.recorded_at = self.updated_at;
                }
                Ok(DeliveryActionResult::AdvanceStatus(self.clone()))
            }
            DeliveryAction::Eta { speed_kmph } => {
                let current = self
                    .current_location
                    .ok_or_else(|| DeliveryError::LocationUnknown(self.id.to_string()))?;
                let destination = self
                    .destination
                    .ok_or_else(|| DeliveryError::DestinationUnknown(self.id.to_string()))?;
                Ok(DeliveryActionResult::Eta(EtaEstimate::between(
                    current.position(),
                    destination,
                    speed_kmph,
                )))
            }
        }
    }
}

impl Delivery {
    /// Applies a status change, releasing the partner when the delivery closes.
    ///
    /// The partner is released before the status flips, so a failed release
    /// leaves the delivery as it was.
    async fn transition(
        &mut self,
        next: DeliveryStatus,
        partners: &PartnerClient,
    ) -> Result<(), DeliveryError> {
        if !self.status.can_transition_to(next) {
            return Err(DeliveryError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        if next == self.status {
            return Ok(());
        }

        let outcome = match next {
            DeliveryStatus::Delivered => Some(DeliveryOutcome::Delivered),
            DeliveryStatus::Cancelled => Some(DeliveryOutcome::Cancelled),
            DeliveryStatus::Assigned | DeliveryStatus::InTransit => None,
        };
        if let (Some(outcome), Some(partner_id)) = (outcome, self.partner_id) {
            partners.release(partner_id, outcome).await?;
        }

        let now = Utc::now();
        match next {
            DeliveryStatus::InTransit => {
                self.picked_up_at.get_or_insert(now);
            }
            DeliveryStatus::Delivered => self.delivered_at = Some(now),
            DeliveryStatus::Assigned | DeliveryStatus::Cancelled => {}
        }

        debug!(delivery_id = %self.id, from = %self.status, to = %next, "Status changed");
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

/// Claims the closest available partner serving `destination`, skipping any
/// that got taken between the search and the claim.
async fn claim_nearest(
    partners: &PartnerClient,
    destination: Option<Coordinate>,
) -> Result<DeliveryPartner, DeliveryError> {
    for candidate in partners.available_near(destination).await? {
        match partners.claim(candidate.partner.id).await {
            Ok(partner) => return Ok(partner),
            Err(PartnerError::NotAvailable { id, .. }) => {
                debug!(partner_id = %id, "Candidate taken, trying next");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(DeliveryError::NoPartnerAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PartnerId;

    #[test]
    fn blank_order_id_is_rejected() {
        let params = DeliveryCreate {
            order_id: "   ".into(),
            partner_id: None,
            destination: None,
        };
        assert!(matches!(
            Delivery::from_create_params(DeliveryId(1), params),
            Err(DeliveryError::Validation(_))
        ));
    }

    #[test]
    fn destination_is_validated() {
        let params = DeliveryCreate {
            order_id: "ORD-1".into(),
            partner_id: Some(PartnerId(1)),
            destination: Some(Coordinate::new(10.0, 200.0)),
        };
        assert!(matches!(
            Delivery::from_create_params(DeliveryId(1), params),
            Err(DeliveryError::InvalidLocation(_))
        ));
    }

    #[test]
    fn cancelled_deliveries_free_the_order() {
        let first = Delivery::new(DeliveryId(1), "ORD-1", Some(PartnerId(1)), None);
        let retry = Delivery::new(DeliveryId(2), "ORD-1", None, None);
        assert!(retry.conflicts_with(&first));

        let cancelled = Delivery {
            status: DeliveryStatus::Cancelled,
            ..first
        };
        assert!(!retry.conflicts_with(&cancelled));
        assert!(!Delivery::new(DeliveryId(3), "ORD-2", None, None).conflicts_with(&retry));
    }
}
