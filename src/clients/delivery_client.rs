//! # Delivery Client
//!
//! Provides a high‑level API for interacting with the `Delivery` actor.
//! It wraps a `ResourceClient<Delivery>`; partner claiming and releasing
//! happen in the Delivery actor's hooks, not here.
use crate::delivery_actor::{DeliveryAction, DeliveryActionResult, DeliveryError};
use crate::geo::{Coordinate, EtaEstimate};
use crate::model::{Delivery, DeliveryCreate, DeliveryId, DeliveryStatus, LocationReport, PartnerId};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Delivery actor.
#[derive(Clone)]
pub struct DeliveryClient {
    inner: ResourceClient<Delivery>,
}

#[async_trait]
impl ActorClient<Delivery> for DeliveryClient {
    type Error = DeliveryError;

    fn inner(&self) -> &ResourceClient<Delivery> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        if let Some(err) = e.entity_error::<DeliveryError>() {
            return err.clone();
        }
        match e {
            FrameworkError::NotFound(id) => DeliveryError::NotFound(id),
            FrameworkError::Conflict(existing) => DeliveryError::AlreadyAssigned(existing),
            e if e.is_unavailable() => DeliveryError::Unavailable,
            e => DeliveryError::ActorCommunicationError(e.to_string()),
        }
    }
}

impl DeliveryClient {
    pub fn new(inner: ResourceClient<Delivery>) -> Self {
        Self { inner }
    }

    /// Creates a delivery, claiming a partner on the way.
    #[instrument(skip(self))]
    pub async fn assign(&self, params: DeliveryCreate) -> Result<Delivery, DeliveryError> {
        info!("Sending assign to actor");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        self.fetch(id).await
    }

    /// Like `get`, but a missing delivery is an error.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: DeliveryId) -> Result<Delivery, DeliveryError> {
        self.get(id)
            .await?
            .ok_or_else(|| DeliveryError::NotFound(id.to_string()))
    }

    /// Every delivery ever created for `order_id`, oldest first.
    #[instrument(skip(self))]
    pub async fn for_order(&self, order_id: String) -> Result<Vec<Delivery>, DeliveryError> {
        let mut deliveries = self
            .inner
            .find(move |d: &Delivery| d.order_id == order_id)
            .await
            .map_err(Self::map_error)?;
        deliveries.sort_by_key(|d| d.id);
        Ok(deliveries)
    }

    /// Every delivery ever handed to `partner_id`, oldest first.
    #[instrument(skip(self))]
    pub async fn for_partner(&self, partner_id: PartnerId) -> Result<Vec<Delivery>, DeliveryError> {
        let mut deliveries = self
            .inner
            .find(move |d: &Delivery| d.partner_id == Some(partner_id))
            .await
            .map_err(Self::map_error)?;
        deliveries.sort_by_key(|d| d.id);
        Ok(deliveries)
    }

    /// Overwrites the current location. Stale or post-delivery reports are rejected.
    #[instrument(skip(self))]
    pub async fn record_location(
        &self,
        id: DeliveryId,
        report: LocationReport,
    ) -> Result<Delivery, DeliveryError> {
        debug!("Sending request");
        self.inner.update(id, report).await.map_err(Self::map_error)
    }

    /// The last known position of a delivery.
    #[instrument(skip(self))]
    pub async fn location(&self, id: DeliveryId) -> Result<Coordinate, DeliveryError> {
        let delivery = self.fetch(id).await?;
        delivery
            .current_location
            .map(|location| location.position())
            .ok_or_else(|| DeliveryError::LocationUnknown(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn advance_status(
        &self,
        id: DeliveryId,
        status: DeliveryStatus,
    ) -> Result<Delivery, DeliveryError> {
        match self
            .inner
            .perform_action(id, DeliveryAction::AdvanceStatus(status))
            .await
            .map_err(Self::map_error)?
        {
            DeliveryActionResult::AdvanceStatus(delivery) => Ok(delivery),
            other => Err(unexpected(other)),
        }
    }

    /// Minutes until arrival at `speed_kmph` (or the default speed).
    #[instrument(skip(self))]
    pub async fn eta(
        &self,
        id: DeliveryId,
        speed_kmph: Option<f64>,
    ) -> Result<EtaEstimate, DeliveryError> {
        match self
            .inner
            .perform_action(id, DeliveryAction::Eta { speed_kmph })
            .await
            .map_err(Self::map_error)?
        {
            DeliveryActionResult::Eta(estimate) => Ok(estimate),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: DeliveryActionResult) -> DeliveryError {
    DeliveryError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}
