//! # Partner Client
//!
//! Provides a high‑level API for interacting with the `DeliveryPartner` actor.
//! It wraps a `ResourceClient<DeliveryPartner>` and exposes domain‑specific methods.
use crate::geo::{round2, Coordinate};
use crate::model::{
    DeliveryOutcome, DeliveryPartner, NearbyPartner, PartnerCreate, PartnerId, PartnerStatus,
    PartnerUpdate,
};
use crate::partner_actor::{PartnerAction, PartnerError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Client for interacting with the Delivery Partner actor.
#[derive(Clone)]
pub struct PartnerClient {
    inner: ResourceClient<DeliveryPartner>,
}

#[async_trait]
impl ActorClient<DeliveryPartner> for PartnerClient {
    type Error = PartnerError;

    fn inner(&self) -> &ResourceClient<DeliveryPartner> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        if let Some(err) = e.entity_error::<PartnerError>() {
            return err.clone();
        }
        match e {
            FrameworkError::NotFound(id) => PartnerError::NotFound(id),
            FrameworkError::Conflict(existing) => PartnerError::DuplicatePhone(existing),
            e if e.is_unavailable() => PartnerError::Unavailable,
            e => PartnerError::ActorCommunicationError(e.to_string()),
        }
    }
}

impl PartnerClient {
    pub fn new(inner: ResourceClient<DeliveryPartner>) -> Self {
        Self { inner }
    }

    /// Registers a partner and returns the stored record.
    #[instrument(skip(self))]
    pub async fn register(&self, params: PartnerCreate) -> Result<DeliveryPartner, PartnerError> {
        debug!("Sending request");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        self.fetch(id).await
    }

    /// Like `get`, but a missing partner is an error.
    #[instrument(skip(self))]
    pub async fn fetch(&self, id: PartnerId) -> Result<DeliveryPartner, PartnerError> {
        self.get(id)
            .await?
            .ok_or_else(|| PartnerError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_location(
        &self,
        id: PartnerId,
        location: Coordinate,
    ) -> Result<DeliveryPartner, PartnerError> {
        let update = PartnerUpdate {
            location: Some(location),
            ..Default::default()
        };
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Sets availability. Busy cannot be entered or left this way.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: PartnerId,
        status: PartnerStatus,
    ) -> Result<DeliveryPartner, PartnerError> {
        let update = PartnerUpdate {
            status: Some(status),
            ..Default::default()
        };
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Marks an available partner busy.
    #[instrument(skip(self))]
    pub async fn claim(&self, id: PartnerId) -> Result<DeliveryPartner, PartnerError> {
        debug!("Claiming partner");
        self.inner
            .perform_action(id, PartnerAction::Claim)
            .await
            .map_err(Self::map_error)
    }

    /// Frees a partner after a delivery ends and records the outcome.
    #[instrument(skip(self))]
    pub async fn release(
        &self,
        id: PartnerId,
        outcome: DeliveryOutcome,
    ) -> Result<DeliveryPartner, PartnerError> {
        debug!("Releasing partner");
        self.inner
            .perform_action(id, PartnerAction::Release(outcome))
            .await
            .map_err(Self::map_error)
    }

    /// Available partners whose service radius covers `point`, nearest first.
    ///
    /// Without a point every available partner is returned, ordered by ID.
    #[instrument(skip(self))]
    pub async fn available_near(
        &self,
        point: Option<Coordinate>,
    ) -> Result<Vec<NearbyPartner>, PartnerError> {
        let partners = self
            .inner
            .find(move |p: &DeliveryPartner| {
                p.is_available() && point.map_or(true, |point| p.serves(point))
            })
            .await
            .map_err(Self::map_error)?;

        let mut ranked: Vec<(f64, DeliveryPartner)> = partners
            .into_iter()
            .map(|p| (point.map_or(0.0, |point| p.location.distance_km(&point)), p))
            .collect();
        ranked.sort_by(|(da, a), (db, b)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        debug!(count = ranked.len(), "Available partners");

        Ok(ranked
            .into_iter()
            .map(|(distance, partner)| NearbyPartner {
                partner,
                distance_km: point.map(|_| round2(distance)),
            })
            .collect())
    }
}
