//! ActorEntity trait implementation for the DeliveryPartner domain type.
//!
//! See the trait implementation on [`DeliveryPartner`] for method documentation.

use super::actions::PartnerAction;
use super::error::PartnerError;
use crate::model::{DeliveryPartner, PartnerCreate, PartnerId, PartnerStatus, PartnerUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

#[async_trait]
impl ActorEntity for DeliveryPartner {
    type Id = PartnerId;
    type Create = PartnerCreate;
    type Update = PartnerUpdate;
    type Action = PartnerAction;
    type ActionResult = DeliveryPartner;
    type Context = ();
    type Error = PartnerError;

    /// Validates the registration and builds an available partner.
    fn from_create_params(id: PartnerId, params: PartnerCreate) -> Result<Self, Self::Error> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(PartnerError::Validation("name is required".into()));
        }
        let phone = params.phone.trim();
        if phone.is_empty() {
            return Err(PartnerError::Validation("phone is required".into()));
        }
        let location = params.location.validate()?;
        let service_area = params.service_area.unwrap_or_default();
        if !(service_area.max_distance_km.is_finite() && service_area.max_distance_km > 0.0) {
            return Err(PartnerError::Validation(
                "serviceArea.maxDistanceKm must be positive".into(),
            ));
        }

        Ok(Self::new(
            id,
            name,
            phone,
            params.vehicle,
            location,
            service_area,
        ))
    }

    /// One registration per phone number.
    fn conflicts_with(&self, existing: &Self) -> bool {
        self.phone == existing.phone
    }

    /// Moves the partner or changes availability.
    ///
    /// Everything is validated before anything is applied.
    async fn on_update(&mut self, update: PartnerUpdate, _ctx: &()) -> Result<(), Self::Error> {
        let location = update.location.map(|c| c.validate()).transpose()?;
        if let Some(status) = update.status {
            let touches_busy = status == PartnerStatus::Busy || self.status == PartnerStatus::Busy;
            if status != self.status && touches_busy {
                return Err(PartnerError::InvalidStatusChange {
                    from: self.status,
                    to: status,
                });
            }
        }

        if let Some(location) = location {
            self.location = location;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: PartnerAction,
        _ctx: &(),
    ) -> Result<DeliveryPartner, Self::Error> {
        match action {
            PartnerAction::Claim => {
                if !self.is_available() {
                    return Err(PartnerError::NotAvailable {
                        id: self.id,
                        status: self.status,
                    });
                }
                self.status = PartnerStatus::Busy;
            }
            PartnerAction::Release(outcome) => {
                self.stats.record(outcome);
                // An offline partner stays offline; only busy flips back.
                if self.status == PartnerStatus::Busy {
                    self.status = PartnerStatus::Available;
                }
                debug!(partner_id = %self.id, ?outcome, "Released");
            }
        }
        self.updated_at = Utc::now();
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinate, GeoError};
    use crate::model::{DeliveryOutcome, ServiceArea, VehicleType};

    fn registration() -> PartnerCreate {
        PartnerCreate {
            name: " Ravi ".into(),
            phone: "9800000001".into(),
            vehicle: VehicleType::Bike,
            location: Coordinate::new(22.7196, 75.8577),
            service_area: None,
        }
    }

    fn partner() -> DeliveryPartner {
        DeliveryPartner::from_create_params(PartnerId(1), registration()).unwrap()
    }

    #[test]
    fn registration_trims_and_defaults() {
        let p = partner();
        assert_eq!(p.name, "Ravi");
        assert_eq!(p.status, PartnerStatus::Available);
        assert_eq!(p.service_area, ServiceArea::default());
    }

    #[test]
    fn registration_rejects_bad_input() {
        let blank = PartnerCreate {
            name: "  ".into(),
            ..registration()
        };
        assert!(matches!(
            DeliveryPartner::from_create_params(PartnerId(1), blank),
            Err(PartnerError::Validation(_))
        ));

        let off_map = PartnerCreate {
            location: Coordinate::new(95.0, 0.0),
            ..registration()
        };
        assert_eq!(
            DeliveryPartner::from_create_params(PartnerId(1), off_map).unwrap_err(),
            PartnerError::InvalidLocation(GeoError::InvalidLatitude(95.0))
        );

        let no_radius = PartnerCreate {
            service_area: Some(ServiceArea {
                cities: vec![],
                max_distance_km: 0.0,
            }),
            ..registration()
        };
        assert!(DeliveryPartner::from_create_params(PartnerId(1), no_radius).is_err());
    }

    #[test]
    fn same_phone_conflicts() {
        let other = DeliveryPartner::from_create_params(PartnerId(2), registration()).unwrap();
        assert!(other.conflicts_with(&partner()));
    }

    #[tokio::test]
    async fn claim_then_release_cycles_availability() {
        let mut p = partner();

        let claimed = p.handle_action(PartnerAction::Claim, &()).await.unwrap();
        assert_eq!(claimed.status, PartnerStatus::Busy);

        let err = p.handle_action(PartnerAction::Claim, &()).await.unwrap_err();
        assert_eq!(
            err,
            PartnerError::NotAvailable {
                id: PartnerId(1),
                status: PartnerStatus::Busy
            }
        );

        let released = p
            .handle_action(PartnerAction::Release(DeliveryOutcome::Delivered), &())
            .await
            .unwrap();
        assert_eq!(released.status, PartnerStatus::Available);
        assert_eq!(released.stats.successful_deliveries, 1);
    }

    #[tokio::test]
    async fn busy_cannot_be_set_directly() {
        let mut p = partner();
        let to_busy = PartnerUpdate {
            status: Some(PartnerStatus::Busy),
            ..Default::default()
        };
        assert!(matches!(
            p.on_update(to_busy, &()).await,
            Err(PartnerError::InvalidStatusChange { .. })
        ));

        p.handle_action(PartnerAction::Claim, &()).await.unwrap();
        let go_offline = PartnerUpdate {
            location: Some(Coordinate::new(22.8, 75.9)),
            status: Some(PartnerStatus::Offline),
        };
        assert!(p.on_update(go_offline, &()).await.is_err());
        // Rejected updates leave the location untouched too.
        assert_eq!(p.location, Coordinate::new(22.7196, 75.8577));
    }

    #[tokio::test]
    async fn offline_partner_can_move_and_return() {
        let mut p = partner();
        p.on_update(
            PartnerUpdate {
                status: Some(PartnerStatus::Offline),
                ..Default::default()
            },
            &(),
        )
        .await
        .unwrap();
        assert!(!p.is_available());

        p.on_update(
            PartnerUpdate {
                location: Some(Coordinate::new(23.0, 76.0)),
                status: Some(PartnerStatus::Available),
            },
            &(),
        )
        .await
        .unwrap();
        assert!(p.is_available());
        assert_eq!(p.location, Coordinate::new(23.0, 76.0));
    }
}
