//! Read-only views assembled from a delivery and its partner.

use super::{Delivery, DeliveryId, DeliveryPartner, DeliveryStatus, PartnerId, TrackedLocation, VehicleType};
use crate::geo::{Coordinate, EtaEstimate};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The partner as shown to someone following a delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: PartnerId,
    pub name: String,
    pub phone: String,
    pub vehicle: VehicleType,
    pub location: Coordinate,
}

impl From<&DeliveryPartner> for ProviderInfo {
    fn from(partner: &DeliveryPartner) -> Self {
        Self {
            id: partner.id,
            name: partner.name.clone(),
            phone: partner.phone.clone(),
            vehicle: partner.vehicle,
            location: partner.location,
        }
    }
}

/// Everything a customer screen needs to follow one delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub delivery_id: DeliveryId,
    pub order_id: String,
    pub delivery_status: DeliveryStatus,
    pub current_location: Option<TrackedLocation>,
    pub destination: Option<Coordinate>,
    pub provider_info: Option<ProviderInfo>,
    /// Only while the delivery is open and both ends are known.
    pub eta: Option<EtaEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl TrackingView {
    pub fn new(delivery: &Delivery, partner: Option<&DeliveryPartner>, speed_kmph: Option<f64>) -> Self {
        let eta = match (delivery.current_location, delivery.destination) {
            (Some(from), Some(to)) if !delivery.status.is_terminal() => {
                Some(EtaEstimate::between(from.position(), to, speed_kmph))
            }
            _ => None,
        };
        Self {
            delivery_id: delivery.id,
            order_id: delivery.order_id.clone(),
            delivery_status: delivery.status,
            current_location: delivery.current_location,
            destination: delivery.destination,
            provider_info: partner.map(ProviderInfo::from),
            eta,
            picked_up_at: delivery.picked_up_at,
            delivered_at: delivery.delivered_at,
        }
    }
}

/// How a partner has been doing, from their counters and delivery history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPerformance {
    pub partner_id: PartnerId,
    pub total_deliveries: u32,
    pub total_delivered: u32,
    pub total_cancelled: u32,
    pub active_deliveries: usize,
    /// Percent of closed deliveries that were delivered, to one decimal.
    pub success_rate: f64,
    /// Mean pickup-to-hand-over time in whole minutes.
    pub avg_delivery_time: u32,
}

impl PartnerPerformance {
    pub fn from_history(partner: &DeliveryPartner, history: &[Delivery]) -> Self {
        let stats = &partner.stats;
        let success_rate = if stats.total_deliveries == 0 {
            0.0
        } else {
            let percent = stats.successful_deliveries as f64 / stats.total_deliveries as f64 * 100.0;
            (percent * 10.0).round() / 10.0
        };

        let minutes: Vec<f64> = history
            .iter()
            .filter(|d| d.status == DeliveryStatus::Delivered)
            .filter_map(Delivery::delivery_minutes)
            .collect();
        let avg_delivery_time = if minutes.is_empty() {
            0
        } else {
            (minutes.iter().sum::<f64>() / minutes.len() as f64).round() as u32
        };

        Self {
            partner_id: partner.id,
            total_deliveries: stats.total_deliveries,
            total_delivered: stats.successful_deliveries,
            total_cancelled: stats.cancelled_deliveries,
            active_deliveries: history.iter().filter(|d| !d.status.is_terminal()).count(),
            success_rate,
            avg_delivery_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeliveryOutcome, ServiceArea};
    use chrono::Duration;

    fn rider() -> DeliveryPartner {
        DeliveryPartner::new(
            PartnerId(1),
            "Ravi",
            "9800000001",
            VehicleType::Bike,
            Coordinate::new(22.72, 75.86),
            ServiceArea::default(),
        )
    }

    fn delivered(id: u32, minutes: i64) -> Delivery {
        let mut delivery = Delivery::new(DeliveryId(id), format!("ORD-{id}"), Some(PartnerId(1)), None);
        let picked_up = Utc::now() - Duration::minutes(minutes);
        delivery.picked_up_at = Some(picked_up);
        delivery.delivered_at = Some(picked_up + Duration::minutes(minutes));
        delivery.status = DeliveryStatus::Delivered;
        delivery
    }

    #[test]
    fn tracking_view_carries_partner_and_eta() {
        let mut delivery = Delivery::new(
            DeliveryId(1),
            "ORD-1",
            Some(PartnerId(1)),
            Some(Coordinate::new(22.75, 75.90)),
        );
        delivery.current_location = Some(TrackedLocation::new(
            Coordinate::new(22.72, 75.86),
            DeliveryStatus::Assigned,
            Utc::now(),
        ));

        let view = TrackingView::new(&delivery, Some(&rider()), None);
        assert_eq!(view.provider_info.as_ref().map(|p| p.name.as_str()), Some("Ravi"));
        assert!(view.eta.is_some());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["deliveryStatus"], "Assigned");
        assert_eq!(json["currentLocation"]["lat"], 22.72);
        assert_eq!(json["destination"]["lng"], 75.90);
        assert_eq!(json["providerInfo"]["phone"], "9800000001");
    }

    #[test]
    fn closed_deliveries_have_no_eta() {
        let mut delivery = delivered(1, 20);
        delivery.destination = Some(Coordinate::new(22.75, 75.90));
        delivery.current_location = Some(TrackedLocation::new(
            Coordinate::new(22.75, 75.90),
            DeliveryStatus::Delivered,
            Utc::now(),
        ));
        let view = TrackingView::new(&delivery, None, None);
        assert_eq!(view.eta, None);
        assert_eq!(view.provider_info, None);
    }

    #[test]
    fn performance_averages_delivered_runs() {
        let mut partner = rider();
        partner.stats.record(DeliveryOutcome::Delivered);
        partner.stats.record(DeliveryOutcome::Delivered);
        partner.stats.record(DeliveryOutcome::Cancelled);

        let mut open = Delivery::new(DeliveryId(4), "ORD-4", Some(PartnerId(1)), None);
        open.status = DeliveryStatus::InTransit;
        let history = [delivered(1, 20), delivered(2, 31), open];

        let performance = PartnerPerformance::from_history(&partner, &history);
        assert_eq!(performance.total_deliveries, 3);
        assert_eq!(performance.total_delivered, 2);
        assert_eq!(performance.total_cancelled, 1);
        assert_eq!(performance.active_deliveries, 1);
        assert_eq!(performance.success_rate, 66.7);
        assert_eq!(performance.avg_delivery_time, 26);
    }

    #[test]
    fn fresh_partner_scores_zero() {
        let performance = PartnerPerformance::from_history(&rider(), &[]);
        assert_eq!(performance.success_rate, 0.0);
        assert_eq!(performance.avg_delivery_time, 0);
        assert_eq!(performance.active_deliveries, 0);
    }
}
