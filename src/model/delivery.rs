/// A delivery of one marketplace order by one partner.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
///
/// See [`impl ActorEntity for Delivery`](#impl-ActorEntity-for-Delivery) for details on:
/// - Creation parameters ([`DeliveryCreate`])
/// - Location reports ([`LocationReport`])
/// - Custom actions ([`DeliveryAction`](crate::delivery_actor::DeliveryAction))
use super::{parse_prefixed, InvalidId, PartnerId};
use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Type-safe identifier for Deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeliveryId(pub u32);

impl From<u32> for DeliveryId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delivery_{}", self.0)
    }
}

impl FromStr for DeliveryId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, "delivery").map(Self)
    }
}

impl TryFrom<String> for DeliveryId {
    type Error = InvalidId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeliveryId> for String {
    fn from(id: DeliveryId) -> Self {
        id.to_string()
    }
}

/// Where a delivery is in its lifecycle.
///
/// ```text
/// Assigned ──> In Transit ──> Delivered
///     │             │
///     └──────┬──────┘
///            v
///        Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeliveryStatus {
    #[default]
    Assigned,
    #[serde(rename = "In Transit", alias = "InTransit", alias = "in_transit")]
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    /// Whether a delivery in this status may move to `next`.
    ///
    /// Staying in the same status is always allowed, so repeated reports are harmless.
    pub fn can_transition_to(self, next: DeliveryStatus) -> bool {
        use DeliveryStatus::*;
        self == next
            || matches!(
                (self, next),
                (Assigned, InTransit) | (InTransit, Delivered) | (Assigned | InTransit, Cancelled)
            )
    }

    /// Delivered and Cancelled deliveries accept no further updates.
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeliveryStatus::Assigned => "Assigned",
            DeliveryStatus::InTransit => "In Transit",
            DeliveryStatus::Delivered => "Delivered",
            DeliveryStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// The last position reported for a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedLocation {
    pub lat: f64,
    pub lng: f64,
    pub status: DeliveryStatus,
    pub recorded_at: DateTime<Utc>,
}

impl TrackedLocation {
    pub fn new(position: Coordinate, status: DeliveryStatus, recorded_at: DateTime<Utc>) -> Self {
        Self {
            lat: position.lat,
            lng: position.lng,
            status,
            recorded_at,
        }
    }

    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: DeliveryId,
    pub order_id: String,
    /// Set by the actor while the delivery is created; always present afterwards.
    pub partner_id: Option<PartnerId>,
    pub status: DeliveryStatus,
    pub current_location: Option<TrackedLocation>,
    pub destination: Option<Coordinate>,
    pub assigned_at: DateTime<Utc>,
    /// When the delivery first went In Transit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Delivery {
    pub fn new(
        id: DeliveryId,
        order_id: impl Into<String>,
        partner_id: Option<PartnerId>,
        destination: Option<Coordinate>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            order_id: order_id.into(),
            partner_id,
            status: DeliveryStatus::Assigned,
            current_location: None,
            destination,
            assigned_at: now,
            picked_up_at: None,
            delivered_at: None,
            updated_at: now,
        }
    }

    /// Minutes from pickup to hand-over, once both happened.
    pub fn delivery_minutes(&self) -> Option<f64> {
        let (picked_up, delivered) = (self.picked_up_at?, self.delivered_at?);
        Some((delivered - picked_up).num_milliseconds() as f64 / 60_000.0)
    }
}

/// Client clocks may run ahead; a timestamp from the future is taken as now.
pub fn clamp_to_now(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.min(Utc::now())
}

/// Payload for assigning a new delivery.
///
/// Without a `partner_id`, the nearest available partner serving the
/// destination is picked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCreate {
    pub order_id: String,
    #[serde(default)]
    pub partner_id: Option<PartnerId>,
    #[serde(default)]
    pub destination: Option<Coordinate>,
}

/// A location report that overwrites a delivery's current location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationReport {
    pub position: Coordinate,
    pub status: DeliveryStatus,
    pub recorded_at: DateTime<Utc>,
}

impl LocationReport {
    /// A report stamped now; status defaults to In Transit.
    pub fn now(position: Coordinate, status: Option<DeliveryStatus>) -> Self {
        Self {
            position,
            status: status.unwrap_or(DeliveryStatus::InTransit),
            recorded_at: Utc::now(),
        }
    }
}

/// A live position broadcast to everyone watching a delivery.
///
/// Never stored by the relay. `timestamp` is optional on the way in and is
/// always filled in on the way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLocationUpdate {
    pub delivery_id: DeliveryId,
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "in_transit")]
    pub status: DeliveryStatus,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

fn in_transit() -> DeliveryStatus {
    DeliveryStatus::InTransit
}

impl DeliveryLocationUpdate {
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// The broadcast form of a delivery's stored location.
    pub fn from_tracked(delivery_id: DeliveryId, location: &TrackedLocation) -> Self {
        Self {
            delivery_id,
            lat: location.lat,
            lng: location.lng,
            status: location.status,
            timestamp: Some(location.recorded_at),
        }
    }
}
