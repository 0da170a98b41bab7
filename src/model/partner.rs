/// A rider or driver who carries deliveries.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
///
/// See [`impl ActorEntity for DeliveryPartner`](#impl-ActorEntity-for-DeliveryPartner) for details on:
/// - Registration parameters ([`PartnerCreate`])
/// - Update parameters ([`PartnerUpdate`])
/// - Custom actions ([`PartnerAction`](crate::partner_actor::PartnerAction))
use super::{parse_prefixed, InvalidId};
use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Radius a partner serves when registration does not say otherwise.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Type-safe identifier for Delivery Partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartnerId(pub u32);

impl From<u32> for PartnerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for PartnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partner_{}", self.0)
    }
}

impl FromStr for PartnerId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, "partner").map(Self)
    }
}

impl TryFrom<String> for PartnerId {
    type Error = InvalidId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PartnerId> for String {
    fn from(id: PartnerId) -> Self {
        id.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Bike,
    Van,
    Truck,
}

/// Availability of a partner.
///
/// `Busy` is entered and left only through claim/release, never by a direct
/// status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerStatus {
    #[default]
    Available,
    Busy,
    Offline,
}

impl Display for PartnerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PartnerStatus::Available => "available",
            PartnerStatus::Busy => "busy",
            PartnerStatus::Offline => "offline",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceArea {
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default = "default_max_distance")]
    pub max_distance_km: f64,
}

fn default_max_distance() -> f64 {
    DEFAULT_MAX_DISTANCE_KM
}

impl Default for ServiceArea {
    fn default() -> Self {
        Self {
            cities: Vec::new(),
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}

impl ServiceArea {
    pub fn covers(&self, base: Coordinate, point: Coordinate) -> bool {
        base.distance_km(&point) <= self.max_distance_km
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStats {
    pub total_deliveries: u32,
    pub successful_deliveries: u32,
    pub cancelled_deliveries: u32,
}

/// How a partner's delivery ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Cancelled,
}

impl DeliveryStats {
    pub fn record(&mut self, outcome: DeliveryOutcome) {
        self.total_deliveries += 1;
        match outcome {
            DeliveryOutcome::Delivered => self.successful_deliveries += 1,
            DeliveryOutcome::Cancelled => self.cancelled_deliveries += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPartner {
    pub id: PartnerId,
    pub name: String,
    pub phone: String,
    pub vehicle: VehicleType,
    pub location: Coordinate,
    pub status: PartnerStatus,
    pub service_area: ServiceArea,
    pub stats: DeliveryStats,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeliveryPartner {
    pub fn new(
        id: PartnerId,
        name: impl Into<String>,
        phone: impl Into<String>,
        vehicle: VehicleType,
        location: Coordinate,
        service_area: ServiceArea,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            vehicle,
            location,
            status: PartnerStatus::Available,
            service_area,
            stats: DeliveryStats::default(),
            registered_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == PartnerStatus::Available
    }

    /// Whether the partner would take a job at `point`.
    pub fn serves(&self, point: Coordinate) -> bool {
        self.service_area.covers(self.location, point)
    }
}

/// Payload for registering a new partner.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerCreate {
    pub name: String,
    pub phone: String,
    pub vehicle: VehicleType,
    pub location: Coordinate,
    #[serde(default)]
    pub service_area: Option<ServiceArea>,
}

/// Partial update of a partner's position or availability.
#[derive(Debug, Clone, Default)]
pub struct PartnerUpdate {
    pub location: Option<Coordinate>,
    pub status: Option<PartnerStatus>,
}

/// An available partner together with its distance from the requested point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPartner {
    #[serde(flatten)]
    pub partner: DeliveryPartner,
    /// Rounded to two decimals; absent when no point was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}
