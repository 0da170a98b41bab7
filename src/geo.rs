//! # Geography & ETA
//!
//! Pure functions over coordinates: great-circle distance, the delivery ETA
//! estimate, and the legacy `"lat,lng"` string format older clients still send.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average road speed assumed when the caller gives none.
pub const DEFAULT_SPEED_KMPH: f64 = 30.0;

/// No estimate is ever shorter than this.
pub const MIN_ETA_MINUTES: u32 = 5;

/// Errors raised while reading or validating a location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("Latitude must be a finite number between -90 and 90, got {0}")]
    InvalidLatitude(f64),

    #[error("Longitude must be a finite number between -180 and 180, got {0}")]
    InvalidLongitude(f64),

    #[error("Malformed location {0:?}, expected \"lat,lng\"")]
    MalformedLocation(String),
}

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the coordinate unchanged if both components are finite and in range.
    pub fn validate(self) -> Result<Self, GeoError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeoError::InvalidLatitude(self.lat));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(GeoError::InvalidLongitude(self.lng));
        }
        Ok(self)
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Renders the legacy `"lat,lng"` form.
impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Parses the legacy `"lat,lng"` form. Whitespace around either number is ignored.
impl FromStr for Coordinate {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GeoError::MalformedLocation(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(malformed)?;
        let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
        let lng: f64 = lng.trim().parse().map_err(|_| malformed())?;
        Coordinate::new(lat, lng).validate()
    }
}

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Minutes needed to cover the distance between `from` and `to`.
///
/// `round(distance / speed * 60)`, never below [`MIN_ETA_MINUTES`]. A missing,
/// non-positive or non-finite speed falls back to [`DEFAULT_SPEED_KMPH`].
pub fn estimate_eta(from: Coordinate, to: Coordinate, speed_kmph: Option<f64>) -> u32 {
    minutes_for(haversine_km(from, to), speed_kmph)
}

fn minutes_for(distance_km: f64, speed_kmph: Option<f64>) -> u32 {
    let speed = speed_kmph
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_SPEED_KMPH);
    // `as` saturates, so absurd distances clamp to u32::MAX instead of wrapping.
    let minutes = (distance_km / speed * 60.0).round() as u32;
    minutes.max(MIN_ETA_MINUTES)
}

/// Rounds to two decimal places, the precision distances are reported with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The ETA together with the distance it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtaEstimate {
    pub minutes: u32,
    pub distance_km: f64,
}

impl EtaEstimate {
    pub fn between(from: Coordinate, to: Coordinate, speed_kmph: Option<f64>) -> Self {
        let distance_km = haversine_km(from, to);
        Self {
            minutes: minutes_for(distance_km, speed_kmph),
            distance_km: round2(distance_km),
        }
    }
}
