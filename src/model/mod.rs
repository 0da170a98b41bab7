//! # Domain Model
//!
//! Plain data types for deliveries and delivery partners. The actor-specific
//! behaviour lives in [`crate::delivery_actor`] and [`crate::partner_actor`];
//! this module only holds the records, their DTOs and their identifiers.
//!
//! Identifiers render with a resource prefix (`delivery_3`, `partner_7`) and
//! parse from either that form or the bare number, so URLs built by older
//! clients keep working.

pub mod delivery;
pub mod partner;
pub mod tracking;

pub use delivery::*;
pub use partner::*;
pub use tracking::*;

/// Error returned when a path or payload carries an unusable identifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid {kind} id: {value:?}")]
pub struct InvalidId {
    pub kind: &'static str,
    pub value: String,
}

/// Accepts `"<prefix>_<n>"` or `"<n>"`.
fn parse_prefixed(value: &str, prefix: &'static str) -> Result<u32, InvalidId> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(trimmed);
    digits.parse().map_err(|_| InvalidId {
        kind: prefix,
        value: value.to_string(),
    })
}
