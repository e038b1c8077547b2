//! Shared utilities: unit scaling and time helpers.

pub mod scaling;

pub use scaling::{parse_decimal, parse_units, parse_units_u64, ScalingError};

use chrono::{DateTime, Months, Utc};

/// Unix timestamp `minutes` from now.
pub fn future_epoch_in_minutes(minutes: u64) -> u64 {
    future_epoch_from(Utc::now(), minutes)
}

/// Unix timestamp `minutes` after `now`.
pub fn future_epoch_from(now: DateTime<Utc>, minutes: u64) -> u64 {
    let base = now.timestamp().max(0) as u64;
    base.saturating_add(minutes.saturating_mul(60))
}

/// Expiry of a sign-in message: one calendar month after `now`.
pub fn signature_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(1)).unwrap_or(now)
}
