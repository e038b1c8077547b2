//! Conversion of human-readable decimal amounts to raw integer units.
//!
//! All math uses `rust_decimal::Decimal` for exact arithmetic.
//! No async, no network calls.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Errors that can occur while scaling an amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalingError {
    InvalidDecimal { input: String, reason: String },
    Negative(String),
    Overflow { context: String },
    FractionalAmount { value: String },
}

impl fmt::Display for ScalingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingError::InvalidDecimal { input, reason } => {
                write!(f, "Invalid decimal '{}': {}", input, reason)
            }
            ScalingError::Negative(v) => write!(f, "Amount must not be negative, got {}", v),
            ScalingError::Overflow { context } => write!(f, "Overflow: {}", context),
            ScalingError::FractionalAmount { value } => {
                write!(f, "Amount has more fractional digits than the token allows: {}", value)
            }
        }
    }
}

impl std::error::Error for ScalingError {}

impl From<ScalingError> for crate::error::SdkError {
    fn from(e: ScalingError) -> Self {
        match e {
            ScalingError::Overflow { context } => crate::error::SdkError::Overflow(context),
            other => crate::error::SdkError::Validation(other.to_string()),
        }
    }
}

/// Parse a human-readable decimal string.
pub fn parse_decimal(value: &str) -> Result<Decimal, ScalingError> {
    Decimal::from_str(value.trim()).map_err(|e| ScalingError::InvalidDecimal {
        input: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a decimal string into raw units: `value * 10^decimals`.
///
/// ```text
/// parse_units("1.5", 6)  == 1_500_000
/// parse_units("0.01", 18) == 10_000_000_000_000_000
/// ```
pub fn parse_units(value: &str, decimals: u8) -> Result<u128, ScalingError> {
    let amount = parse_decimal(value)?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ScalingError::Negative(value.to_string()));
    }

    let multiplier = 10u64
        .checked_pow(decimals as u32)
        .map(Decimal::from)
        .ok_or_else(|| ScalingError::Overflow {
            context: format!("10^{} overflow", decimals),
        })?;

    let raw = amount
        .checked_mul(multiplier)
        .ok_or_else(|| ScalingError::Overflow {
            context: format!("{} * 10^{}", value, decimals),
        })?;

    if raw.fract() != Decimal::ZERO {
        return Err(ScalingError::FractionalAmount {
            value: value.to_string(),
        });
    }

    raw.to_u128().ok_or_else(|| ScalingError::Overflow {
        context: format!("{} does not fit in u128", raw),
    })
}

/// Like [`parse_units`] but narrowed to `u64` (SPL token amounts, lamports).
pub fn parse_units_u64(value: &str, decimals: u8) -> Result<u64, ScalingError> {
    let raw = parse_units(value, decimals)?;
    u64::try_from(raw).map_err(|_| ScalingError::Overflow {
        context: format!("{} does not fit in u64", raw),
    })
}
