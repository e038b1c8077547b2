//! Market domain: listing queries, orders and price/amount estimates.
//!
//! Every query and body is pinned to the wallet's blockchain before it is
//! sent.

pub mod client;

use rust_decimal::Decimal;

use crate::error::{SdkError, SdkResult};
use crate::http::wire::{EstimateRequest, MarketQuery, OrderRequest, DEFAULT_PAGE_LIMIT};
use crate::shared::parse_decimal;

/// Pin `query` to `blockchain_key` and fill in the default page.
pub fn normalize_market_query(mut query: MarketQuery, blockchain_key: &str) -> MarketQuery {
    query.blockchain_key = Some(blockchain_key.to_string());
    query.page = Some(query.page.filter(|&p| p > 0).unwrap_or(1));
    query.limit = Some(query.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_PAGE_LIMIT));
    query
}

/// Validate an order at `now` (epoch seconds).
///
/// The deadline must lie strictly in the future and the amount must hold
/// at least one whole unit.
pub fn check_order(order: &OrderRequest, now: u64) -> SdkResult<()> {
    if order.deadline <= now {
        return Err(SdkError::Validation(format!(
            "Order deadline {} must be later than now ({}), in epoch seconds",
            order.deadline, now
        )));
    }
    if parse_decimal(&order.amount)?.floor() <= Decimal::ZERO {
        return Err(SdkError::Validation("Order amount must be greater than zero".into()));
    }
    Ok(())
}

/// An estimate needs an amount or a price; the amount wins when both are
/// set, and it must be positive.
pub fn check_estimate(request: &EstimateRequest) -> SdkResult<()> {
    let value = request
        .amount
        .as_deref()
        .or(request.price.as_deref())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SdkError::Validation("Estimate needs an amount or a price".into()))?;
    if parse_decimal(value)? <= Decimal::ZERO {
        return Err(SdkError::Validation("Estimate value must be greater than zero".into()));
    }
    Ok(())
}
