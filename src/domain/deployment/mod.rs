//! Deployment domain: lock normalization, initial-buy arithmetic, outcomes.
//!
//! The orchestrator itself is [`client::Deployments::deploy`]. Everything in
//! this file is pure so the rules can be checked without a network.

pub mod client;

use std::fmt;

use crate::error::{SdkError, SdkResult};
use crate::http::wire::{DeployTokenRequest, PremarketResponse};
use crate::shared::parse_units_u64;
use crate::wallet::Network;

// ─── Lock normalization ──────────────────────────────────────────────────────

/// Lock parameters after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLock {
    pub is_locked: bool,
    /// Decimal string; `"0"` when unlocked.
    pub amount_locked: String,
    /// Minutes; `0` when unlocked, never `0` when locked.
    pub time_locked: u64,
}

/// Normalize the lock fields of a request.
///
/// Unlocked requests become `(false, "0", 0)` whatever they carried. Locked
/// requests must carry a non-zero `time_locked`.
pub fn normalize_lock(request: &DeployTokenRequest) -> SdkResult<NormalizedLock> {
    if !request.is_locked {
        return Ok(NormalizedLock {
            is_locked: false,
            amount_locked: "0".to_string(),
            time_locked: 0,
        });
    }

    match request.time_locked {
        Some(minutes) if minutes > 0 => Ok(NormalizedLock {
            is_locked: true,
            amount_locked: request
                .amount_locked
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "0".to_string()),
            time_locked: minutes,
        }),
        _ => Err(SdkError::Validation(
            "timeLocked must be greater than zero for a locked token".into(),
        )),
    }
}

// ─── Initial buy ─────────────────────────────────────────────────────────────

/// Raw units left for the fee recipient on Solana: the supply minus the
/// initial buy minus a 1% carve-out of the initial buy.
pub fn solana_locked_amount(supply: u64, initial_buy: u64) -> SdkResult<u64> {
    let carve_out = initial_buy / 100;
    supply
        .checked_sub(initial_buy)
        .and_then(|rest| rest.checked_sub(carve_out))
        .ok_or_else(|| {
            SdkError::InsufficientFunds(format!(
                "initial buy of {} (+{} carve-out) exceeds supply {}",
                initial_buy, carve_out, supply
            ))
        })
}

/// Amounts handed to the wallet after pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockAmounts {
    /// EVM: decimal string with 6 decimals. Solana: raw units.
    pub amount_locked: String,
    /// Raw units vested on Solana; `0` on EVM.
    pub initial_buy_amount: u64,
}

/// Apply a pre-market quote to the normalized lock.
///
/// `exact_price` is the initial buy price in raw quote units; a zero price
/// keeps the requested lock amount.
pub fn apply_quote(
    network: Network,
    lock: &NormalizedLock,
    exact_price: u128,
    quote: &PremarketResponse,
    quote_decimals: u8,
) -> SdkResult<LockAmounts> {
    if exact_price == 0 {
        return Ok(LockAmounts {
            amount_locked: lock.amount_locked.clone(),
            initial_buy_amount: 0,
        });
    }

    match network {
        Network::Evm => Ok(LockAmounts {
            amount_locked: quote.amount.clone(),
            initial_buy_amount: 0,
        }),
        Network::Solana => {
            let supply: u64 = quote.base_token_supply.trim().parse().map_err(|e| {
                SdkError::Validation(format!(
                    "Invalid base token supply '{}': {}",
                    quote.base_token_supply, e
                ))
            })?;
            let initial_buy = parse_units_u64(&quote.amount, quote_decimals)?;
            let remaining = solana_locked_amount(supply, initial_buy)?;
            Ok(LockAmounts {
                amount_locked: remaining.to_string(),
                initial_buy_amount: initial_buy,
            })
        }
    }
}

// ─── Orchestration state ─────────────────────────────────────────────────────

/// Orchestrator progress, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployState {
    Init,
    ResolvingPrice,
    /// Solana only.
    BuildingMetadata,
    Submitting,
    /// EVM only.
    AwaitingEvent,
    Recording,
    Done,
    Failed,
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeployState::Init => "INIT",
            DeployState::ResolvingPrice => "RESOLVING_PRICE",
            DeployState::BuildingMetadata => "BUILDING_METADATA",
            DeployState::Submitting => "SUBMITTING",
            DeployState::AwaitingEvent => "AWAITING_EVENT",
            DeployState::Recording => "RECORDING",
            DeployState::Done => "DONE",
            DeployState::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of a deployment.
#[derive(Debug)]
pub enum DeploymentOutcome {
    /// Every transaction landed and the token was recorded.
    Completed {
        /// Creation hash, then the vesting hash when there is one, joined by `,`.
        tx_hashes: String,
        /// Body returned by `POST /tokens`.
        record: serde_json::Value,
    },
    /// The token exists and was recorded, but its vesting stream was not
    /// created. Nothing was rolled back.
    PartialSuccess {
        creation_tx: String,
        error: SdkError,
        record: serde_json::Value,
    },
}

impl DeploymentOutcome {
    /// Hash of the token creation transaction.
    pub fn creation_tx(&self) -> &str {
        match self {
            DeploymentOutcome::Completed { tx_hashes, .. } => {
                tx_hashes.split(',').next().unwrap_or(tx_hashes)
            }
            DeploymentOutcome::PartialSuccess { creation_tx, .. } => creation_tx,
        }
    }

    pub fn record(&self) -> &serde_json::Value {
        match self {
            DeploymentOutcome::Completed { record, .. }
            | DeploymentOutcome::PartialSuccess { record, .. } => record,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, DeploymentOutcome::Completed { .. })
    }
}
