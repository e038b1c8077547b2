//! Deposit domain: request validation and the confirmed receipt.

pub mod client;

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};
use crate::http::wire::TokenBalanceInfo;
use crate::shared::parse_units;
use crate::ws::DepositEvent;

/// Message of every confirmed deposit.
pub const DEPOSIT_SUCCESS_MESSAGE: &str = "user deposited success";

/// Token id prefixes accepted for token deposits.
const TOKEN_ID_TYPES: [&str; 2] = ["erc20", "token"];

/// A deposit into the platform's payment contract or deposit address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    /// Decimal string in token units.
    pub amount: String,
    /// When set, must equal the wallet's blockchain key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_key: Option<String>,
    /// Platform token id, `<type>:<address>`. Required for token deposits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

/// A deposit confirmed by a `UserDepositedEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    pub message: String,
    /// Epoch seconds.
    pub time: u64,
    pub tx_hash: String,
}

impl From<DepositEvent> for DepositReceipt {
    fn from(event: DepositEvent) -> Self {
        Self {
            message: DEPOSIT_SUCCESS_MESSAGE.to_string(),
            time: event.deposit_time,
            tx_hash: event.deposit_tx_hash,
        }
    }
}

/// Reject a request addressed to another blockchain.
pub fn check_blockchain_key(request: &DepositRequest, blockchain_key: &str) -> SdkResult<()> {
    match request.blockchain_key.as_deref() {
        Some(key) if key != blockchain_key => Err(SdkError::Validation(format!(
            "Blockchain key {} does not match wallet blockchain {}",
            key, blockchain_key
        ))),
        _ => Ok(()),
    }
}

/// Find the platform balance entry of `token_id`.
pub fn find_balance<'a>(
    balances: &'a [TokenBalanceInfo],
    token_id: &str,
) -> SdkResult<&'a TokenBalanceInfo> {
    balances
        .iter()
        .find(|b| b.token_id == token_id)
        .ok_or_else(|| SdkError::Validation(format!("Unknown token id {}", token_id)))
}

/// Reject amounts that do not scale to a positive integer.
pub fn check_amount(amount: &str, decimals: u8) -> SdkResult<u128> {
    let raw = parse_units(amount, decimals)?;
    if raw == 0 {
        return Err(SdkError::Validation("Amount must be greater than zero".into()));
    }
    Ok(raw)
}

/// Token address of a `<type>:<address>` token id.
pub fn token_address(token_id: &str) -> SdkResult<&str> {
    let (kind, address) = token_id.split_once(':').ok_or_else(|| {
        SdkError::Validation(format!("Token id {} has no type prefix", token_id))
    })?;
    if !TOKEN_ID_TYPES.contains(&kind) {
        return Err(SdkError::Validation(format!(
            "Token id type {} cannot be deposited as a token",
            kind
        )));
    }
    if address.is_empty() {
        return Err(SdkError::Validation(format!("Token id {} has no address", token_id)));
    }
    Ok(address)
}
