//! Ethereum JSON-RPC provider over HTTP.
//!
//! Each call is issued once. The only loop is receipt polling, which waits
//! for as long as the transaction takes to be mined.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ChainError, SdkError, SdkResult};

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// Call object of `eth_call` / `eth_estimateGas`.
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub from: String,
    pub to: String,
    pub value: String,
    pub data: String,
}

impl CallRequest {
    pub fn new(from: &str, to: &[u8; 20], value: u128, data: &[u8]) -> Self {
        Self {
            from: from.to_string(),
            to: format!("0x{}", hex::encode(to)),
            value: to_quantity(value),
            data: format!("0x{}", hex::encode(data)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockHeader {
    base_fee_per_gas: Option<String>,
}

/// The fields of a receipt the wallet inspects.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    /// `0x1` on success, `0x0` on revert.
    pub status: Option<String>,
    pub block_number: Option<String>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status
            .as_deref()
            .and_then(|s| parse_quantity(s).ok())
            .map_or(false, |s| s == 1)
    }
}

/// `0x`-prefixed hex quantity without leading zeros.
pub fn to_quantity(value: u128) -> String {
    format!("0x{:x}", value)
}

/// Parse a hex quantity.
pub fn parse_quantity(value: &str) -> SdkResult<u128> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("Bad quantity '{}': {}", value, e)).into())
}

/// JSON-RPC client bound to one endpoint.
pub struct JsonRpcProvider {
    url: String,
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcProvider {
    pub fn new(url: &str) -> SdkResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ChainError::from)?;
        Ok(Self {
            url: url.to_string(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request_opt<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> SdkResult<Option<R>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        tracing::debug!(method, "JSON-RPC request");

        let response: JsonRpcResponse<R> = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(ChainError::from)?
            .json()
            .await
            .map_err(ChainError::from)?;

        if let Some(error) = response.error {
            if error.message.to_lowercase().contains("insufficient funds") {
                return Err(SdkError::InsufficientFunds(error.message));
            }
            return Err(ChainError::JsonRpc {
                code: error.code,
                message: error.message,
            }
            .into());
        }

        Ok(response.result)
    }

    async fn request<P: Serialize, R: DeserializeOwned>(&self, method: &str, params: P) -> SdkResult<R> {
        self.request_opt(method, params).await?.ok_or_else(|| {
            ChainError::InvalidResponse(format!("{} returned no result", method)).into()
        })
    }

    async fn request_quantity<P: Serialize>(&self, method: &str, params: P) -> SdkResult<u128> {
        let hex: String = self.request(method, params).await?;
        parse_quantity(&hex)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn chain_id(&self) -> SdkResult<u64> {
        let id = self.request_quantity("eth_chainId", ()).await?;
        u64::try_from(id).map_err(|_| ChainError::InvalidResponse("chain id overflow".into()).into())
    }

    /// `eth_call` against the latest block.
    pub async fn call(&self, call: &CallRequest) -> SdkResult<Vec<u8>> {
        let out: String = self.request("eth_call", (call, "latest")).await?;
        hex::decode(out.trim_start_matches("0x"))
            .map_err(|e| ChainError::InvalidResponse(format!("eth_call output: {}", e)).into())
    }

    pub async fn estimate_gas(&self, call: &CallRequest) -> SdkResult<u64> {
        let gas = self.request_quantity("eth_estimateGas", (call,)).await?;
        u64::try_from(gas).map_err(|_| ChainError::InvalidResponse("gas overflow".into()).into())
    }

    pub async fn pending_nonce(&self, address: &str) -> SdkResult<u64> {
        let nonce = self
            .request_quantity("eth_getTransactionCount", (address, "pending"))
            .await?;
        u64::try_from(nonce).map_err(|_| ChainError::InvalidResponse("nonce overflow".into()).into())
    }

    pub async fn max_priority_fee(&self) -> SdkResult<u128> {
        self.request_quantity("eth_maxPriorityFeePerGas", ()).await
    }

    /// Base fee of the latest block; `None` on pre-London chains.
    pub async fn latest_base_fee(&self) -> SdkResult<Option<u128>> {
        let header: BlockHeader = self.request("eth_getBlockByNumber", ("latest", false)).await?;
        header.base_fee_per_gas.as_deref().map(parse_quantity).transpose()
    }

    pub async fn gas_price(&self) -> SdkResult<u128> {
        self.request_quantity("eth_gasPrice", ()).await
    }

    // ── Writes ───────────────────────────────────────────────────────────

    pub async fn send_raw_transaction(&self, raw_hex: &str) -> SdkResult<String> {
        self.request("eth_sendRawTransaction", (raw_hex,)).await
    }

    pub async fn transaction_receipt(&self, hash: &str) -> SdkResult<Option<TransactionReceipt>> {
        self.request_opt("eth_getTransactionReceipt", (hash,)).await
    }

    /// Poll until the transaction is mined. Reverts are errors.
    pub async fn wait_for_receipt(&self, hash: &str) -> SdkResult<TransactionReceipt> {
        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                if !receipt.succeeded() {
                    tracing::error!(tx_hash = %hash, "Transaction reverted");
                    return Err(ChainError::Reverted {
                        tx_hash: hash.to_string(),
                    }
                    .into());
                }
                tracing::info!(tx_hash = %hash, block = ?receipt.block_number, "Transaction mined");
                return Ok(receipt);
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}
