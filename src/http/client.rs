//! Low-level HTTP client: `PlatformHttp`.
//!
//! One method per API endpoint, each request issued exactly once.

use std::sync::Arc;
use std::time::Duration;

use async_lock::RwLock;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HttpError;
use crate::http::api::PlatformApi;
use crate::http::wire::{
    AccountQuery, DeployTokenRequest, DepositQuery, DepositRecord, Estimate, EstimateRequest,
    Market, MarketQuery, NetworkInfo, NonceRequest, NonceResponse, OrderCreated, OrderRequest,
    PremarketRequest, PremarketResponse, ServerStatus, TokenBalanceInfo, TokenListing,
    TokenMetadataUpload, TokenMetadataUrl, Trade, TradeQuery, WithdrawalCreated, WithdrawalQuery,
    WithdrawalRecord, WithdrawalRequest,
};
use crate::network::API_PATH;

const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the platform REST API.
pub struct PlatformHttp {
    server_url: String,
    base_url: String,
    client: Client,
    /// Sign-in signature. NEVER exposed publicly.
    auth_token: Arc<RwLock<Option<String>>>,
}

impl PlatformHttp {
    /// Build a client for `server_url`. Requests go to `<server_url>/api/v1`.
    pub fn new(server_url: &str) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            server_url: server_url.to_string(),
            base_url: format!("{}{}", server_url.trim_end_matches('/'), API_PATH),
            client,
            auth_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if an auth token is set.
    pub async fn has_auth_token(&self) -> bool {
        self.auth_token.read().await.is_some()
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.do_request(reqwest::Method::GET, path, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        self.do_request(reqwest::Method::POST, path, Some(body)).await
    }

    async fn do_request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, HttpError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "Platform request");

        let mut req = self.client.request(method, &url);

        if let Some(token) = self.auth_token.read().await.as_ref() {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status_code, %url, "Platform request failed");

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl Clone for PlatformHttp {
    fn clone(&self) -> Self {
        Self {
            server_url: self.server_url.clone(),
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            auth_token: self.auth_token.clone(),
        }
    }
}

#[async_trait]
impl PlatformApi for PlatformHttp {
    async fn server_status(&self) -> ServerStatus {
        let result = self
            .client
            .head(&self.server_url)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => ServerStatus {
                up: true,
                status: Some(resp.status().as_u16()),
                error: None,
            },
            Ok(resp) => ServerStatus {
                up: false,
                status: Some(resp.status().as_u16()),
                error: Some(format!("Response error: {}", resp.status().as_u16())),
            },
            Err(e) => {
                let error = if e.is_timeout() || e.is_connect() {
                    "No response (possible timeout or network error)".to_string()
                } else {
                    e.to_string()
                };
                ServerStatus {
                    up: false,
                    status: None,
                    error: Some(error),
                }
            }
        }
    }

    // ── Blockchains ──────────────────────────────────────────────────────

    async fn blockchains(&self) -> Result<Vec<NetworkInfo>, HttpError> {
        self.get("/blockchains").await
    }

    // ── Auth ─────────────────────────────────────────────────────────────

    async fn nonce(&self, user_address: &str, blockchain_type: &str) -> Result<String, HttpError> {
        let body = NonceRequest {
            user_address,
            blockchain_type,
        };
        let resp: NonceResponse = self.post("/auth-nonce", &body).await?;
        Ok(resp.nonce)
    }

    async fn set_signature_auth(&self, signature: Option<String>) {
        *self.auth_token.write().await = signature;
    }

    async fn auth_check(&self, blockchain_key: &str) -> Result<serde_json::Value, HttpError> {
        let path = format!("/auth-check?blockchainKey={}", urlencoding::encode(blockchain_key));
        self.get(&path).await
    }

    // ── Accounts ─────────────────────────────────────────────────────────

    async fn accounts(&self, query: &AccountQuery) -> Result<Vec<TokenBalanceInfo>, HttpError> {
        let path = format!("/accounts?{}", query.to_query_string());
        self.get(&path).await
    }

    // ── Token creation ───────────────────────────────────────────────────

    async fn premarket_buy_amount(
        &self,
        request: &PremarketRequest,
    ) -> Result<PremarketResponse, HttpError> {
        self.post("/premarket-buy-amount", request).await
    }

    async fn upload_token_metadata(
        &self,
        metadata: &TokenMetadataUpload,
    ) -> Result<TokenMetadataUrl, HttpError> {
        self.post("/token-metadata", metadata).await
    }

    async fn create_token(
        &self,
        record: &DeployTokenRequest,
    ) -> Result<serde_json::Value, HttpError> {
        self.post("/tokens", record).await
    }

    async fn tokens(
        &self,
        blockchain_key: &str,
        available_as_quote: Option<bool>,
    ) -> Result<Vec<TokenListing>, HttpError> {
        let mut path = format!("/tokens?blockchainKey={}", urlencoding::encode(blockchain_key));
        if let Some(quote) = available_as_quote {
            path.push_str(&format!("&availableAsQuote={}", quote));
        }
        self.get(&path).await
    }

    // ── Deposits and withdrawals ─────────────────────────────────────────

    async fn deposits(&self, query: &DepositQuery) -> Result<Vec<DepositRecord>, HttpError> {
        self.get(&format!("/deposits?{}", query.to_query_string())).await
    }

    async fn withdrawals(
        &self,
        query: &WithdrawalQuery,
    ) -> Result<Vec<WithdrawalRecord>, HttpError> {
        self.get(&format!("/withdrawals?{}", query.to_query_string())).await
    }

    async fn request_withdrawal(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalCreated, HttpError> {
        self.post("/withdrawals", request).await
    }

    // ── Markets ──────────────────────────────────────────────────────────

    async fn markets(&self, query: &MarketQuery) -> Result<Vec<Market>, HttpError> {
        self.get(&format!("/markets?{}", query.to_query_string())).await
    }

    async fn trades(&self, query: &TradeQuery) -> Result<Vec<Trade>, HttpError> {
        self.get(&format!("/trades?{}", query.to_query_string())).await
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderCreated, HttpError> {
        self.post("/orders", order).await
    }

    async fn estimate(&self, request: &EstimateRequest) -> Result<Estimate, HttpError> {
        self.post(&request.path(), request).await
    }
}
