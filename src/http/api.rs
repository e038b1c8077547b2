//! `PlatformApi`, the seam between the orchestrator and the platform backend.

use async_trait::async_trait;

use crate::error::HttpError;
use crate::http::wire::{
    AccountQuery, DeployTokenRequest, DepositQuery, DepositRecord, Estimate, EstimateRequest,
    Market, MarketQuery, NetworkInfo, OrderCreated, OrderRequest, PremarketRequest,
    PremarketResponse, ServerStatus, TokenBalanceInfo, TokenListing, TokenMetadataUpload,
    TokenMetadataUrl, Trade, TradeQuery, WithdrawalCreated, WithdrawalQuery, WithdrawalRecord,
    WithdrawalRequest,
};

/// Platform REST operations the SDK depends on.
///
/// [`PlatformHttp`](crate::http::PlatformHttp) is the production
/// implementation; tests substitute in-memory fakes.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// `HEAD` on the server root. Never fails; an unreachable server is
    /// reported as down.
    async fn server_status(&self) -> ServerStatus;

    /// `GET /blockchains`
    async fn blockchains(&self) -> Result<Vec<NetworkInfo>, HttpError>;

    /// `POST /auth-nonce`
    async fn nonce(&self, user_address: &str, blockchain_type: &str) -> Result<String, HttpError>;

    /// Install (or clear) the bearer signature sent with every later request.
    async fn set_signature_auth(&self, signature: Option<String>);

    /// `GET /auth-check`
    async fn auth_check(&self, blockchain_key: &str) -> Result<serde_json::Value, HttpError>;

    /// `GET /accounts`
    async fn accounts(&self, query: &AccountQuery) -> Result<Vec<TokenBalanceInfo>, HttpError>;

    /// `POST /premarket-buy-amount`
    async fn premarket_buy_amount(
        &self,
        request: &PremarketRequest,
    ) -> Result<PremarketResponse, HttpError>;

    /// `POST /token-metadata`
    async fn upload_token_metadata(
        &self,
        metadata: &TokenMetadataUpload,
    ) -> Result<TokenMetadataUrl, HttpError>;

    /// `POST /tokens`
    async fn create_token(&self, record: &DeployTokenRequest)
        -> Result<serde_json::Value, HttpError>;

    /// `GET /tokens`
    async fn tokens(
        &self,
        blockchain_key: &str,
        available_as_quote: Option<bool>,
    ) -> Result<Vec<TokenListing>, HttpError>;

    /// `GET /deposits`
    async fn deposits(&self, query: &DepositQuery) -> Result<Vec<DepositRecord>, HttpError>;

    /// `GET /withdrawals`
    async fn withdrawals(&self, query: &WithdrawalQuery)
        -> Result<Vec<WithdrawalRecord>, HttpError>;

    /// `POST /withdrawals`
    async fn request_withdrawal(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalCreated, HttpError>;

    /// `GET /markets`
    async fn markets(&self, query: &MarketQuery) -> Result<Vec<Market>, HttpError>;

    /// `GET /trades`
    async fn trades(&self, query: &TradeQuery) -> Result<Vec<Trade>, HttpError>;

    /// `POST /orders`
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderCreated, HttpError>;

    /// `POST /market-<side>-<kind>`
    async fn estimate(&self, request: &EstimateRequest) -> Result<Estimate, HttpError>;
}
