//! Platform API wire types. camelCase JSON on the wire.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Page size of list queries when the caller sets none.
pub const DEFAULT_PAGE_LIMIT: u32 = 25;

/// `key=value` pairs of a URL query. Unset values are left out.
#[derive(Debug, Default)]
struct QueryString(Vec<String>);

impl QueryString {
    fn push(mut self, key: &str, value: Option<impl Display>) -> Self {
        if let Some(v) = value {
            self.0
                .push(format!("{}={}", key, urlencoding::encode(&v.to_string())));
        }
        self
    }

    fn finish(self) -> String {
        self.0.join("&")
    }
}

// ─── Blockchains ─────────────────────────────────────────────────────────────

/// One blockchain the platform supports (`GET /blockchains`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Namespaced chain key, e.g. `eip155:97` or `solana:<genesis hash>`.
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub deposit_address: String,
    #[serde(default)]
    pub token_factory_contract_address: Option<String>,
    /// Decimal string.
    #[serde(default)]
    pub token_creation_fee: Option<String>,
    #[serde(default)]
    pub address_explorer_url: String,
    #[serde(default)]
    pub transaction_explorer_url: String,
    #[serde(default)]
    pub last_indexed_block_number: String,
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceRequest<'a> {
    pub user_address: &'a str,
    pub blockchain_type: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
}

// ─── Accounts ────────────────────────────────────────────────────────────────

/// Query of `GET /accounts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountQuery {
    pub blockchain_key: String,
    pub user_address: String,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl AccountQuery {
    /// Render as a URL query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        QueryString::default()
            .push("blockchainKey", Some(&self.blockchain_key))
            .push("userAddress", Some(&self.user_address))
            .push("limit", self.limit)
            .push("page", self.page)
            .finish()
    }
}

/// A token balance the user holds on the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceInfo {
    pub blockchain_key: String,
    #[serde(default)]
    pub base_token_id: Option<String>,
    #[serde(default)]
    pub quote_token_id: Option<String>,
    /// `<type>:<address>`, e.g. `erc20:0xabc…` or `native:eth`.
    pub token_id: String,
    #[serde(default)]
    pub token_address: String,
    #[serde(default)]
    pub token_name: String,
    pub token_decimals: u8,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub token_image_url: String,
    #[serde(default)]
    pub token_maximum_fraction_digits: Option<u32>,
    #[serde(default)]
    pub user_address: String,
    #[serde(default)]
    pub balance: String,
    #[serde(default)]
    pub formatted_balance: String,
    #[serde(default)]
    pub holding_percentage: String,
}

// ─── Pre-market ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremarketRequest {
    pub blockchain_key: String,
    pub quote_token_id: String,
    pub price: String,
}

/// Quote for an initial buy at token creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremarketResponse {
    #[serde(default)]
    pub blockchain_key: String,
    #[serde(default)]
    pub max_initial_buy_price: String,
    #[serde(default)]
    pub formatted_max_initial_buy_price: String,
    #[serde(default)]
    pub base_token_decimals: u8,
    /// Raw units.
    pub base_token_supply: String,
    pub amount: String,
    #[serde(default)]
    pub formatted_amount: String,
}

// ─── Token metadata ──────────────────────────────────────────────────────────

/// Body of `POST /token-metadata`. The image is a base64 data URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadataUpload {
    pub blockchain_key: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_description: String,
    pub token_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_discord: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadataUrl {
    pub token_metadata_url: String,
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// A token deployment request, also the record posted to `POST /tokens`
/// once `tx_hash` is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployTokenRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    /// Filled from the selected blockchain when left empty.
    #[serde(default)]
    pub blockchain_key: String,
    pub quote_token_id: String,
    /// Decimal string in quote token units. `"0"` for no initial buy.
    pub initial_buy_price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub token_name: String,
    pub token_symbol: String,
    #[serde(default)]
    pub token_description: String,
    #[serde(default)]
    pub token_image: String,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_locked: Option<String>,
    /// Lock duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_locked: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_telegram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_discord: Option<String>,
}

impl DeployTokenRequest {
    /// Metadata upload body for this request on `blockchain_key`.
    pub fn metadata_upload(&self, blockchain_key: &str) -> TokenMetadataUpload {
        TokenMetadataUpload {
            blockchain_key: blockchain_key.to_string(),
            token_name: self.token_name.clone(),
            token_symbol: self.token_symbol.clone(),
            token_description: self.token_description.clone(),
            token_image: self.token_image.clone(),
            token_website: self.token_website.clone(),
            token_twitter: self.token_twitter.clone(),
            token_telegram: self.token_telegram.clone(),
            token_discord: self.token_discord.clone(),
        }
    }
}

// ─── Server status ───────────────────────────────────────────────────────────

/// Reachability of the platform server, as seen by a `HEAD` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub up: bool,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
}

// ─── Token lists ─────────────────────────────────────────────────────────────

/// A token listed on the platform (`GET /tokens`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenListing {
    pub token_id: String,
    pub token_address: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_image_url: String,
    pub token_description: Option<String>,
    pub total_supply: String,
    pub circulating_supply: String,
    pub available_token_amount: String,
    pub token_website: Option<String>,
    pub token_twitter: Option<String>,
    pub token_telegram: Option<String>,
    pub token_discord: Option<String>,
    pub token_tags: Vec<String>,
    /// Epoch seconds.
    pub creation_time: u64,
    pub creator_user_address: String,
    pub creator_user_name: String,
    pub usd_market_cap: String,
    pub trade_vol_all_time: String,
    pub num_of_holders: String,
    pub bonding_curve_percentage: String,
    pub available_as_quote: bool,
}

// ─── Deposit history ─────────────────────────────────────────────────────────

/// Query of `GET /deposits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositQuery {
    pub blockchain_key: Option<String>,
    pub user_address: Option<String>,
    pub limit: u32,
    pub page: u32,
}

impl Default for DepositQuery {
    fn default() -> Self {
        Self {
            blockchain_key: None,
            user_address: None,
            limit: DEFAULT_PAGE_LIMIT,
            page: 1,
        }
    }
}

impl DepositQuery {
    pub fn to_query_string(&self) -> String {
        QueryString::default()
            .push("blockchainKey", self.blockchain_key.as_deref())
            .push("userAddress", self.user_address.as_deref())
            .push("limit", Some(self.limit))
            .push("page", Some(self.page))
            .finish()
    }
}

/// Settlement state of a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    Requested,
    Sent,
    Pending,
    Success,
    Failed,
}

/// One indexed deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub blockchain_key: String,
    pub token_id: String,
    #[serde(default)]
    pub token_address: String,
    #[serde(default)]
    pub token_name: String,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub user_address: String,
    /// Epoch seconds.
    pub deposit_time: u64,
    pub deposit_tx_hash: String,
    pub deposit_amount: String,
    /// The platform spells this key `formattedDepsoitAmount`.
    #[serde(default, alias = "formattedDepsoitAmount")]
    pub formatted_deposit_amount: String,
    pub status: TransferStatus,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

// ─── Withdrawals ─────────────────────────────────────────────────────────────

/// Body of `POST /withdrawals`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    /// Overwritten with the wallet's blockchain.
    #[serde(default)]
    pub blockchain_key: String,
    /// Must be a token id the platform lists on that blockchain.
    pub token_id: String,
    /// Destination of the withdrawn amount.
    pub user_address: String,
    /// Decimal string in token units.
    pub request_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalUid {
    pub uid: String,
}

/// Answer of `POST /withdrawals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalCreated {
    #[serde(default)]
    pub message: String,
    pub withdrawal_uid: WithdrawalUid,
}

/// Query of `GET /withdrawals`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalQuery {
    pub user_address: Option<String>,
    pub limit: u32,
    pub page: u32,
}

impl Default for WithdrawalQuery {
    fn default() -> Self {
        Self {
            user_address: None,
            limit: DEFAULT_PAGE_LIMIT,
            page: 1,
        }
    }
}

impl WithdrawalQuery {
    pub fn to_query_string(&self) -> String {
        QueryString::default()
            .push("userAddress", self.user_address.as_deref())
            .push("limit", Some(self.limit))
            .push("page", Some(self.page))
            .finish()
    }
}

/// One withdrawal request and its settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
    pub uid: String,
    pub blockchain_key: String,
    pub token_id: String,
    #[serde(default)]
    pub token_address: String,
    #[serde(default)]
    pub token_symbol: String,
    #[serde(default)]
    pub user_address: String,
    /// Epoch seconds.
    pub request_time: u64,
    pub request_amount: String,
    #[serde(default)]
    pub formatted_request_amount: String,
    pub status: TransferStatus,
    #[serde(default)]
    pub sent_tx_hash: Option<String>,
    #[serde(default)]
    pub sent_time: Option<u64>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

// ─── Markets ─────────────────────────────────────────────────────────────────

/// Query of `GET /markets`. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketQuery {
    /// Overwritten with the wallet's blockchain.
    pub blockchain_key: Option<String>,
    pub base_token_id: Option<String>,
    pub quote_token_id: Option<String>,
    pub favorite_of_user_address: Option<String>,
    pub creator_user_address: Option<String>,
    pub min_market_cap: Option<String>,
    pub max_market_cap: Option<String>,
    pub min_trade_vol: Option<String>,
    pub max_trade_vol: Option<String>,
    pub min_num_of_holders: Option<String>,
    pub max_num_of_holders: Option<String>,
    pub max_bonding_curve_percentage: Option<String>,
    /// Defaults to 1.
    pub page: Option<u32>,
    /// Defaults to [`DEFAULT_PAGE_LIMIT`].
    pub limit: Option<u32>,
}

impl MarketQuery {
    pub fn to_query_string(&self) -> String {
        QueryString::default()
            .push("blockchainKey", self.blockchain_key.as_deref())
            .push("baseTokenId", self.base_token_id.as_deref())
            .push("quoteTokenId", self.quote_token_id.as_deref())
            .push("favoriteOfUserAddress", self.favorite_of_user_address.as_deref())
            .push("creatorUserAddress", self.creator_user_address.as_deref())
            .push("minMarketCap", self.min_market_cap.as_deref())
            .push("maxMarketCap", self.max_market_cap.as_deref())
            .push("minTradeVol", self.min_trade_vol.as_deref())
            .push("maxTradeVol", self.max_trade_vol.as_deref())
            .push("minNumOfHolders", self.min_num_of_holders.as_deref())
            .push("maxNumOfHolders", self.max_num_of_holders.as_deref())
            .push("maxBondingCurvePercentage", self.max_bonding_curve_percentage.as_deref())
            .push("page", self.page)
            .push("limit", self.limit)
            .finish()
    }
}

/// A bonding-curve market (`GET /markets`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Market {
    pub blockchain_key: String,
    pub base_token_id: String,
    pub quote_token_id: String,
    pub base_token_fee_percentage: String,
    pub quote_token_fee_percentage: String,
    pub quote_token_symbol: String,
    pub token_address: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_image_url: String,
    pub total_supply: String,
    pub circulating_supply: String,
    pub base_token_sold: String,
    pub available_base_token_to_be_bought: String,
    pub base_token_decimals: u8,
    pub quote_token_decimals: u8,
    pub real_base_reserve: String,
    pub virt_base_reserve: String,
    pub real_quote_reserve: String,
    pub virt_quote_reserve: String,
    /// Epoch seconds.
    pub creation_time: u64,
    pub creator_user_address: String,
    pub last_trade_price: String,
    pub formatted_last_trade_price: String,
    pub market_cap: String,
    pub market_cap_target: String,
    pub trade_vol_all_time: String,
    pub num_of_holders: String,
    pub bonding_curve_percentage: String,
    pub is_bonding_curve_reached: bool,
    pub dex_url: Option<String>,
    pub dex_name: Option<String>,
}

/// Side of an order or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

// ─── Trades ──────────────────────────────────────────────────────────────────

/// Query of `GET /trades`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeQuery {
    /// Overwritten with the wallet's blockchain.
    pub blockchain_key: Option<String>,
    pub token_id: Option<String>,
    pub user_address: Option<String>,
    pub min_quote_amount: Option<String>,
}

impl TradeQuery {
    pub fn to_query_string(&self) -> String {
        QueryString::default()
            .push("blockchainKey", self.blockchain_key.as_deref())
            .push("tokenId", self.token_id.as_deref())
            .push("userAddress", self.user_address.as_deref())
            .push("minQuoteAmount", self.min_quote_amount.as_deref())
            .finish()
    }
}

/// One executed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub uid: String,
    #[serde(default)]
    pub user_address: String,
    #[serde(default)]
    pub user_name: String,
    pub order_type: OrderSide,
    pub base_amount: String,
    #[serde(default)]
    pub formatted_base_amount: String,
    pub quote_amount: String,
    #[serde(default)]
    pub formatted_quote_amount: String,
    /// Epoch seconds.
    pub execution_time: u64,
}

// ─── Orders ──────────────────────────────────────────────────────────────────

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Overwritten with the wallet's blockchain.
    #[serde(default)]
    pub blockchain_key: String,
    pub base_token_id: String,
    pub quote_token_id: String,
    pub order_type: OrderSide,
    /// Decimal string; at least one whole unit.
    pub amount: String,
    pub price: String,
    /// Maximum slippage in percent, up to 50.
    pub slippage: String,
    /// Epoch seconds, strictly in the future.
    pub deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    #[serde(default)]
    pub message: String,
    pub order_uid: String,
}

// ─── Estimates ───────────────────────────────────────────────────────────────

/// What an estimate is quoted in: quote-token price or base-token amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateKind {
    Price,
    Amount,
}

impl EstimateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateKind::Price => "price",
            EstimateKind::Amount => "amount",
        }
    }
}

/// Body of `POST /market-<side>-<kind>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    /// Overwritten with the wallet's blockchain.
    #[serde(default)]
    pub blockchain_key: String,
    pub base_token_id: String,
    pub quote_token_id: String,
    pub side: OrderSide,
    pub market_type: EstimateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl EstimateRequest {
    /// Endpoint path, e.g. `/market-buy-amount`.
    pub fn path(&self) -> String {
        format!("/market-{}-{}", self.side.as_str(), self.market_type.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Estimate {
    pub amount: Option<String>,
    pub price: Option<String>,
    pub formatted_amount: Option<String>,
    pub formatted_price: Option<String>,
}
