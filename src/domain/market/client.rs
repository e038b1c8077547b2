//! Markets sub-client: token and market listings, trade history, orders
//! and estimates.

use chrono::Utc;

use crate::client::LaunchClient;
use crate::domain::market::{check_estimate, check_order, normalize_market_query};
use crate::error::SdkResult;
use crate::http::wire::{
    Estimate, EstimateRequest, Market, MarketQuery, OrderCreated, OrderRequest, TokenListing,
    Trade, TradeQuery,
};

pub struct Markets<'a> {
    pub(crate) client: &'a LaunchClient,
}

impl<'a> Markets<'a> {
    /// Tokens listed on the wallet's blockchain. `available_as_quote`
    /// narrows the list to (or away from) quote tokens.
    pub async fn tokens(&self, available_as_quote: Option<bool>) -> SdkResult<Vec<TokenListing>> {
        let blockchain = self.client.blockchain().await?;
        Ok(self
            .client
            .platform()
            .tokens(&blockchain.key, available_as_quote)
            .await?)
    }

    /// Markets on the wallet's blockchain, 25 per page unless set.
    pub async fn list(&self, query: MarketQuery) -> SdkResult<Vec<Market>> {
        let blockchain = self.client.blockchain().await?;
        let query = normalize_market_query(query, &blockchain.key);
        Ok(self.client.platform().markets(&query).await?)
    }

    pub async fn trades(&self, mut query: TradeQuery) -> SdkResult<Vec<Trade>> {
        let blockchain = self.client.blockchain().await?;
        query.blockchain_key = Some(blockchain.key);
        Ok(self.client.platform().trades(&query).await?)
    }

    pub async fn create_order(&self, mut order: OrderRequest) -> SdkResult<OrderCreated> {
        let now = Utc::now().timestamp().max(0) as u64;
        check_order(&order, now)?;

        let blockchain = self.client.blockchain().await?;
        order.blockchain_key = blockchain.key;

        let created = self.client.platform().create_order(&order).await?;
        tracing::info!(
            order_uid = %created.order_uid,
            side = order.order_type.as_str(),
            "Order created"
        );
        Ok(created)
    }

    /// Quote the other side of a buy or sell.
    pub async fn estimate(&self, mut request: EstimateRequest) -> SdkResult<Estimate> {
        check_estimate(&request)?;

        let blockchain = self.client.blockchain().await?;
        request.blockchain_key = blockchain.key;
        Ok(self.client.platform().estimate(&request).await?)
    }
}
