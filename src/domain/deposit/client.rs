//! Deposits sub-client: native and token deposits confirmed by event.

use std::future::Future;

use crate::client::LaunchClient;
use crate::domain::deposit::{
    check_amount, check_blockchain_key, find_balance, token_address, DepositReceipt,
    DepositRequest,
};
use crate::error::{SdkError, SdkResult, WsError};
use crate::http::wire::{DepositQuery, DepositRecord};
use crate::wallet::Network;
use crate::ws::AwaitIntent;

/// Decimals used to validate a native deposit without a token id.
fn native_decimals(network: Network) -> u8 {
    match network {
        Network::Evm => 18,
        Network::Solana => 9,
    }
}

pub struct Deposits<'a> {
    pub(crate) client: &'a LaunchClient,
}

impl<'a> Deposits<'a> {
    /// Indexed deposits. An unset blockchain key defaults to the wallet's
    /// blockchain.
    pub async fn history(&self, mut query: DepositQuery) -> SdkResult<Vec<DepositRecord>> {
        let blockchain = self.client.blockchain().await?;
        query.blockchain_key.get_or_insert(blockchain.key);
        Ok(self.client.platform().deposits(&query).await?)
    }

    /// Deposit native currency to the blockchain's deposit address.
    pub async fn create_deposit(&self, request: &DepositRequest) -> SdkResult<DepositReceipt> {
        let blockchain = self.client.blockchain().await?;
        check_blockchain_key(request, &blockchain.key)?;

        let decimals = match request.token_id.as_deref() {
            Some(token_id) => {
                let balances = self.client.account_balances().await?;
                find_balance(&balances, token_id)?.token_decimals
            }
            None => native_decimals(self.client.wallet().config().network),
        };
        check_amount(&request.amount, decimals)?;

        let wallet = self.client.wallet();
        self.confirm(wallet.deposit(&blockchain.deposit_address, &request.amount))
            .await
    }

    /// Deposit a fungible token to the blockchain's deposit address.
    ///
    /// The token id must be an `erc20:` or `token:` id the platform lists in
    /// the wallet's balances; its decimals scale the amount.
    pub async fn create_deposit_token(
        &self,
        request: &DepositRequest,
    ) -> SdkResult<DepositReceipt> {
        let blockchain = self.client.blockchain().await?;
        check_blockchain_key(request, &blockchain.key)?;

        let token_id = request
            .token_id
            .as_deref()
            .ok_or_else(|| SdkError::Validation("tokenId is required".into()))?;
        let balances = self.client.account_balances().await?;
        let decimals = find_balance(&balances, token_id)?.token_decimals;
        check_amount(&request.amount, decimals)?;
        let token = token_address(token_id)?;

        let wallet = self.client.wallet();
        self.confirm(wallet.deposit_token(
            &blockchain.deposit_address,
            &request.amount,
            token,
            decimals,
        ))
        .await
    }

    /// Subscribe on the wallet address, run `submit`, and turn the
    /// `UserDepositedEvent` into a receipt.
    async fn confirm<F>(&self, submit: F) -> SdkResult<DepositReceipt>
    where
        F: Future<Output = SdkResult<String>>,
    {
        let address = self.client.wallet().address();
        let mut pending = self
            .client
            .listener()
            .subscribe(address, AwaitIntent::Deposit)
            .await?;

        let (event, submitted) = pending.wait_alongside(submit).await;
        let tx_hash = submitted?;
        tracing::info!(%tx_hash, "Deposit submitted");

        let event = event?;
        let deposit = event.deposit().ok_or_else(|| {
            WsError::ProtocolError(format!("Malformed {} payload: {}", event.kind, event.data))
        })?;
        Ok(DepositReceipt::from(deposit))
    }
}
