//! Withdrawals sub-client: withdrawal history and new withdrawal requests.

use crate::client::LaunchClient;
use crate::domain::withdrawal::{check_request_amount, find_listing};
use crate::error::SdkResult;
use crate::http::wire::{WithdrawalCreated, WithdrawalQuery, WithdrawalRecord, WithdrawalRequest};

pub struct Withdrawals<'a> {
    pub(crate) client: &'a LaunchClient,
}

impl<'a> Withdrawals<'a> {
    /// `GET /withdrawals`
    pub async fn list(&self, query: &WithdrawalQuery) -> SdkResult<Vec<WithdrawalRecord>> {
        Ok(self.client.platform().withdrawals(query).await?)
    }

    /// Ask the platform to pay out `request_amount` of a listed token.
    ///
    /// The blockchain key is always the wallet's blockchain.
    pub async fn create(&self, mut request: WithdrawalRequest) -> SdkResult<WithdrawalCreated> {
        check_request_amount(&request.request_amount)?;

        let blockchain = self.client.blockchain().await?;
        request.blockchain_key = blockchain.key;

        let tokens = self
            .client
            .platform()
            .tokens(&request.blockchain_key, None)
            .await?;
        find_listing(&tokens, &request.token_id)?;

        let created = self.client.platform().request_withdrawal(&request).await?;
        tracing::info!(uid = %created.withdrawal_uid.uid, token_id = %request.token_id, "Withdrawal requested");
        Ok(created)
    }
}
