//! Deployments sub-client: the token deployment orchestrator.

use crate::client::LaunchClient;
use crate::domain::deployment::{
    apply_quote, normalize_lock, DeployState, DeploymentOutcome, NormalizedLock,
};
use crate::error::{SdkError, SdkResult, WsError};
use crate::http::wire::{DeployTokenRequest, NetworkInfo, PremarketRequest};
use crate::shared::parse_units;
use crate::wallet::{CreateTokenParams, Network, TokenCreation, VestingStatus};
use crate::ws::AwaitIntent;

pub struct Deployments<'a> {
    pub(crate) client: &'a LaunchClient,
}

/// Logs state transitions of one deployment.
struct Progress {
    state: DeployState,
}

impl Progress {
    fn new() -> Self {
        tracing::debug!(state = %DeployState::Init, "Deployment started");
        Self {
            state: DeployState::Init,
        }
    }

    fn enter(&mut self, next: DeployState) {
        tracing::debug!(from = %self.state, to = %next, "Deployment state");
        self.state = next;
    }
}

impl<'a> Deployments<'a> {
    /// Deploy a token and record it on the platform.
    ///
    /// Lock parameters are validated before any network call, and a server
    /// that fails its status check stops the deployment. On EVM the
    /// event socket is subscribed before the transaction is sent, and the
    /// `TokenCreatedEvent` gates completion. On Solana completion is the
    /// finalized creation transaction.
    pub async fn deploy(&self, request: DeployTokenRequest) -> SdkResult<DeploymentOutcome> {
        let mut progress = Progress::new();
        match self.run(request, &mut progress).await {
            Ok(outcome) => {
                progress.enter(DeployState::Done);
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(state = %progress.state, error = %e, "Deployment failed");
                progress.enter(DeployState::Failed);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request: DeployTokenRequest,
        progress: &mut Progress,
    ) -> SdkResult<DeploymentOutcome> {
        let lock = normalize_lock(&request)?;
        self.client.check_server().await?;
        let wallet = self.client.wallet();
        let network = wallet.config().network;

        let blockchain = self.client.blockchain().await?;

        progress.enter(DeployState::ResolvingPrice);
        let balances = self.client.account_balances().await?;
        let quote_token = balances
            .iter()
            .find(|b| b.token_id == request.quote_token_id)
            .ok_or_else(|| {
                SdkError::InsufficientFunds(format!(
                    "No balance of quote token {}",
                    request.quote_token_id
                ))
            })?;
        let exact_price = parse_units(&request.initial_buy_price, quote_token.token_decimals)?;

        let quote = self
            .client
            .platform()
            .premarket_buy_amount(&PremarketRequest {
                blockchain_key: blockchain.key.clone(),
                quote_token_id: request.quote_token_id.clone(),
                price: request.initial_buy_price.clone(),
            })
            .await?;
        let amounts = apply_quote(network, &lock, exact_price, &quote, quote_token.token_decimals)?;

        let factory_address = blockchain
            .token_factory_contract_address
            .clone()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                SdkError::Configuration(format!(
                    "Blockchain {} has no token factory address",
                    blockchain.key
                ))
            })?;

        let metadata_url = match network {
            Network::Solana => {
                progress.enter(DeployState::BuildingMetadata);
                let uploaded = self
                    .client
                    .platform()
                    .upload_token_metadata(&request.metadata_upload(&blockchain.key))
                    .await?;
                Some(uploaded.token_metadata_url)
            }
            Network::Evm => None,
        };

        let params = CreateTokenParams {
            name: request.token_name.clone(),
            symbol: request.token_symbol.clone(),
            is_locked: lock.is_locked,
            amount_locked: if lock.is_locked {
                amounts.amount_locked.clone()
            } else {
                "0".to_string()
            },
            time_locked: lock.time_locked,
            initial_buy_amount: amounts.initial_buy_amount,
            factory_address: factory_address.clone(),
            max_supply: quote.base_token_supply.clone(),
            metadata_url,
            creation_fee: blockchain.token_creation_fee.clone(),
        };

        progress.enter(DeployState::Submitting);
        let (creation, event_error) = match network {
            Network::Evm => self.submit_and_await(&factory_address, &params, progress).await?,
            Network::Solana => (wallet.create_token(&params).await?, None),
        };

        // The hash is recorded even when the event never arrived.
        progress.enter(DeployState::Recording);
        let record = self
            .record(request, &blockchain, &lock, &amounts.amount_locked, &creation)
            .await?;
        if let Some(e) = event_error {
            return Err(e.into());
        }

        let tx_hashes = creation.tx_hashes();
        Ok(match creation.vesting {
            VestingStatus::Failed(error) => {
                tracing::warn!(creation_tx = %creation.creation_tx, %error, "Token deployed without vesting");
                DeploymentOutcome::PartialSuccess {
                    creation_tx: creation.creation_tx,
                    error,
                    record,
                }
            }
            _ => DeploymentOutcome::Completed { tx_hashes, record },
        })
    }

    /// Subscribe on the factory, then submit. Both are awaited together.
    ///
    /// A failed submission is an error; a failed wait is returned alongside
    /// the submitted transaction.
    async fn submit_and_await(
        &self,
        factory_address: &str,
        params: &CreateTokenParams,
        progress: &mut Progress,
    ) -> SdkResult<(TokenCreation, Option<WsError>)> {
        let mut pending = self
            .client
            .listener()
            .subscribe(factory_address, AwaitIntent::Deployment)
            .await?;

        progress.enter(DeployState::AwaitingEvent);
        let (event, creation) = pending
            .wait_alongside(self.client.wallet().create_token(params))
            .await;

        let creation = creation?;
        match event {
            Ok(event) => {
                tracing::info!(tx_hash = %creation.creation_tx, kind = %event.kind, "Deployment confirmed");
                Ok((creation, None))
            }
            Err(e) => {
                tracing::warn!(
                    tx_hash = %creation.creation_tx,
                    error = %e,
                    "Transaction sent but no deployment event"
                );
                Ok((creation, Some(e)))
            }
        }
    }

    async fn record(
        &self,
        mut request: DeployTokenRequest,
        blockchain: &NetworkInfo,
        lock: &NormalizedLock,
        amount_locked: &str,
        creation: &TokenCreation,
    ) -> SdkResult<serde_json::Value> {
        if request.blockchain_key.is_empty() {
            request.blockchain_key = blockchain.key.clone();
        }
        if request.token_address.is_none() {
            request.token_address = creation.mint.clone();
        }
        request.is_locked = lock.is_locked;
        request.amount_locked = Some(if lock.is_locked {
            amount_locked.to_string()
        } else {
            "0".to_string()
        });
        request.time_locked = Some(lock.time_locked);
        request.tx_hash = Some(creation.tx_hashes());

        Ok(self.client.platform().create_token(&request).await?)
    }
}
