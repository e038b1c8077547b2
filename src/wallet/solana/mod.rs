//! Solana wallet: nonblocking RPC client and ed25519 keypair.
//!
//! A token launch is one atomic transaction (see
//! [`build_token_launch_ixs`]). A locked launch is followed by a separate
//! vesting transaction; if that one fails the token still exists and the
//! failure is reported through [`VestingStatus::Failed`].

pub mod siws;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::Transaction;

use crate::error::{ChainError, SdkError, SdkResult};
use crate::network::{is_solana_mainnet, DEFAULT_BASE_ORIGIN};
use crate::program::{
    build_token_deposit_ixs, build_token_launch_ixs, build_vesting_create_ix, TokenLaunchPlan,
    VestingAccounts, VestingCreateRequest, MINT_SIZE, TOKEN_DECIMALS, VESTING_DEVNET_PROGRAM_ID,
    VESTING_MAINNET_PROGRAM_ID,
};
use crate::shared::{future_epoch_in_minutes, parse_units_u64};
use crate::wallet::keys::parse_solana_keypair;
use crate::wallet::{
    domain_and_origin, require, CreateTokenParams, Network, SignInParams, TokenCreation,
    VestingStatus, WalletCapability, WalletConfig,
};

use self::siws::SignInPayload;

const LAMPORT_DECIMALS: u8 = 9;

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Construction parameters of a [`SolanaWallet`].
#[derive(Debug, Clone, Default)]
pub struct SolanaWalletOptions {
    pub server_url: String,
    /// JSON byte array, hex, base58 or base64 of the 64-byte secret key.
    pub private_key: String,
    /// `devnet`, `testnet` or `mainnet-beta`.
    pub cluster: String,
    pub rpc_url: String,
}

pub struct SolanaWallet {
    config: WalletConfig,
    rpc: RpcClient,
    keypair: Keypair,
}

impl std::fmt::Debug for SolanaWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaWallet")
            .field("config", &self.config)
            .field("rpc_url", &self.rpc.url())
            .finish_non_exhaustive()
    }
}

fn parse_pubkey(value: &str, what: &str) -> SdkResult<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| SdkError::Validation(format!("Invalid {} '{}': {}", what, value, e)))
}

/// Supply minted by a launch and the amount moved to the fee recipient, as
/// `(supply, transfer_amount)`.
///
/// An unlocked launch hands over the full supply. A locked launch hands
/// over `amount_locked`, which the deployment flow has already derived
/// from the supply; the remainder stays with the creator for the vesting
/// stream.
pub fn launch_amounts(params: &CreateTokenParams) -> SdkResult<(u64, u64)> {
    let supply: u64 = params
        .max_supply
        .trim()
        .parse()
        .map_err(|e| SdkError::Validation(format!("Invalid max supply '{}': {}", params.max_supply, e)))?;
    let transfer_amount = if params.is_locked {
        params
            .amount_locked
            .trim()
            .parse::<u64>()
            .map_err(|e| SdkError::Validation(format!("Invalid locked amount '{}': {}", params.amount_locked, e)))?
    } else {
        supply
    };
    if transfer_amount > supply {
        return Err(SdkError::InsufficientFunds(format!(
            "transfer of {} exceeds supply {}",
            transfer_amount, supply
        )));
    }
    Ok((supply, transfer_amount))
}

impl SolanaWallet {
    /// Validate every option before opening the RPC client.
    pub fn new(options: SolanaWalletOptions) -> SdkResult<Self> {
        let server_url = require(&options.server_url, "serverUrl")?;
        let private_key = require(&options.private_key, "privateKey")?;
        let cluster = require(&options.cluster, "cluster")?;
        let rpc_url = require(&options.rpc_url, "rpcUrl")?;

        let (domain, _) = domain_and_origin(server_url)?;
        let keypair = parse_solana_keypair(private_key)?;
        let rpc = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::finalized());

        Ok(Self {
            config: WalletConfig {
                network: Network::Solana,
                address: keypair.pubkey().to_string(),
                domain,
                origin: DEFAULT_BASE_ORIGIN.to_string(),
                chain_id: None,
                cluster: Some(cluster.to_string()),
            },
            rpc,
            keypair,
        })
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Sign with the wallet plus any extra signers, submit, and wait for
    /// `commitment`.
    ///
    /// An on-chain failure is an error as soon as the status reports it.
    /// Until the transaction lands, the wait is bounded by the blockhash
    /// lifetime; afterwards it lasts until `commitment` is reached.
    async fn submit(
        &self,
        ixs: &[Instruction],
        extra_signers: &[&Keypair],
        commitment: CommitmentConfig,
    ) -> SdkResult<Signature> {
        let blockhash = self.rpc.get_latest_blockhash().await.map_err(ChainError::from)?;

        let mut signers: Vec<&Keypair> = Vec::with_capacity(1 + extra_signers.len());
        signers.push(&self.keypair);
        signers.extend_from_slice(extra_signers);

        let tx = Transaction::new_signed_with_payer(ixs, Some(&self.pubkey()), signers.as_slice(), blockhash);

        let signature = self.rpc.send_transaction(&tx).await.map_err(ChainError::from)?;
        tracing::info!(%signature, instructions = ixs.len(), "Transaction submitted");

        loop {
            let statuses = self
                .rpc
                .get_signature_statuses(&[signature])
                .await
                .map_err(ChainError::from)?
                .value;

            match statuses.into_iter().next().flatten() {
                Some(status) => {
                    if let Some(err) = &status.err {
                        tracing::error!(%signature, slot = status.slot, "Transaction failed: {}", err);
                        return Err(ChainError::Failed {
                            tx_hash: signature.to_string(),
                            reason: err.to_string(),
                        }
                        .into());
                    }
                    if status.satisfies_commitment(commitment) {
                        break;
                    }
                    // Landed; the blockhash no longer bounds the wait.
                }
                None => {
                    let live = self
                        .rpc
                        .is_blockhash_valid(&blockhash, CommitmentConfig::processed())
                        .await
                        .map_err(ChainError::from)?;
                    if !live {
                        tracing::warn!(%signature, "Blockhash expired before the transaction landed");
                        return Err(ChainError::Expired {
                            tx_hash: signature.to_string(),
                        }
                        .into());
                    }
                }
            }
            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
        tracing::info!(%signature, commitment = ?commitment.commitment, "Transaction confirmed");

        Ok(signature)
    }

    async fn vesting_program_id(&self) -> SdkResult<Pubkey> {
        let genesis = self.rpc.get_genesis_hash().await.map_err(ChainError::from)?;
        Ok(if is_solana_mainnet(&genesis.to_string()) {
            *VESTING_MAINNET_PROGRAM_ID
        } else {
            *VESTING_DEVNET_PROGRAM_ID
        })
    }

    async fn create_vesting(&self, mint: &Pubkey, params: &CreateTokenParams) -> SdkResult<String> {
        let program_id = self.vesting_program_id().await?;
        let stream_metadata = Keypair::new();

        let request = VestingCreateRequest::new(
            future_epoch_in_minutes(params.time_locked),
            params.initial_buy_amount,
        );
        let ix = build_vesting_create_ix(
            &VestingAccounts {
                sender: self.pubkey(),
                stream_metadata: stream_metadata.pubkey(),
                mint: *mint,
            },
            &request,
            &program_id,
        );

        tracing::info!(
            %mint,
            stream = %stream_metadata.pubkey(),
            start_time = request.start_time,
            amount = request.net_amount_deposited,
            "Creating vesting stream"
        );

        let signature = self
            .submit(&[ix], &[&stream_metadata], CommitmentConfig::confirmed())
            .await?;
        Ok(signature.to_string())
    }
}

#[async_trait]
impl WalletCapability for SolanaWallet {
    fn config(&self) -> &WalletConfig {
        &self.config
    }

    async fn sign_message(&self, params: &SignInParams) -> SdkResult<String> {
        let payload = SignInPayload::new(params, &self.config.address, Utc::now());
        let signature = self.keypair.sign_message(payload.to_message().as_bytes());
        let json = serde_json::to_vec(&payload)?;
        Ok(format!(
            "solana.{}.{}",
            base64::engine::general_purpose::STANDARD.encode(json),
            bs58::encode(signature).into_string()
        ))
    }

    async fn genesis_hash(&self) -> SdkResult<Option<String>> {
        let hash = self.rpc.get_genesis_hash().await.map_err(ChainError::from)?;
        Ok(Some(hash.to_string()))
    }

    async fn create_token(&self, params: &CreateTokenParams) -> SdkResult<TokenCreation> {
        let uri = params
            .metadata_url
            .as_deref()
            .ok_or_else(|| SdkError::Configuration("metadata url is required on Solana".into()))?;
        let creation_fee = params
            .creation_fee
            .as_deref()
            .ok_or_else(|| SdkError::Configuration("token creation fee is required on Solana".into()))?;

        let fee_recipient = parse_pubkey(&params.factory_address, "factory address")?;
        let (supply, transfer_amount) = launch_amounts(params)?;

        let rent_lamports = self
            .rpc
            .get_minimum_balance_for_rent_exemption(MINT_SIZE as usize)
            .await
            .map_err(ChainError::from)?;

        let mint = Keypair::new();
        let plan = TokenLaunchPlan {
            payer: self.pubkey(),
            mint: mint.pubkey(),
            fee_recipient,
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            uri: uri.to_string(),
            supply,
            rent_lamports,
            fee_lamports: parse_units_u64(creation_fee, TOKEN_DECIMALS)?,
            transfer_amount,
        };
        let ixs = build_token_launch_ixs(&plan)?;

        tracing::info!(
            mint = %plan.mint,
            supply,
            transfer_amount,
            locked = params.is_locked,
            "Launching token"
        );

        let signature = self
            .submit(&ixs, &[&mint], CommitmentConfig::finalized())
            .await?;

        let vesting = if params.is_locked {
            match self.create_vesting(&plan.mint, params).await {
                Ok(sig) => VestingStatus::Created(sig),
                Err(e) => {
                    tracing::warn!(
                        mint = %plan.mint,
                        creation_tx = %signature,
                        error = %e,
                        "Token created but vesting stream failed"
                    );
                    VestingStatus::Failed(e)
                }
            }
        } else {
            VestingStatus::NotRequested
        };

        Ok(TokenCreation {
            creation_tx: signature.to_string(),
            mint: Some(plan.mint.to_string()),
            vesting,
        })
    }

    async fn deposit(&self, deposit_address: &str, amount: &str) -> SdkResult<String> {
        let recipient = parse_pubkey(deposit_address, "deposit address")?;
        let lamports = parse_units_u64(amount, LAMPORT_DECIMALS)?;

        let ix = solana_system_interface::instruction::transfer(&self.pubkey(), &recipient, lamports);
        let signature = self
            .submit(&[ix], &[], CommitmentConfig::confirmed())
            .await?;
        Ok(signature.to_string())
    }

    async fn deposit_token(
        &self,
        deposit_address: &str,
        amount: &str,
        token_address: &str,
        decimals: u8,
    ) -> SdkResult<String> {
        let recipient = parse_pubkey(deposit_address, "deposit address")?;
        let mint = parse_pubkey(token_address, "token address")?;
        let raw = parse_units_u64(amount, decimals)?;

        let ixs = build_token_deposit_ixs(&self.pubkey(), &recipient, &mint, raw, decimals)?;
        let signature = self
            .submit(&ixs, &[], CommitmentConfig::confirmed())
            .await?;
        Ok(signature.to_string())
    }

    /// SPL transfers are signed by the owner directly; nothing to approve.
    async fn approve(&self, _: &str, _: &str, _: &str, _: u8) -> SdkResult<String> {
        Ok(String::new())
    }

    async fn allowance(&self, _: &str, _: &str) -> SdkResult<u128> {
        Ok(0)
    }
}
