//! Dual-network wallet abstraction.
//!
//! [`WalletCapability`] is the one contract the rest of the SDK talks to.
//! [`Wallet`] is the closed set of implementations, selected once at
//! construction:
//!
//! - [`EvmWallet`]: JSON-RPC provider, secp256k1 key, EIP-1559 transactions
//! - [`SolanaWallet`]: nonblocking RPC client, ed25519 keypair, one atomic
//!   creation transaction plus an optional vesting transaction
//!
//! The signer is used sequentially. Callers must not drive two
//! transactions through the same wallet at once.

pub mod evm;
pub mod keys;
pub mod solana;

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::error::{SdkError, SdkResult};

pub use evm::{EvmWallet, EvmWalletOptions};
pub use solana::{SolanaWallet, SolanaWalletOptions};

// ─── Network ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Evm,
    Solana,
}

impl Network {
    /// `blockchainType` value the platform expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Evm => "evm",
            Network::Solana => "solana",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Public, immutable view of a constructed wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub network: Network,
    /// Checksummed `0x…` for EVM, base58 for Solana.
    pub address: String,
    /// Host of the server URL.
    pub domain: String,
    /// Origin of the server URL.
    pub origin: String,
    /// EVM only.
    pub chain_id: Option<u64>,
    /// Solana only: `devnet`, `testnet` or `mainnet-beta`.
    pub cluster: Option<String>,
}

/// Split a server URL into `(domain, origin)`.
///
/// The domain is the normalized host (lowercase, no port); the origin drops
/// default ports the same way a browser does.
pub(crate) fn domain_and_origin(server_url: &str) -> SdkResult<(String, String)> {
    let invalid = || SdkError::Configuration(format!("Invalid server url: {}", server_url));

    let url = Url::parse(server_url.trim()).map_err(|_| invalid())?;
    let origin = url.origin();
    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    if !origin.is_tuple() {
        return Err(invalid());
    }

    Ok((host.to_string(), origin.ascii_serialization()))
}

/// Reject an empty construction parameter.
pub(crate) fn require<'a>(value: &'a str, name: &str) -> SdkResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SdkError::Configuration(format!("{} is required", name)));
    }
    Ok(trimmed)
}

// ─── Operation parameters ────────────────────────────────────────────────────

/// Inputs of a sign-in message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInParams {
    pub statement: String,
    pub nonce: String,
    pub domain: String,
    pub uri: String,
}

/// Inputs of an on-chain token creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTokenParams {
    pub name: String,
    pub symbol: String,
    pub is_locked: bool,
    /// EVM: decimal string with 6 decimals. Solana: raw units.
    pub amount_locked: String,
    /// Minutes.
    pub time_locked: u64,
    /// Raw units deposited into the vesting stream (Solana).
    pub initial_buy_amount: u64,
    pub factory_address: String,
    /// Raw units minted (Solana).
    pub max_supply: String,
    /// Solana only.
    pub metadata_url: Option<String>,
    /// Decimal string (Solana).
    pub creation_fee: Option<String>,
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// State of the optional second (vesting) transaction.
#[derive(Debug)]
pub enum VestingStatus {
    NotRequested,
    Created(String),
    /// The creation transaction is final but the stream was not created.
    Failed(SdkError),
}

/// Result of `create_token`.
#[derive(Debug)]
pub struct TokenCreation {
    pub creation_tx: String,
    /// Mint address (Solana).
    pub mint: Option<String>,
    pub vesting: VestingStatus,
}

impl TokenCreation {
    pub fn single(creation_tx: impl Into<String>) -> Self {
        Self {
            creation_tx: creation_tx.into(),
            mint: None,
            vesting: VestingStatus::NotRequested,
        }
    }

    /// Creation hash, followed by the vesting hash when one exists, joined by `,`.
    pub fn tx_hashes(&self) -> String {
        match &self.vesting {
            VestingStatus::Created(vesting) => format!("{},{}", self.creation_tx, vesting),
            _ => self.creation_tx.clone(),
        }
    }
}

// ─── Capability ──────────────────────────────────────────────────────────────

/// What every wallet variant can do.
#[async_trait]
pub trait WalletCapability: Send + Sync {
    fn config(&self) -> &WalletConfig;

    fn address(&self) -> &str {
        &self.config().address
    }

    /// Sign-in signature in the `<network>.<payload>.<signature>` format.
    async fn sign_message(&self, params: &SignInParams) -> SdkResult<String>;

    /// Genesis hash of the connected cluster (Solana), used for blockchain
    /// selection.
    async fn genesis_hash(&self) -> SdkResult<Option<String>> {
        Ok(None)
    }

    async fn create_token(&self, params: &CreateTokenParams) -> SdkResult<TokenCreation>;

    /// Deposit native currency. Returns once confirmed.
    async fn deposit(&self, deposit_address: &str, amount: &str) -> SdkResult<String>;

    /// Deposit a fungible token. Returns once confirmed.
    async fn deposit_token(
        &self,
        deposit_address: &str,
        amount: &str,
        token_address: &str,
        decimals: u8,
    ) -> SdkResult<String>;

    async fn approve(
        &self,
        amount: &str,
        spender: &str,
        token_address: &str,
        decimals: u8,
    ) -> SdkResult<String>;

    async fn allowance(&self, spender: &str, token_address: &str) -> SdkResult<u128>;
}

// ─── Closed variant set ──────────────────────────────────────────────────────

pub enum Wallet {
    Evm(EvmWallet),
    Solana(SolanaWallet),
}

impl Wallet {
    pub fn evm(options: EvmWalletOptions) -> SdkResult<Self> {
        Ok(Wallet::Evm(EvmWallet::new(options)?))
    }

    pub fn solana(options: SolanaWalletOptions) -> SdkResult<Self> {
        Ok(Wallet::Solana(SolanaWallet::new(options)?))
    }

    pub fn network(&self) -> Network {
        match self {
            Wallet::Evm(_) => Network::Evm,
            Wallet::Solana(_) => Network::Solana,
        }
    }

    fn inner(&self) -> &dyn WalletCapability {
        match self {
            Wallet::Evm(w) => w,
            Wallet::Solana(w) => w,
        }
    }
}

#[async_trait]
impl WalletCapability for Wallet {
    fn config(&self) -> &WalletConfig {
        self.inner().config()
    }

    async fn sign_message(&self, params: &SignInParams) -> SdkResult<String> {
        self.inner().sign_message(params).await
    }

    async fn genesis_hash(&self) -> SdkResult<Option<String>> {
        self.inner().genesis_hash().await
    }

    async fn create_token(&self, params: &CreateTokenParams) -> SdkResult<TokenCreation> {
        self.inner().create_token(params).await
    }

    async fn deposit(&self, deposit_address: &str, amount: &str) -> SdkResult<String> {
        self.inner().deposit(deposit_address, amount).await
    }

    async fn deposit_token(
        &self,
        deposit_address: &str,
        amount: &str,
        token_address: &str,
        decimals: u8,
    ) -> SdkResult<String> {
        self.inner()
            .deposit_token(deposit_address, amount, token_address, decimals)
            .await
    }

    async fn approve(
        &self,
        amount: &str,
        spender: &str,
        token_address: &str,
        decimals: u8,
    ) -> SdkResult<String> {
        self.inner()
            .approve(amount, spender, token_address, decimals)
            .await
    }

    async fn allowance(&self, spender: &str, token_address: &str) -> SdkResult<u128> {
        self.inner().allowance(spender, token_address).await
    }
}
