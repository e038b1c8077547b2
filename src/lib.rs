//! # Token Launch SDK
//!
//! Deploy fungible tokens on EVM chains and Solana through one wallet
//! abstraction, and confirm them through the platform's event socket.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: instruction codecs, PDAs, unit scaling, errors (always available, no I/O)
//! 2. **Wallet**: `WalletCapability` with an EVM and a Solana variant
//! 3. **HTTP API**: `PlatformApi` and its `reqwest` implementation
//! 4. **Event listener**: single-shot subscription over `tokio-tungstenite`
//! 5. **High-Level Client**: `LaunchClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use token_launch_sdk::prelude::*;
//!
//! let wallet = Wallet::evm(EvmWalletOptions {
//!     server_url: "https://api.example.com".into(),
//!     private_key: std::env::var("PRIVATE_KEY")?,
//!     chain_id: Some(97),
//!     rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545".into(),
//! })?;
//!
//! let client = LaunchClient::builder()
//!     .server_url("https://api.example.com")
//!     .websocket_url("wss://ws.example.com")
//!     .wallet(wallet)
//!     .build()?;
//!
//! client.auth().sign_in().await?;
//! let outcome = client.deployments().deploy(request).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Unit scaling and time helpers.
pub mod shared;

/// On-chain program interaction: instruction codecs, PDAs, transaction assembly.
pub mod program;

/// Unified SDK error types.
pub mod error;

/// Network constants.
pub mod network;

// ── Layer 2: Wallet ──────────────────────────────────────────────────────────

/// Dual-network wallet abstraction.
#[cfg(all(feature = "native-auth", feature = "evm", feature = "solana-rpc"))]
pub mod wallet;

/// Sign-in message parameters and sessions.
#[cfg(all(feature = "native-auth", feature = "evm", feature = "solana-rpc"))]
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// Platform REST client.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: Event listener ──────────────────────────────────────────────────

/// Event subscription: wire messages and the listener state machine.
pub mod ws;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// Deployment and deposit slices.
#[cfg(feature = "native")]
pub mod domain;

/// `LaunchClient`, the primary entry point.
#[cfg(feature = "native")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Errors
    pub use crate::error::{ChainError, HttpError, InstructionError, SdkError, SdkResult, WsError};

    // Network
    pub use crate::network::{DEFAULT_BASE_ORIGIN, SOLANA_MAINNET_GENESIS_HASH};

    // Instruction codecs
    pub use crate::program::{
        decode_vesting_create, encode_metadata_create, encode_vesting_create,
        MetadataCreateRequest, VestingCreateData, VestingCreateRequest,
    };

    // Unit scaling
    pub use crate::shared::{parse_units, parse_units_u64};

    // Events
    pub use crate::ws::{AwaitIntent, DepositEvent, EventKind, ListenerConfig, ListenerEvent};
    #[cfg(feature = "ws-native")]
    pub use crate::ws::{CancelHandle, EventListener, PendingEvent};

    // Wallets
    #[cfg(all(feature = "native-auth", feature = "evm", feature = "solana-rpc"))]
    pub use crate::wallet::{
        CreateTokenParams, EvmWallet, EvmWalletOptions, Network, SignInParams, SolanaWallet,
        SolanaWalletOptions, TokenCreation, VestingStatus, Wallet, WalletCapability,
        WalletConfig,
    };

    // HTTP
    #[cfg(feature = "http")]
    pub use crate::http::wire::{
        DeployTokenRequest, DepositQuery, EstimateKind, EstimateRequest, MarketQuery, NetworkInfo,
        OrderRequest, OrderSide, TokenBalanceInfo, TradeQuery, WithdrawalQuery, WithdrawalRequest,
    };
    #[cfg(feature = "http")]
    pub use crate::http::{PlatformApi, PlatformHttp};

    // High-level client + sub-clients
    #[cfg(feature = "native")]
    pub use crate::auth::Session;
    #[cfg(feature = "native")]
    pub use crate::client::{
        AuthClient, DeploymentsClient, DepositsClient, LaunchClient, LaunchClientBuilder,
        MarketsClient, WithdrawalsClient,
    };
    #[cfg(feature = "native")]
    pub use crate::domain::deployment::{DeploymentOutcome, NormalizedLock};
    #[cfg(feature = "native")]
    pub use crate::domain::deposit::{DepositReceipt, DepositRequest};
}
