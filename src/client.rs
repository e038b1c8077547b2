//! High-level client: `LaunchClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`; sign-in
//! lives in `auth/client.rs`. This module keeps the builder, the selected
//! blockchain cache, and the accessor methods.

use std::sync::Arc;

use async_lock::RwLock;

use crate::auth::client::Auth;
use crate::domain::deployment::client::Deployments;
use crate::domain::deposit::client::Deposits;
use crate::domain::market::client::Markets;
use crate::domain::withdrawal::client::Withdrawals;
use crate::error::{HttpError, SdkError, SdkResult};
use crate::http::wire::{AccountQuery, NetworkInfo, TokenBalanceInfo};
use crate::http::{PlatformApi, PlatformHttp};
use crate::network::SOLANA_MAINNET_GENESIS_HASH;
use crate::wallet::{Network, WalletCapability};
use crate::ws::{EventListener, ListenerConfig};

pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::deployment::client::Deployments as DeploymentsClient;
pub use crate::domain::deposit::client::Deposits as DepositsClient;
pub use crate::domain::market::client::Markets as MarketsClient;
pub use crate::domain::withdrawal::client::Withdrawals as WithdrawalsClient;

/// The primary entry point of the SDK.
///
/// One client is bound to one wallet; the blockchain it deploys to is
/// derived from that wallet and cached after the first lookup.
pub struct LaunchClient {
    pub(crate) platform: Arc<dyn PlatformApi>,
    pub(crate) wallet: Arc<dyn WalletCapability>,
    pub(crate) listener: EventListener,
    pub(crate) blockchain_cache: Arc<RwLock<Option<NetworkInfo>>>,
}

impl LaunchClient {
    pub fn builder() -> LaunchClientBuilder {
        LaunchClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn deployments(&self) -> Deployments<'_> {
        Deployments { client: self }
    }

    pub fn deposits(&self) -> Deposits<'_> {
        Deposits { client: self }
    }

    pub fn withdrawals(&self) -> Withdrawals<'_> {
        Withdrawals { client: self }
    }

    pub fn markets(&self) -> Markets<'_> {
        Markets { client: self }
    }

    // ── Shared state ─────────────────────────────────────────────────────

    pub fn wallet(&self) -> &dyn WalletCapability {
        self.wallet.as_ref()
    }

    pub fn platform(&self) -> &dyn PlatformApi {
        self.platform.as_ref()
    }

    pub fn listener(&self) -> &EventListener {
        &self.listener
    }

    /// The platform blockchain this wallet deploys to. Fetched once.
    pub async fn blockchain(&self) -> SdkResult<NetworkInfo> {
        if let Some(cached) = self.blockchain_cache.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let list = self.platform.blockchains().await?;
        let config = self.wallet.config();
        let genesis = match config.network {
            Network::Solana => self.wallet.genesis_hash().await?,
            Network::Evm => None,
        };
        let selected = select_blockchain(&list, config.network, genesis.as_deref(), config.chain_id)?
            .clone();

        tracing::debug!(key = %selected.key, "Blockchain selected");
        *self.blockchain_cache.write().await = Some(selected.clone());
        Ok(selected)
    }

    /// Platform balances of the wallet on the selected blockchain.
    pub async fn account_balances(&self) -> SdkResult<Vec<TokenBalanceInfo>> {
        let blockchain = self.blockchain().await?;
        let query = AccountQuery {
            blockchain_key: blockchain.key,
            user_address: self.wallet.address().to_string(),
            limit: None,
            page: None,
        };
        Ok(self.platform.accounts(&query).await?)
    }

    /// Fail fast when the platform server does not answer.
    pub async fn check_server(&self) -> SdkResult<()> {
        let status = self.platform.server_status().await;
        if status.up {
            return Ok(());
        }
        let reason = status.error.unwrap_or_else(|| "unknown".into());
        tracing::warn!(status = ?status.status, %reason, "Platform server is down");
        Err(HttpError::Unavailable(reason).into())
    }

    /// Drop the cached blockchain so the next call fetches it again.
    pub async fn clear_cache(&self) {
        *self.blockchain_cache.write().await = None;
    }
}

impl Clone for LaunchClient {
    fn clone(&self) -> Self {
        Self {
            platform: Arc::clone(&self.platform),
            wallet: Arc::clone(&self.wallet),
            listener: self.listener.clone(),
            blockchain_cache: Arc::clone(&self.blockchain_cache),
        }
    }
}

/// Pick the one platform blockchain matching a wallet.
///
/// - Solana on mainnet: key starts with `solana:<mainnet genesis>`.
/// - Solana elsewhere: a `solana*` key not ending in the mainnet genesis.
/// - EVM: key ends in `:<chain id>`.
pub fn select_blockchain<'a>(
    list: &'a [NetworkInfo],
    network: Network,
    genesis_hash: Option<&str>,
    chain_id: Option<u64>,
) -> SdkResult<&'a NetworkInfo> {
    let candidates: Vec<&NetworkInfo> = match network {
        Network::Solana => {
            let genesis = genesis_hash.ok_or_else(|| {
                SdkError::Configuration("genesis hash is required for Solana".into())
            })?;
            if crate::network::is_solana_mainnet(genesis) {
                let prefix = format!("solana:{}", SOLANA_MAINNET_GENESIS_HASH);
                list.iter().filter(|b| b.key.starts_with(&prefix)).collect()
            } else {
                list.iter()
                    .filter(|b| {
                        b.key.starts_with("solana") && !b.key.ends_with(SOLANA_MAINNET_GENESIS_HASH)
                    })
                    .collect()
            }
        }
        Network::Evm => {
            let chain_id = chain_id
                .ok_or_else(|| SdkError::Configuration("chain id is required for EVM".into()))?;
            let suffix = format!(":{}", chain_id);
            list.iter().filter(|b| b.key.ends_with(&suffix)).collect()
        }
    };

    match candidates.as_slice() {
        [one] => Ok(one),
        [] => Err(SdkError::Configuration(format!(
            "No platform blockchain matches this {} wallet",
            network
        ))),
        many => Err(SdkError::Configuration(format!(
            "{} platform blockchains match this {} wallet",
            many.len(),
            network
        ))),
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct LaunchClientBuilder {
    server_url: Option<String>,
    websocket_url: Option<String>,
    wallet: Option<Arc<dyn WalletCapability>>,
    platform: Option<Arc<dyn PlatformApi>>,
    connect_timeout: Option<std::time::Duration>,
}

impl LaunchClientBuilder {
    /// Platform server; API calls go to `<server_url>/api/v1`.
    pub fn server_url(mut self, url: &str) -> Self {
        self.server_url = Some(url.to_string());
        self
    }

    pub fn websocket_url(mut self, url: &str) -> Self {
        self.websocket_url = Some(url.to_string());
        self
    }

    pub fn wallet(mut self, wallet: impl WalletCapability + 'static) -> Self {
        self.wallet = Some(Arc::new(wallet));
        self
    }

    pub fn shared_wallet(mut self, wallet: Arc<dyn WalletCapability>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Replace the HTTP platform client, e.g. with an in-memory fake.
    pub fn platform(mut self, platform: Arc<dyn PlatformApi>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Bound on the event socket handshake.
    pub fn connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> SdkResult<LaunchClient> {
        let wallet = self
            .wallet
            .ok_or_else(|| SdkError::Configuration("wallet is required".into()))?;
        let websocket_url = self
            .websocket_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| SdkError::Configuration("websocketUrl is required".into()))?;

        let platform: Arc<dyn PlatformApi> = match self.platform {
            Some(platform) => platform,
            None => {
                let server_url = self
                    .server_url
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| SdkError::Configuration("serverUrl is required".into()))?;
                Arc::new(PlatformHttp::new(&server_url)?)
            }
        };

        let mut listener_config = ListenerConfig::new(websocket_url, wallet.address());
        if let Some(timeout) = self.connect_timeout {
            listener_config = listener_config.with_connect_timeout(timeout);
        }

        Ok(LaunchClient {
            platform,
            wallet,
            listener: EventListener::new(listener_config),
            blockchain_cache: Arc::new(RwLock::new(None)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(key: &str) -> NetworkInfo {
        NetworkInfo {
            key: key.to_string(),
            ..Default::default()
        }
    }

    fn list() -> Vec<NetworkInfo> {
        vec![
            info("eip155:97"),
            info("eip155:56"),
            info(&format!("solana:{}", SOLANA_MAINNET_GENESIS_HASH)),
            info("solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1"),
        ]
    }

    #[test]
    fn test_select_evm_by_chain_id() {
        let list = list();
        let selected = select_blockchain(&list, Network::Evm, None, Some(97)).unwrap();
        assert_eq!(selected.key, "eip155:97");
    }

    #[test]
    fn test_select_evm_requires_unique_match() {
        let list = list();
        assert!(matches!(
            select_blockchain(&list, Network::Evm, None, Some(1)),
            Err(SdkError::Configuration(_))
        ));
        assert!(matches!(
            select_blockchain(&list, Network::Evm, None, None),
            Err(SdkError::Configuration(_))
        ));
    }

    #[test]
    fn test_select_solana_mainnet() {
        let list = list();
        let selected =
            select_blockchain(&list, Network::Solana, Some(SOLANA_MAINNET_GENESIS_HASH), None)
                .unwrap();
        assert!(selected.key.ends_with(SOLANA_MAINNET_GENESIS_HASH));
    }

    #[test]
    fn test_select_solana_devnet() {
        let list = list();
        let selected = select_blockchain(
            &list,
            Network::Solana,
            Some("EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG"),
            None,
        )
        .unwrap();
        assert_eq!(selected.key, "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1");
    }

    #[test]
    fn test_select_solana_rejects_ambiguous() {
        let mut list = list();
        list.push(info("solana:4uhcVJyU9pJkvQyS88uRDiswHXSCkY3z"));
        assert!(matches!(
            select_blockchain(&list, Network::Solana, Some("devnet-genesis"), None),
            Err(SdkError::Configuration(_))
        ));
    }
}
