//! Network constants: platform URLs, cluster identities, supported EVM chains.

/// Origin used as the URI of sign-in messages.
pub const DEFAULT_BASE_ORIGIN: &str = "https://app.nusabyte.com";

/// Path appended to the server URL for every platform API call.
pub const API_PATH: &str = "/api/v1";

/// Genesis hash of Solana mainnet-beta.
pub const SOLANA_MAINNET_GENESIS_HASH: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";

/// Sign-in statement for EVM wallets.
pub const EVM_SIGN_IN_STATEMENT: &str = "Sign in with Ethereum to the app";

/// Sign-in statement for Solana wallets.
pub const SOLANA_SIGN_IN_STATEMENT: &str = "Sign in with Solana to the app";

/// An EVM chain the platform deploys to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvmChain {
    pub name: &'static str,
    pub chain_id: u64,
}

/// EVM chains with a known token factory deployment.
pub const SUPPORTED_EVM_CHAINS: &[EvmChain] = &[
    EvmChain { name: "holesky", chain_id: 17000 },
    EvmChain { name: "peta", chain_id: 7676 },
    EvmChain { name: "bsc", chain_id: 56 },
    EvmChain { name: "bscTestnet", chain_id: 97 },
];

/// Look up a supported EVM chain by id.
pub fn evm_chain(chain_id: u64) -> Option<&'static EvmChain> {
    SUPPORTED_EVM_CHAINS.iter().find(|c| c.chain_id == chain_id)
}

/// Whether a Solana genesis hash identifies mainnet.
pub fn is_solana_mainnet(genesis_hash: &str) -> bool {
    genesis_hash == SOLANA_MAINNET_GENESIS_HASH
}
