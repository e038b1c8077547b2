//! Authentication: sign-in message parameters and the signed session.
//!
//! The platform authenticates a wallet by a signature over a one-month
//! sign-in message. The signature string (`evm.…` / `solana.…`) is then sent
//! as `Authorization: Bearer <signature>` on every request.

#[cfg(feature = "native")]
pub mod client;

use crate::network::{DEFAULT_BASE_ORIGIN, EVM_SIGN_IN_STATEMENT, SOLANA_SIGN_IN_STATEMENT};
use crate::wallet::{Network, SignInParams, WalletConfig};

/// Statement shown to the user in the sign-in message.
pub fn sign_in_statement(network: Network) -> &'static str {
    match network {
        Network::Evm => EVM_SIGN_IN_STATEMENT,
        Network::Solana => SOLANA_SIGN_IN_STATEMENT,
    }
}

/// Sign-in parameters for `config` with a server-issued `nonce`.
pub fn sign_in_params(config: &WalletConfig, nonce: impl Into<String>) -> SignInParams {
    let uri = if config.origin.is_empty() {
        DEFAULT_BASE_ORIGIN.to_string()
    } else {
        config.origin.clone()
    };
    SignInParams {
        statement: sign_in_statement(config.network).to_string(),
        nonce: nonce.into(),
        domain: config.domain.clone(),
        uri,
    }
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    /// The bearer signature installed on the platform client.
    pub signature: String,
    /// Body of `GET /auth-check`.
    pub profile: serde_json::Value,
}
