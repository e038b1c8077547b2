//! EVM wallet: JSON-RPC provider, secp256k1 signer, EIP-1559 transactions.
//!
//! Contract calls are ABI-encoded locally and sent as raw signed
//! transactions. `create_token` returns as soon as the node accepts the
//! transaction; the deployment event is what signals completion.

pub mod abi;
pub mod address;
pub mod rpc;
pub mod siwe;
pub mod transaction;

use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use k256::ecdsa::SigningKey;

use crate::error::{SdkError, SdkResult};
use crate::network::{evm_chain, DEFAULT_BASE_ORIGIN};
use crate::shared::{future_epoch_in_minutes, parse_units};
use crate::wallet::keys::parse_evm_signing_key;
use crate::wallet::{
    domain_and_origin, require, CreateTokenParams, Network, SignInParams, TokenCreation,
    WalletCapability, WalletConfig,
};

use self::abi::{decode_uint, encode_call, AbiValue};
use self::address::{address_bytes, parse_address, to_checksum};
use self::rpc::{CallRequest, JsonRpcProvider};
use self::transaction::{sign_personal_message, Eip1559Transaction};

/// Decimals of the locked amount passed to `createToken`.
const LOCK_AMOUNT_DECIMALS: u8 = 6;
/// Decimals of the native currency.
const NATIVE_DECIMALS: u8 = 18;
/// Headroom applied on top of `eth_estimateGas`, in percent.
const GAS_LIMIT_MARGIN_PERCENT: u64 = 120;

/// Construction parameters of an [`EvmWallet`].
#[derive(Debug, Clone, Default)]
pub struct EvmWalletOptions {
    pub server_url: String,
    /// Hex, with or without `0x`.
    pub private_key: String,
    pub chain_id: Option<u64>,
    pub rpc_url: String,
}

pub struct EvmWallet {
    config: WalletConfig,
    chain_id: u64,
    provider: JsonRpcProvider,
    signer: SigningKey,
    address: [u8; 20],
}

impl std::fmt::Debug for EvmWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmWallet")
            .field("config", &self.config)
            .field("rpc_url", &self.provider.url())
            .finish_non_exhaustive()
    }
}

impl EvmWallet {
    /// Validate every option before building the provider.
    pub fn new(options: EvmWalletOptions) -> SdkResult<Self> {
        let server_url = require(&options.server_url, "serverUrl")?;
        let private_key = require(&options.private_key, "privateKey")?;
        let rpc_url = require(&options.rpc_url, "rpcUrl")?;
        let chain_id = options
            .chain_id
            .ok_or_else(|| SdkError::Configuration("chainId is required".into()))?;

        if evm_chain(chain_id).is_none() {
            tracing::warn!(chain_id, "Chain has no known token factory deployment");
        }

        let (domain, _) = domain_and_origin(server_url)?;
        let signer = parse_evm_signing_key(private_key)?;
        let address = address_bytes(signer.verifying_key());
        let provider = JsonRpcProvider::new(rpc_url)?;

        Ok(Self {
            config: WalletConfig {
                network: Network::Evm,
                address: to_checksum(&address),
                domain,
                origin: DEFAULT_BASE_ORIGIN.to_string(),
                chain_id: Some(chain_id),
                cluster: None,
            },
            chain_id,
            provider,
            signer,
            address,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn call_request(&self, to: &[u8; 20], value: u128, data: &[u8]) -> CallRequest {
        CallRequest::new(&self.config.address, to, value, data)
    }

    async fn read(&self, to: &[u8; 20], data: Vec<u8>) -> SdkResult<u128> {
        let output = self.provider.call(&self.call_request(to, 0, &data)).await?;
        decode_uint(&output)
    }

    /// Fill in nonce, gas and fees, sign, and broadcast. Returns the hash.
    async fn send_call(&self, to: &[u8; 20], value: u128, data: Vec<u8>) -> SdkResult<String> {
        let request = self.call_request(to, value, &data);

        let nonce = self.provider.pending_nonce(&self.config.address).await?;
        let estimate = self.provider.estimate_gas(&request).await?;
        let gas_limit = estimate.saturating_mul(GAS_LIMIT_MARGIN_PERCENT) / 100;
        let max_priority_fee_per_gas = self.provider.max_priority_fee().await?;
        let max_fee_per_gas = match self.provider.latest_base_fee().await? {
            Some(base_fee) => base_fee
                .checked_mul(2)
                .and_then(|fee| fee.checked_add(max_priority_fee_per_gas))
                .ok_or_else(|| SdkError::Overflow("max fee per gas".into()))?,
            None => self.provider.gas_price().await?,
        };

        let tx = Eip1559Transaction {
            chain_id: self.chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            to: *to,
            value,
            data,
        };
        let signed = tx.sign(&self.signer)?;

        let hash = self.provider.send_raw_transaction(&signed.raw_hex()).await?;
        tracing::info!(tx_hash = %hash, nonce, gas_limit, "Transaction submitted");
        Ok(hash)
    }

    async fn send_and_wait(&self, to: &[u8; 20], value: u128, data: Vec<u8>) -> SdkResult<String> {
        let hash = self.send_call(to, value, data).await?;
        self.provider.wait_for_receipt(&hash).await?;
        Ok(hash)
    }
}

#[async_trait]
impl WalletCapability for EvmWallet {
    fn config(&self) -> &WalletConfig {
        &self.config
    }

    async fn sign_message(&self, params: &SignInParams) -> SdkResult<String> {
        let message = siwe::sign_in_message(params, &self.config.address, self.chain_id, Utc::now());
        let signature = sign_personal_message(message.as_bytes(), &self.signer)?;
        Ok(format!(
            "evm.{}.0x{}",
            base64::engine::general_purpose::STANDARD.encode(message.as_bytes()),
            hex::encode(signature)
        ))
    }

    async fn create_token(&self, params: &CreateTokenParams) -> SdkResult<TokenCreation> {
        let factory = parse_address(&params.factory_address)?;

        let fee = self
            .read(&factory, encode_call(abi::GET_TOKEN_CREATION_FEE, &[]))
            .await?;

        let (amount_locked, locked_until) = if params.is_locked {
            (
                parse_units(&params.amount_locked, LOCK_AMOUNT_DECIMALS)?,
                future_epoch_in_minutes(params.time_locked) as u128,
            )
        } else {
            (0, 0)
        };

        tracing::info!(
            name = %params.name,
            symbol = %params.symbol,
            fee,
            amount_locked,
            locked_until,
            "Creating token"
        );

        let data = encode_call(
            abi::CREATE_TOKEN,
            &[
                AbiValue::String(params.name.clone()),
                AbiValue::String(params.symbol.clone()),
                AbiValue::Uint(amount_locked),
                AbiValue::Uint(locked_until),
            ],
        );
        let hash = self.send_call(&factory, fee, data).await?;
        Ok(TokenCreation::single(hash))
    }

    async fn deposit(&self, deposit_address: &str, amount: &str) -> SdkResult<String> {
        let payment = parse_address(deposit_address)?;
        let value = parse_units(amount, NATIVE_DECIMALS)?;
        self.send_and_wait(&payment, value, encode_call(abi::DEPOSIT, &[]))
            .await
    }

    async fn deposit_token(
        &self,
        deposit_address: &str,
        amount: &str,
        token_address: &str,
        decimals: u8,
    ) -> SdkResult<String> {
        let payment = parse_address(deposit_address)?;
        let token = parse_address(token_address)?;
        let raw = parse_units(amount, decimals)?;

        self.approve(amount, deposit_address, token_address, decimals)
            .await?;

        let data = encode_call(
            abi::DEPOSIT_TOKEN,
            &[AbiValue::Address(token), AbiValue::Uint(raw)],
        );
        self.send_and_wait(&payment, 0, data).await
    }

    async fn approve(
        &self,
        amount: &str,
        spender: &str,
        token_address: &str,
        decimals: u8,
    ) -> SdkResult<String> {
        let spender = parse_address(spender)?;
        let token = parse_address(token_address)?;
        let raw = parse_units(amount, decimals)?;

        let data = encode_call(
            abi::APPROVE,
            &[AbiValue::Address(spender), AbiValue::Uint(raw)],
        );
        self.send_and_wait(&token, 0, data).await
    }

    async fn allowance(&self, spender: &str, token_address: &str) -> SdkResult<u128> {
        let spender = parse_address(spender)?;
        let token = parse_address(token_address)?;
        let data = encode_call(
            abi::ALLOWANCE,
            &[AbiValue::Address(self.address), AbiValue::Address(spender)],
        );
        self.read(&token, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn options() -> EvmWalletOptions {
        EvmWalletOptions {
            server_url: "https://api.example.com".into(),
            private_key: KEY_ONE.into(),
            chain_id: Some(97),
            rpc_url: "http://127.0.0.1:8545".into(),
        }
    }

    #[test]
    fn test_new_builds_config() {
        let wallet = EvmWallet::new(options()).unwrap();
        let config = wallet.config();
        assert_eq!(config.network, Network::Evm);
        assert_eq!(config.address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
        assert_eq!(config.domain, "api.example.com");
        assert_eq!(config.origin, DEFAULT_BASE_ORIGIN);
        assert_eq!(config.chain_id, Some(97));
    }

    #[test]
    fn test_new_rejects_missing_options() {
        let mut missing_rpc = options();
        missing_rpc.rpc_url = String::new();
        assert!(matches!(EvmWallet::new(missing_rpc), Err(SdkError::Configuration(_))));

        let mut missing_chain = options();
        missing_chain.chain_id = None;
        assert!(matches!(EvmWallet::new(missing_chain), Err(SdkError::Configuration(_))));

        let mut missing_key = options();
        missing_key.private_key = " ".into();
        assert!(matches!(EvmWallet::new(missing_key), Err(SdkError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_sign_message_format() {
        let wallet = EvmWallet::new(options()).unwrap();
        let params = SignInParams {
            statement: "Sign in with Ethereum to the app".into(),
            nonce: "n0nce".into(),
            domain: "api.example.com".into(),
            uri: DEFAULT_BASE_ORIGIN.into(),
        };
        let signature = wallet.sign_message(&params).await.unwrap();

        let parts: Vec<&str> = signature.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "evm");

        let message = base64::engine::general_purpose::STANDARD
            .decode(parts[1])
            .unwrap();
        let message = String::from_utf8(message).unwrap();
        assert!(message.contains("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"));
        assert!(message.contains("Nonce: n0nce"));

        assert!(parts[2].starts_with("0x"));
        assert_eq!(parts[2].len(), 2 + 130);
    }
}
