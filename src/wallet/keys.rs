//! Private key parsing for both wallet variants.
//!
//! Decoded secret bytes are zeroized once the key object is built.

use base64::Engine;
use k256::ecdsa::SigningKey;
use solana_keypair::Keypair;
use zeroize::Zeroize;

use crate::error::{SdkError, SdkResult};

const SOLANA_SECRET_LEN: usize = 64;
const EVM_SECRET_LEN: usize = 32;

fn invalid(msg: &str) -> SdkError {
    SdkError::Configuration(format!("Invalid private key: {}", msg))
}

/// Parse a Solana secret key.
///
/// Accepted encodings of the 64-byte secret:
/// - JSON byte array, as written by `solana-keygen`
/// - hex (128 characters)
/// - base58, as exported by browser wallets
/// - base64
pub fn parse_solana_keypair(input: &str) -> SdkResult<Keypair> {
    let trimmed = input.trim();

    let mut bytes = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(trimmed).map_err(|e| invalid(&e.to_string()))?
    } else if trimmed.len() == SOLANA_SECRET_LEN * 2 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        hex::decode(trimmed).map_err(|e| invalid(&e.to_string()))?
    } else if let Ok(decoded) = bs58::decode(trimmed).into_vec() {
        decoded
    } else {
        base64::engine::general_purpose::STANDARD
            .decode(trimmed)
            .map_err(|_| invalid("expected a JSON byte array, hex, base58 or base64"))?
    };

    if bytes.len() != SOLANA_SECRET_LEN {
        let len = bytes.len();
        bytes.zeroize();
        return Err(invalid(&format!("expected {} bytes, got {}", SOLANA_SECRET_LEN, len)));
    }

    let keypair = Keypair::try_from(bytes.as_slice()).map_err(|e| invalid(&e.to_string()));
    bytes.zeroize();
    keypair
}

/// Parse a secp256k1 secret key given as hex, with or without `0x`.
pub fn parse_evm_signing_key(input: &str) -> SdkResult<SigningKey> {
    let trimmed = input.trim();
    let hex_str = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex_str.len() != EVM_SECRET_LEN * 2 {
        return Err(invalid(&format!(
            "expected {} hex characters, got {}",
            EVM_SECRET_LEN * 2,
            hex_str.len()
        )));
    }

    let mut bytes = hex::decode(hex_str).map_err(|e| invalid(&e.to_string()))?;
    let mut key_bytes = [0u8; EVM_SECRET_LEN];
    key_bytes.copy_from_slice(&bytes);
    bytes.zeroize();

    let signing_key =
        SigningKey::from_bytes((&key_bytes).into()).map_err(|e| invalid(&e.to_string()));
    key_bytes.zeroize();
    signing_key
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_signer::Signer;

    fn sample_keypair() -> Keypair {
        Keypair::new()
    }

    #[test]
    fn test_solana_json_array() {
        let kp = sample_keypair();
        let json = serde_json::to_string(&kp.to_bytes().to_vec()).unwrap();
        let parsed = parse_solana_keypair(&json).unwrap();
        assert_eq!(parsed.pubkey(), kp.pubkey());
    }

    #[test]
    fn test_solana_hex_and_base64() {
        let kp = sample_keypair();
        let bytes = kp.to_bytes();

        let from_hex = parse_solana_keypair(&hex::encode(bytes)).unwrap();
        assert_eq!(from_hex.pubkey(), kp.pubkey());

        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        let from_b64 = parse_solana_keypair(&b64).unwrap();
        assert_eq!(from_b64.pubkey(), kp.pubkey());
    }

    #[test]
    fn test_solana_base58() {
        let kp = sample_keypair();
        let b58 = bs58::encode(kp.to_bytes()).into_string();
        let parsed = parse_solana_keypair(&b58).unwrap();
        assert_eq!(parsed.pubkey(), kp.pubkey());
    }

    #[test]
    fn test_solana_wrong_length() {
        let err = parse_solana_keypair("[1,2,3]").unwrap_err();
        assert!(matches!(err, SdkError::Configuration(m) if m.contains("expected 64 bytes")));
        assert!(parse_solana_keypair("!!!").is_err());
    }

    #[test]
    fn test_evm_key_with_and_without_prefix() {
        let hex_key = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
        let a = parse_evm_signing_key(hex_key).unwrap();
        let b = parse_evm_signing_key(&format!("0x{}", hex_key)).unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_evm_key_rejects_bad_input() {
        assert!(parse_evm_signing_key("0x1234").is_err());
        assert!(parse_evm_signing_key(&"zz".repeat(32)).is_err());
        // Zero is not a valid scalar
        assert!(parse_evm_signing_key(&"00".repeat(32)).is_err());
    }
}
