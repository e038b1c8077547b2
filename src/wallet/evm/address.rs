//! EVM address derivation and parsing.

use k256::ecdsa::VerifyingKey;
use sha3::{Digest, Keccak256};

use crate::error::{SdkError, SdkResult};

/// Raw 20-byte address of a secp256k1 public key.
pub fn address_bytes(key: &VerifyingKey) -> [u8; 20] {
    let uncompressed = key.to_encoded_point(false);
    // Skip the 0x04 prefix.
    let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    addr
}

/// EIP-55 mixed-case encoding of a raw address.
pub fn to_checksum(addr: &[u8; 20]) -> String {
    let hex_part = hex::encode(addr);
    let hash = Keccak256::digest(hex_part.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, c) in hex_part.chars().enumerate() {
        // Nibble i of the hash decides the case of character i.
        let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    checksummed
}

/// Parse a `0x`-prefixed hex address. Case is not validated.
pub fn parse_address(address: &str) -> SdkResult<[u8; 20]> {
    let hex_str = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| SdkError::Validation(format!("Address must start with 0x: {}", address)))?;

    if hex_str.len() != 40 {
        return Err(SdkError::Validation(format!(
            "Expected 40 hex characters, got {}",
            hex_str.len()
        )));
    }

    let bytes = hex::decode(hex_str)
        .map_err(|e| SdkError::Validation(format!("Invalid address hex: {}", e)))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}
