//! Minimal ABI encoding for the factory, payment manager and ERC-20 calls.
//!
//! Head/tail layout: static values occupy one 32-byte word in the head;
//! dynamic values put an offset in the head and `len || padded bytes` in the
//! tail.

use sha3::{Digest, Keccak256};

use crate::error::{ChainError, SdkResult};

pub const GET_TOKEN_CREATION_FEE: &str = "getTokenCreationFee()";
pub const CREATE_TOKEN: &str = "createToken(string,string,uint256,uint256)";
pub const DEPOSIT: &str = "deposit()";
pub const DEPOSIT_TOKEN: &str = "depositToken(address,uint256)";
pub const APPROVE: &str = "approve(address,uint256)";
pub const ALLOWANCE: &str = "allowance(address,address)";

/// A single ABI argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address([u8; 20]),
    Uint(u128),
    String(String),
}

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&hash[..4]);
    sel
}

fn uint_word(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encode `selector(signature) || encode(args)`.
pub fn encode_call(signature: &str, args: &[AbiValue]) -> Vec<u8> {
    let head_len = args.len() * 32;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for arg in args {
        match arg {
            AbiValue::Address(addr) => {
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(addr);
                head.extend_from_slice(&word);
            }
            AbiValue::Uint(v) => head.extend_from_slice(&uint_word(*v)),
            AbiValue::String(s) => {
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
                let bytes = s.as_bytes();
                tail.extend_from_slice(&uint_word(bytes.len() as u128));
                tail.extend_from_slice(bytes);
                let pad = (32 - bytes.len() % 32) % 32;
                tail.extend(std::iter::repeat(0u8).take(pad));
            }
        }
    }

    let mut data = Vec::with_capacity(4 + head.len() + tail.len());
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);
    data
}

/// Decode a single `uint256` return value. Values above `u128::MAX` (an
/// unlimited allowance, for instance) saturate.
pub fn decode_uint(output: &[u8]) -> SdkResult<u128> {
    if output.len() < 32 {
        return Err(ChainError::InvalidResponse(format!(
            "Expected a 32-byte word, got {} bytes",
            output.len()
        ))
        .into());
    }
    if output[..16].iter().any(|&b| b != 0) {
        return Ok(u128::MAX);
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&output[16..32]);
    Ok(u128::from_be_bytes(low))
}
