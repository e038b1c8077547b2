//! EIP-1559 transaction and EIP-191 message signing.

use alloy_rlp::{Encodable, RlpEncodable};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};

use crate::error::{ChainError, SdkResult};

/// EIP-1559 type byte.
const TX_TYPE: u8 = 0x02;

/// An unsigned EIP-1559 (type 2) transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip1559Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
    pub to: [u8; 20],
    /// Wei.
    pub value: u128,
    pub data: Vec<u8>,
}

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// `0x02 || rlp(signed fields)`
    pub raw: Vec<u8>,
    /// `0x`-prefixed keccak of `raw`.
    pub hash: String,
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }
}

impl Eip1559Transaction {
    /// `0x02 || rlp([chain_id, nonce, tip, max_fee, gas, to, value, data, access_list])`
    pub fn signing_payload(&self) -> Vec<u8> {
        let fields = UnsignedTxFields {
            chain_id: self.chain_id,
            nonce: self.nonce,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            max_fee_per_gas: self.max_fee_per_gas,
            gas_limit: self.gas_limit,
            to: RlpAddress(self.to),
            value: self.value,
            data: self.data.clone(),
            access_list: Vec::new(),
        };
        with_type_prefix(&fields)
    }

    pub fn sign(&self, key: &SigningKey) -> SdkResult<SignedTransaction> {
        let digest = Keccak256::digest(self.signing_payload());
        let (signature, recovery_id) = sign_digest(key, digest.as_slice())?;

        let signed = SignedTxFields {
            chain_id: self.chain_id,
            nonce: self.nonce,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            max_fee_per_gas: self.max_fee_per_gas,
            gas_limit: self.gas_limit,
            to: RlpAddress(self.to),
            value: self.value,
            data: self.data.clone(),
            access_list: Vec::new(),
            signature_y_parity: recovery_id.is_y_odd() as u8,
            signature_r: RlpU256::from_slice(&signature.r().to_bytes()),
            signature_s: RlpU256::from_slice(&signature.s().to_bytes()),
        };

        let raw = with_type_prefix(&signed);
        let hash = format!("0x{}", hex::encode(Keccak256::digest(&raw)));
        Ok(SignedTransaction { raw, hash })
    }
}

/// EIP-191 `personal_sign`: `r || s || v` with `v` in {27, 28}.
pub fn sign_personal_message(message: &[u8], key: &SigningKey) -> SdkResult<[u8; 65]> {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    let digest = hasher.finalize();

    let (signature, recovery_id) = sign_digest(key, digest.as_slice())?;

    let mut sig = [0u8; 65];
    sig[..32].copy_from_slice(&signature.r().to_bytes());
    sig[32..64].copy_from_slice(&signature.s().to_bytes());
    sig[64] = recovery_id.is_y_odd() as u8 + 27;
    Ok(sig)
}

fn sign_digest(key: &SigningKey, digest: &[u8]) -> SdkResult<(Signature, RecoveryId)> {
    key.sign_prehash(digest)
        .map_err(|e| ChainError::Signing(e.to_string()).into())
}

fn with_type_prefix<T: Encodable>(fields: &T) -> Vec<u8> {
    let mut rlp_buf = Vec::new();
    fields.encode(&mut rlp_buf);

    let mut out = Vec::with_capacity(1 + rlp_buf.len());
    out.push(TX_TYPE);
    out.extend_from_slice(&rlp_buf);
    out
}

// ─── RLP structures ──────────────────────────────────────────────────────────

#[derive(RlpEncodable)]
struct UnsignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: Vec<u8>,
    access_list: Vec<AccessListItem>,
}

#[derive(RlpEncodable)]
struct SignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: Vec<u8>,
    access_list: Vec<AccessListItem>,
    signature_y_parity: u8,
    signature_r: RlpU256,
    signature_s: RlpU256,
}

/// Always empty; present for the list shape.
#[derive(Debug, Clone, RlpEncodable)]
struct AccessListItem {
    address: RlpAddress,
    storage_keys: Vec<RlpAddress>,
}

/// 20-byte address encoded as an RLP string.
#[derive(Debug, Clone)]
struct RlpAddress([u8; 20]);

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// 256-bit integer encoded minimally (leading zeros stripped).
#[derive(Debug, Clone)]
struct RlpU256([u8; 32]);

impl RlpU256 {
    fn from_slice(bytes: &[u8]) -> Self {
        let mut word = [0u8; 32];
        word.copy_from_slice(bytes);
        Self(word)
    }

    fn trimmed(&self) -> &[u8] {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        &self.0[start..]
    }
}

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.trimmed().encode(out);
    }

    fn length(&self) -> usize {
        self.trimmed().length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::VerifyingKey;

    fn test_key() -> SigningKey {
        let mut key = [0u8; 32];
        key[31] = 1;
        SigningKey::from_bytes((&key).into()).unwrap()
    }

    fn sample_tx() -> Eip1559Transaction {
        let mut to = [0u8; 20];
        to[18] = 0xde;
        to[19] = 0xad;
        Eip1559Transaction {
            chain_id: 97,
            nonce: 3,
            max_priority_fee_per_gas: 1_000_000_000,
            max_fee_per_gas: 20_000_000_000,
            gas_limit: 250_000,
            to,
            value: 10_000_000_000_000_000,
            data: vec![0xd0, 0xe3, 0x0d, 0xb0],
        }
    }

    #[test]
    fn test_signing_payload_prefix() {
        let payload = sample_tx().signing_payload();
        assert_eq!(payload[0], 0x02);
        // RLP list header follows the type byte
        assert!(payload[1] >= 0xc0);
    }

    #[test]
    fn test_sign_is_deterministic_and_recoverable() {
        let key = test_key();
        let tx = sample_tx();
        let a = tx.sign(&key).unwrap();
        let b = tx.sign(&key).unwrap();
        assert_eq!(a.raw, b.raw);
        assert_eq!(a.hash, b.hash);
        assert!(a.hash.starts_with("0x"));
        assert_eq!(a.hash.len(), 66);
        assert_eq!(a.raw[0], 0x02);
        assert!(a.raw_hex().starts_with("0x02"));
    }

    #[test]
    fn test_personal_sign_recovers_signer() {
        let key = test_key();
        let msg = b"hello";
        let sig = sign_personal_message(msg, &key).unwrap();
        assert!(sig[64] == 27 || sig[64] == 28);

        let prefix = format!("\x19Ethereum Signed Message:\n{}", msg.len());
        let mut hasher = Keccak256::new();
        hasher.update(prefix.as_bytes());
        hasher.update(msg);
        let digest = hasher.finalize();

        let signature = Signature::from_slice(&sig[..64]).unwrap();
        let recid = RecoveryId::from_byte(sig[64] - 27).unwrap();
        let recovered = VerifyingKey::recover_from_prehash(&digest, &signature, recid).unwrap();
        assert_eq!(&recovered, key.verifying_key());
    }
}
