//! Sign-in-with-Solana payload.
//!
//! The payload travels as JSON (base64) next to a detached ed25519
//! signature over its text rendering.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::signature_expiry;
use crate::wallet::SignInParams;

/// Chain tag the platform expects in Solana sign-in payloads.
pub const SIWS_CHAIN_ID: u64 = 3;
pub const SIWS_VERSION: &str = "1";

/// Field order matches the serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInPayload {
    pub domain: String,
    pub address: String,
    pub uri: String,
    pub statement: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub expiration_time: String,
    pub issued_at: String,
}

impl SignInPayload {
    pub fn new(params: &SignInParams, address: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            domain: params.domain.clone(),
            address: address.to_string(),
            uri: params.uri.clone(),
            statement: params.statement.clone(),
            version: SIWS_VERSION.to_string(),
            chain_id: SIWS_CHAIN_ID,
            nonce: params.nonce.clone(),
            expiration_time: signature_expiry(issued_at)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            issued_at: issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// The text that is actually signed.
    pub fn to_message(&self) -> String {
        format!(
            "{} wants you to sign in with your Solana account:\n{}\n\n{}\n\nURI: {}\nVersion: {}\nChain ID: {}\nNonce: {}\nIssued At: {}\nExpiration Time: {}",
            self.domain,
            self.address,
            self.statement,
            self.uri,
            self.version,
            self.chain_id,
            self.nonce,
            self.issued_at,
            self.expiration_time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> SignInPayload {
        let params = SignInParams {
            statement: "Sign in with Solana to the app".into(),
            nonce: "xyz".into(),
            domain: "api.example.com".into(),
            uri: "https://app.nusabyte.com".into(),
        };
        let issued = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        SignInPayload::new(&params, "11111111111111111111111111111111", issued)
    }

    #[test]
    fn test_payload_json_shape() {
        let json = serde_json::to_string(&payload()).unwrap();
        assert_eq!(
            json,
            r#"{"domain":"api.example.com","address":"11111111111111111111111111111111","uri":"https://app.nusabyte.com","statement":"Sign in with Solana to the app","version":"1","chainId":3,"nonce":"xyz","expirationTime":"2024-04-01T08:30:00.000Z","issuedAt":"2024-03-01T08:30:00.000Z"}"#
        );
    }

    #[test]
    fn test_message_text() {
        let text = payload().to_message();
        assert!(text.starts_with(
            "api.example.com wants you to sign in with your Solana account:\n11111111111111111111111111111111\n\n"
        ));
        assert!(text.contains("\nChain ID: 3\n"));
        assert!(text.ends_with("Expiration Time: 2024-04-01T08:30:00.000Z"));
    }
}
