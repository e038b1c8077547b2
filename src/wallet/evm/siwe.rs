//! EIP-4361 sign-in message.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::shared::signature_expiry;
use crate::wallet::SignInParams;

/// Render the sign-in text for `address` on `chain_id`, issued at `issued_at`
/// and valid for one month.
pub fn sign_in_message(
    params: &SignInParams,
    address: &str,
    chain_id: u64,
    issued_at: DateTime<Utc>,
) -> String {
    let expires_at = signature_expiry(issued_at);
    format!(
        "{domain} wants you to sign in with your Ethereum account:\n\
         {address}\n\
         \n\
         {statement}\n\
         \n\
         URI: {uri}\n\
         Version: 1\n\
         Chain ID: {chain_id}\n\
         Nonce: {nonce}\n\
         Issued At: {iat}\n\
         Expiration Time: {exp}",
        domain = params.domain,
        address = address,
        statement = params.statement,
        uri = params.uri,
        chain_id = chain_id,
        nonce = params.nonce,
        iat = issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        exp = expires_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}
