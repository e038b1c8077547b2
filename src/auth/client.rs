//! Auth sub-client: nonce, sign-in, session check, sign-out.

use crate::auth::{sign_in_params, Session};
use crate::client::LaunchClient;
use crate::error::SdkError;

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a LaunchClient,
}

impl<'a> Auth<'a> {
    /// Sign in with the client's wallet.
    ///
    /// Checks the server is up, requests a nonce, signs the sign-in message, installs the signature as
    /// the bearer token, then validates it with `GET /auth-check`. A failed
    /// check clears the installed token again.
    pub async fn sign_in(&self) -> Result<Session, SdkError> {
        self.client.check_server().await?;
        let wallet = self.client.wallet();
        let config = wallet.config();

        let nonce = self
            .client
            .platform()
            .nonce(&config.address, config.network.as_str())
            .await?;

        let signature = wallet.sign_message(&sign_in_params(config, nonce)).await?;
        self.client
            .platform()
            .set_signature_auth(Some(signature.clone()))
            .await;

        let blockchain = self.client.blockchain().await?;
        match self.client.platform().auth_check(&blockchain.key).await {
            Ok(profile) => {
                tracing::info!(address = %config.address, "Signed in");
                Ok(Session { signature, profile })
            }
            Err(e) => {
                self.client.platform().set_signature_auth(None).await;
                Err(e.into())
            }
        }
    }

    /// Drop the installed signature.
    pub async fn sign_out(&self) {
        self.client.platform().set_signature_auth(None).await;
    }
}
