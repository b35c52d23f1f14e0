//! Email delivery provider

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[cfg(test)]
use mockall::mock;

use super::outbound::OutboundEmail;

/// A decrypted API token
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a decrypted token
    pub fn new(token: &str) -> Self {
        Self(token.to_string())
    }

    /// The token value, for placing on the wire
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Provider acknowledgement of an accepted email
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct SendResponse {
    /// Provider-assigned message ID
    #[serde(default)]
    pub message_id: Option<String>,

    /// Delivery status at acceptance time
    #[serde(default)]
    pub status: Option<String>,
}

/// Provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status
    #[error("provider rejected the request with status {status}: {body}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// Response body
        body: String,
    },

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Email delivery provider
#[async_trait]
pub trait EmailProvider: Send + Sync + 'static {
    /// Sends `email` on behalf of the account that owns `token`.
    ///
    /// # Returns
    /// - [`Ok`] with `Some` [`SendResponse`] when the provider accepted the email.
    /// - [`Ok`] with [`None`] when the provider answered with an empty response.
    /// - [`Err`] containing a [`ProviderError`] otherwise.
    async fn send(
        &self,
        token: &ApiToken,
        email: &OutboundEmail,
    ) -> Result<Option<SendResponse>, ProviderError>;
}

#[cfg(test)]
mock! {
    pub EmailProvider {}

    #[async_trait]
    impl EmailProvider for EmailProvider {
        async fn send(
            &self,
            token: &ApiToken,
            email: &OutboundEmail,
        ) -> Result<Option<SendResponse>, ProviderError>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_debug_is_redacted() {
        let token = ApiToken::new("lm_secret");

        assert_eq!(format!("{:?}", token), "ApiToken(***)");
        assert_eq!(token.expose(), "lm_secret");
    }
}
