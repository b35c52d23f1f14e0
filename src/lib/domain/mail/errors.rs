//! Mail errors

use thiserror::Error;

/// Errors surfaced to the host by a mail transport
#[derive(Debug, Error)]
pub enum MailError {
    /// `message()` or `send_message()` was called before a message was attached
    #[error("No message set for Lettermint transport")]
    NoMessageSet,

    /// The transport is switched off for the current store
    #[error("Lettermint email transport is not enabled.")]
    TransportDisabled,

    /// The API token is not configured or could not be decrypted
    #[error("Lettermint API token is not configured.")]
    TokenUnavailable,

    /// Neither an HTML nor a plain text body was found
    #[error("No email body content found")]
    ContentMissing,

    /// The provider call failed
    #[error("Failed to send email: {0}")]
    SendFailed(#[source] anyhow::Error),
}

impl From<anyhow::Error> for MailError {
    fn from(err: anyhow::Error) -> Self {
        MailError::SendFailed(err)
    }
}
