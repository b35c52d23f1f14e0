//! Mail transport seams shared with the host application

use std::fmt;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{errors::MailError, message::EmailMessage};

/// Lifecycle of a transport instance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportState {
    /// No message attached
    #[default]
    Idle,

    /// A message is attached and waiting to be sent
    MessageAttached,

    /// The last send succeeded
    Sent,

    /// The last send failed
    Failed,
}

/// A transport that delivers one attached message
#[async_trait]
pub trait MailTransport: fmt::Debug + Send + Sync {
    /// Short name of the transport, for logging
    fn name(&self) -> &'static str;

    /// Attaches the message to send
    fn set_message(&mut self, message: EmailMessage);

    /// The attached message
    ///
    /// # Errors
    /// [`MailError::NoMessageSet`] if nothing is attached.
    fn message(&self) -> Result<&EmailMessage, MailError>;

    /// Sends the attached message
    async fn send_message(&mut self) -> Result<(), MailError>;
}

/// Creates transports for outgoing messages
pub trait TransportFactory: Send + Sync + 'static {
    /// Returns a transport for `message`, with the message attached when given
    fn create(&self, message: Option<EmailMessage>) -> Box<dyn MailTransport>;
}

#[cfg(test)]
mock! {
    pub TransportFactory {}

    impl TransportFactory for TransportFactory {
        fn create(&self, message: Option<EmailMessage>) -> Box<dyn MailTransport>;
    }
}
