//! Noop transport
//!
//! Logs the message instead of delivering it. Used for dry runs.

use async_trait::async_trait;
use tracing::info;

use crate::domain::mail::{
    address::normalize_many, EmailMessage, MailError, MailTransport, TransportFactory,
};

/// Transport that only logs
#[derive(Debug, Default, Clone)]
pub struct NoopMailTransport {
    message: Option<EmailMessage>,
}

#[async_trait]
impl MailTransport for NoopMailTransport {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn set_message(&mut self, message: EmailMessage) {
        self.message = Some(message);
    }

    fn message(&self) -> Result<&EmailMessage, MailError> {
        self.message.as_ref().ok_or(MailError::NoMessageSet)
    }

    async fn send_message(&mut self) -> Result<(), MailError> {
        let message = self.message()?;

        info!(
            to = ?normalize_many(message.to.as_ref()),
            subject = ?message.subject,
            "Noop: skipping email delivery"
        );

        Ok(())
    }
}

/// Creates [`NoopMailTransport`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTransportFactory;

impl TransportFactory for NoopTransportFactory {
    fn create(&self, message: Option<EmailMessage>) -> Box<dyn MailTransport> {
        Box::new(NoopMailTransport { message })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::mail::{Address, Body, TextPart};

    use super::*;

    #[tokio::test]
    async fn test_send_message_succeeds() -> TestResult {
        let mut transport = NoopTransportFactory.create(Some(EmailMessage {
            to: Some(Address::new("test@example.com").into()),
            subject: Some("Test".to_string()),
            body: Body::Text(TextPart::plain("Test")),
            ..Default::default()
        }));

        transport.send_message().await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_send_without_message_fails() {
        let mut transport = NoopMailTransport::default();

        let result = transport.send_message().await;

        assert!(matches!(result, Err(MailError::NoMessageSet)));
    }
}
