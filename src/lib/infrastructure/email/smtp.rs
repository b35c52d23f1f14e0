//! SMTP transport, the host's default when Lettermint is switched off

use std::{fmt, sync::Arc};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    address::AddressError,
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::domain::mail::{
    extract_content, Address, AddressField, EmailMessage, MailError, MailTransport,
    TransportFactory,
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "localhost")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Sender used when a message carries no from address
    #[clap(long = "smtp-sender", env = "SMTP_SENDER")]
    pub sender: Option<String>,

    /// Verify the TLS certificate
    #[clap(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long = "smtp-starttls", env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,

    /// Talk plain SMTP without TLS, for local catch-all servers
    #[clap(long = "smtp-plaintext", env = "SMTP_PLAINTEXT")]
    pub plaintext: bool,
}

impl SMTPConfig {
    /// Builds the lettre transport described by the configuration
    pub fn mailer(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = if self.plaintext {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
        } else {
            let parameters = TlsParameters::builder(self.host.to_string())
                .dangerous_accept_invalid_certs(!self.verify_tls)
                .build()?;

            let (relay, tls) = if self.starttls {
                (
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?,
                    Tls::Required(parameters),
                )
            } else {
                (
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?,
                    Tls::Wrapper(parameters),
                )
            };

            relay.tls(tls)
        };

        let builder = builder.port(self.port);

        let builder = match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(builder.build())
    }
}

/// Sends messages over SMTP
pub struct SmtpMailTransport {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Option<String>,
    message: Option<EmailMessage>,
}

impl fmt::Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailTransport")
            .field("sender", &self.sender)
            .field("message", &self.message.is_some())
            .finish()
    }
}

impl From<AddressError> for MailError {
    fn from(err: AddressError) -> Self {
        MailError::SendFailed(err.into())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::SendFailed(err.into())
    }
}

fn mailbox(address: &Address) -> Result<Mailbox, AddressError> {
    let name = address
        .name()
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Ok(Mailbox::new(name, address.email().parse()?))
}

fn mailboxes(field: Option<&AddressField>) -> Result<Vec<Mailbox>, AddressError> {
    match field {
        None => Ok(vec![]),
        Some(AddressField::Single(address)) => Ok(vec![mailbox(address)?]),
        Some(AddressField::List(addresses)) => addresses.iter().map(mailbox).collect(),
        Some(AddressField::Raw(raw)) if raw.trim().is_empty() => Ok(vec![]),
        Some(AddressField::Raw(raw)) => Ok(vec![raw.parse()?]),
    }
}

/// Converts a host message into a lettre message
pub fn to_lettre_message(
    message: &EmailMessage,
    sender: Option<&str>,
) -> Result<Message, MailError> {
    let from = match mailboxes(message.from.as_ref())?.into_iter().next() {
        Some(from) => from,
        None => sender
            .context("message has no sender and no default sender is configured")?
            .parse()?,
    };

    let mut builder = Message::builder().from(from);

    for to in mailboxes(message.to.as_ref())? {
        builder = builder.to(to);
    }

    for cc in mailboxes(message.cc.as_ref())? {
        builder = builder.cc(cc);
    }

    for bcc in mailboxes(message.bcc.as_ref())? {
        builder = builder.bcc(bcc);
    }

    if let Some(reply_to) = mailboxes(message.reply_to.as_ref())?.into_iter().next() {
        builder = builder.reply_to(reply_to);
    }

    if let Some(subject) = &message.subject {
        builder = builder.subject(subject.clone());
    }

    let content = extract_content(message)?;

    let email = match (content.text, content.html) {
        (Some(plain), Some(html)) => {
            builder.multipart(MultiPart::alternative_plain_html(plain, html))?
        }
        (None, Some(html)) => builder.singlepart(SinglePart::html(html))?,
        (Some(plain), None) => builder.singlepart(SinglePart::plain(plain))?,
        (None, None) => return Err(MailError::ContentMissing),
    };

    Ok(email)
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn set_message(&mut self, message: EmailMessage) {
        self.message = Some(message);
    }

    fn message(&self) -> Result<&EmailMessage, MailError> {
        self.message.as_ref().ok_or(MailError::NoMessageSet)
    }

    async fn send_message(&mut self) -> Result<(), MailError> {
        let email = to_lettre_message(self.message()?, self.sender.as_deref())?;

        debug!(envelope = ?email.envelope(), "sending email via SMTP");

        match self.mailer.send(email).await {
            Ok(_) => Ok(()),
            Err(e) => Err(MailError::SendFailed(e.into())),
        }
    }
}

/// Creates [`SmtpMailTransport`]s sharing one connection pool
#[derive(Clone)]
pub struct SmtpTransportFactory {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Option<String>,
}

impl SmtpTransportFactory {
    /// Creates a factory from the SMTP configuration
    pub fn new(config: &SMTPConfig) -> Result<Self> {
        Ok(Self {
            mailer: Arc::new(config.mailer()?),
            sender: config.sender.clone(),
        })
    }
}

impl fmt::Debug for SmtpTransportFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpTransportFactory")
            .field("sender", &self.sender)
            .finish()
    }
}

impl TransportFactory for SmtpTransportFactory {
    fn create(&self, message: Option<EmailMessage>) -> Box<dyn MailTransport> {
        Box::new(SmtpMailTransport {
            mailer: self.mailer.clone(),
            sender: self.sender.clone(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::mail::{Body, MimePart, TextPart};

    use super::*;

    fn order_confirmation() -> EmailMessage {
        EmailMessage {
            from: Some(Address::with_name("shop@example.com", "Example Shop").into()),
            to: Some(
                vec![
                    Address::new("jane@example.com"),
                    Address::new("john@example.com"),
                ]
                .into(),
            ),
            bcc: Some(AddressField::from("audit@example.com")),
            subject: Some("Your order".to_string()),
            body: Body::Multipart(vec![
                MimePart::new("text/plain", "Thanks"),
                MimePart::new("text/html", "<p>Thanks</p>"),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_message_envelope() -> TestResult {
        let email = to_lettre_message(&order_confirmation(), None)?;
        let envelope = email.envelope();

        assert_eq!(
            envelope.from().map(ToString::to_string),
            Some("shop@example.com".to_string())
        );

        let recipients: Vec<String> = envelope.to().iter().map(ToString::to_string).collect();
        assert_eq!(
            recipients,
            vec!["jane@example.com", "john@example.com", "audit@example.com"]
        );

        Ok(())
    }

    #[test]
    fn test_message_headers_and_body() -> TestResult {
        let email = to_lettre_message(&order_confirmation(), None)?;
        let formatted = String::from_utf8(email.formatted())?;

        assert!(formatted.contains("Subject: Your order"));
        assert!(formatted.contains("Example Shop"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(!formatted.contains("audit@example.com"));

        Ok(())
    }

    #[test]
    fn test_default_sender_is_used() -> TestResult {
        let message = EmailMessage {
            from: None,
            ..order_confirmation()
        };

        let email = to_lettre_message(&message, Some("noreply@example.com"))?;

        assert_eq!(
            email.envelope().from().map(ToString::to_string),
            Some("noreply@example.com".to_string())
        );

        Ok(())
    }

    #[test]
    fn test_missing_sender_fails() {
        let message = EmailMessage {
            from: None,
            ..order_confirmation()
        };

        let result = to_lettre_message(&message, None);

        assert!(matches!(result, Err(MailError::SendFailed(_))));
    }

    #[test]
    fn test_invalid_recipient_fails() {
        let message = EmailMessage {
            to: Some(Address::new("not an email").into()),
            ..order_confirmation()
        };

        assert!(matches!(
            to_lettre_message(&message, None),
            Err(MailError::SendFailed(_))
        ));
    }

    #[test]
    fn test_html_only_body() -> TestResult {
        let message = EmailMessage {
            body: Body::Text(TextPart::html("<p>Hi</p>")),
            ..order_confirmation()
        };

        let formatted = String::from_utf8(to_lettre_message(&message, None)?.formatted())?;

        assert!(formatted.contains("text/html"));
        assert!(!formatted.contains("multipart"));

        Ok(())
    }

    #[test]
    fn test_empty_body_is_content_missing() {
        let message = EmailMessage {
            body: Body::default(),
            ..order_confirmation()
        };

        assert!(matches!(
            to_lettre_message(&message, None),
            Err(MailError::ContentMissing)
        ));
    }

    #[tokio::test]
    async fn test_factory_attaches_message() -> TestResult {
        let config = SMTPConfig {
            host: "localhost".to_string(),
            port: 1025,
            plaintext: true,
            ..Default::default()
        };

        let transport = SmtpTransportFactory::new(&config)?.create(Some(order_confirmation()));

        assert_eq!(transport.name(), "smtp");
        assert_eq!(transport.message()?, &order_confirmation());

        Ok(())
    }

    #[test]
    fn test_transport_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailTransport>();
    }
}
