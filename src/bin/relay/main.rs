#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a single email through whichever transport the switcher selects

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lettermint_transport::{
    domain::{
        config::StoreScope,
        mail::{
            Address, AddressField, Body, EmailMessage, MailCategory, MailTransport, MimePart,
            TextPart, TransportFactory,
        },
    },
    infrastructure::{
        config::PlainTextEncryptor,
        email::{NoopTransportFactory, SMTPConfig, SmtpTransportFactory},
        lettermint::{LettermintClient, LettermintSettings, TransportSwitcher},
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// Lettermint settings
    #[clap(flatten)]
    pub lettermint: LettermintSettings,

    /// SMTP settings for the default transport
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Store code whose configuration applies
    #[arg(long)]
    pub store: Option<String>,

    /// Log instead of sending when Lettermint is not used
    #[arg(long)]
    pub dry_run: bool,

    /// Sender, `Name <email>` or a bare email
    #[arg(long)]
    pub from: Option<Address>,

    /// Recipient, repeatable
    #[arg(long, required = true)]
    pub to: Vec<Address>,

    /// Carbon copy recipient, repeatable
    #[arg(long)]
    pub cc: Vec<Address>,

    /// Blind carbon copy recipient, repeatable
    #[arg(long)]
    pub bcc: Vec<Address>,

    /// Reply-to address
    #[arg(long)]
    pub reply_to: Option<Address>,

    /// Subject line
    #[arg(long)]
    pub subject: Option<String>,

    /// HTML body
    #[arg(long)]
    pub html: Option<String>,

    /// Plain text body
    #[arg(long)]
    pub text: Option<String>,

    /// Route as newsletter mail
    #[arg(long)]
    pub newsletter: bool,
}

impl Args {
    fn scope(&self) -> StoreScope {
        match &self.store {
            Some(code) => StoreScope::Store(code.clone()),
            None => StoreScope::Default,
        }
    }

    fn message(&self) -> EmailMessage {
        let body = match (&self.html, &self.text) {
            (Some(html), Some(text)) => Body::Multipart(vec![
                MimePart::new("text/html", html),
                MimePart::new("text/plain", text),
            ]),
            (Some(html), None) => Body::Text(TextPart::html(html)),
            (None, Some(text)) => Body::Text(TextPart::plain(text)),
            (None, None) => Body::default(),
        };

        let list = |addresses: &[Address]| {
            (!addresses.is_empty()).then(|| AddressField::List(addresses.to_vec()))
        };

        EmailMessage {
            from: self.from.clone().map(AddressField::Single),
            to: list(&self.to),
            cc: list(&self.cc),
            bcc: list(&self.bcc),
            reply_to: self.reply_to.clone().map(AddressField::Single),
            subject: self.subject.clone(),
            body,
            category: if self.newsletter {
                MailCategory::Newsletter
            } else {
                MailCategory::Transactional
            },
        }
    }
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = Arc::new(args.lettermint.to_scope_config());
    let encryptor = Arc::new(PlainTextEncryptor);
    let client = Arc::new(LettermintClient::from_settings(&args.lettermint)?);

    let mut transport = if args.dry_run {
        TransportSwitcher::new(NoopTransportFactory, config, encryptor, client, args.scope())
            .create(Some(args.message()))
    } else {
        let smtp = SmtpTransportFactory::new(&args.smtp)?;

        TransportSwitcher::new(smtp, config, encryptor, client, args.scope())
            .create(Some(args.message()))
    };

    info!(transport = transport.name(), "sending email");

    transport
        .send_message()
        .await
        .with_context(|| format!("{} transport failed", transport.name()))?;

    info!("email sent");

    Ok(())
}
