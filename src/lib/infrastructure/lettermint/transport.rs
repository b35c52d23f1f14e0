//! Lettermint mail transport

use std::{fmt, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::{
    config::{
        Encryptor, ScopeConfig, StoreScope, CONFIG_PATH_API_TOKEN, CONFIG_PATH_ENABLED,
        CONFIG_PATH_NEWSLETTER_ROUTE, CONFIG_PATH_TRANSACTIONAL_ROUTE,
    },
    mail::{
        address::{normalize_many, normalize_reply_to, normalize_single},
        extract_content, ApiToken, EmailMessage, EmailProvider, MailError, MailTransport,
        OutboundEmail, TransportState,
    },
};

/// Sends host messages through the Lettermint API.
///
/// One instance carries one message. Create a fresh instance per send rather
/// than sharing one between concurrent sends.
pub struct LettermintTransport<C, E, P>
where
    C: ScopeConfig,
    E: Encryptor,
    P: EmailProvider,
{
    config: Arc<C>,
    encryptor: Arc<E>,
    provider: Arc<P>,
    scope: StoreScope,
    message: Option<EmailMessage>,
    state: TransportState,
}

impl<C, E, P> LettermintTransport<C, E, P>
where
    C: ScopeConfig,
    E: Encryptor,
    P: EmailProvider,
{
    /// Creates a transport for `scope` with no message attached
    pub fn new(config: Arc<C>, encryptor: Arc<E>, provider: Arc<P>, scope: StoreScope) -> Self {
        Self {
            config,
            encryptor,
            provider,
            scope,
            message: None,
            state: TransportState::Idle,
        }
    }

    /// Where the transport is in its lifecycle
    pub fn state(&self) -> TransportState {
        self.state
    }

    fn is_enabled(&self) -> bool {
        self.config.is_set_flag(CONFIG_PATH_ENABLED, &self.scope)
    }

    /// Reads and decrypts the API token; a decryption failure counts as unset
    fn api_token(&self) -> Option<ApiToken> {
        let encrypted = self
            .config
            .value(CONFIG_PATH_API_TOKEN, &self.scope)
            .filter(|v| !v.is_empty())?;

        match self.encryptor.decrypt(&encrypted) {
            Ok(token) if !token.is_empty() => Some(ApiToken::new(&token)),
            Ok(_) => None,
            Err(err) => {
                error!("Failed to decrypt Lettermint API token: {}", err);
                None
            }
        }
    }

    fn configured_route(&self, path: &str) -> Option<String> {
        self.config
            .value(path, &self.scope)
            .filter(|route| !route.is_empty())
    }

    fn is_newsletter(&self) -> bool {
        let Some(message) = &self.message else {
            return false;
        };

        if message.is_newsletter() {
            info!("Lettermint Transport: newsletter message, using newsletter route");
            return true;
        }

        false
    }

    fn route(&self) -> Option<String> {
        if self.is_newsletter() {
            self.configured_route(CONFIG_PATH_NEWSLETTER_ROUTE)
        } else {
            self.configured_route(CONFIG_PATH_TRANSACTIONAL_ROUTE)
        }
    }

    /// Maps the attached message onto a provider request
    fn build_request(&self, message: &EmailMessage) -> Result<OutboundEmail, MailError> {
        let mut email = OutboundEmail::new();

        if let Some(from) = normalize_single(message.from.as_ref()) {
            email = email.from(from);
        }

        let to = normalize_many(message.to.as_ref());
        if !to.is_empty() {
            email = email.to(to);
        }

        let cc = normalize_many(message.cc.as_ref());
        if !cc.is_empty() {
            email = email.cc(cc);
        }

        let bcc = normalize_many(message.bcc.as_ref());
        if !bcc.is_empty() {
            email = email.bcc(bcc);
        }

        if let Some(reply_to) = normalize_reply_to(message.reply_to.as_ref()) {
            email = email.reply_to(reply_to);
        }

        if let Some(subject) = message.subject.as_deref().filter(|s| !s.is_empty()) {
            email = email.subject(subject);
        }

        let content = extract_content(message).map_err(|err| {
            error!("Failed to send email via Lettermint: {}", err);
            MailError::SendFailed(err.into())
        })?;

        if let Some(html) = content.html {
            email = email.html(html);
        }

        if let Some(text) = content.text {
            email = email.text(text);
        }

        if let Some(route) = self.route() {
            email = email.route(route);
        }

        Ok(email)
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<(), MailError> {
        if !self.is_enabled() {
            warn!("Lettermint email transport is not enabled");
            return Err(MailError::TransportDisabled);
        }

        let Some(token) = self.api_token() else {
            warn!("Lettermint API token is not configured");
            return Err(MailError::TokenUnavailable);
        };

        let email = self.build_request(message)?;

        let response = self.provider.send(&token, &email).await.map_err(|err| {
            error!(error = ?err, "Failed to send email via Lettermint: {}", err);
            MailError::SendFailed(err.into())
        })?;

        match response {
            Some(response) => {
                debug!(message_id = ?response.message_id, "email sent via Lettermint");
                Ok(())
            }
            None => {
                error!("Failed to send email via Lettermint: empty provider response");
                Err(MailError::SendFailed(anyhow!(
                    "Failed to send email via Lettermint."
                )))
            }
        }
    }
}

impl<C, E, P> fmt::Debug for LettermintTransport<C, E, P>
where
    C: ScopeConfig,
    E: Encryptor,
    P: EmailProvider,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LettermintTransport")
            .field("scope", &self.scope)
            .field("state", &self.state)
            .field("message", &self.message.is_some())
            .finish()
    }
}

#[async_trait]
impl<C, E, P> MailTransport for LettermintTransport<C, E, P>
where
    C: ScopeConfig,
    E: Encryptor,
    P: EmailProvider,
{
    fn name(&self) -> &'static str {
        "lettermint"
    }

    fn set_message(&mut self, message: EmailMessage) {
        self.message = Some(message);
        self.state = TransportState::MessageAttached;
    }

    fn message(&self) -> Result<&EmailMessage, MailError> {
        self.message.as_ref().ok_or(MailError::NoMessageSet)
    }

    async fn send_message(&mut self) -> Result<(), MailError> {
        let message = self.message()?;
        let result = self.deliver(message).await;

        self.state = match &result {
            Ok(()) => TransportState::Sent,
            Err(_) => TransportState::Failed,
        };

        result
    }
}
