//! Transport switching

use std::{fmt, sync::Arc};

use tracing::{debug, info};

use crate::domain::{
    config::{Encryptor, ScopeConfig, StoreScope, CONFIG_PATH_ENABLED},
    mail::{EmailMessage, EmailProvider, MailTransport, TransportFactory},
};

use super::LettermintTransport;

/// Wraps the host's transport factory and hands out a [`LettermintTransport`]
/// when Lettermint is enabled for the store and there is a message to send.
///
/// Each call builds a new transport, so concurrent sends never share one.
pub struct TransportSwitcher<F, C, E, P>
where
    F: TransportFactory,
    C: ScopeConfig,
    E: Encryptor,
    P: EmailProvider,
{
    default: F,
    config: Arc<C>,
    encryptor: Arc<E>,
    provider: Arc<P>,
    scope: StoreScope,
}

impl<F, C, E, P> TransportSwitcher<F, C, E, P>
where
    F: TransportFactory,
    C: ScopeConfig,
    E: Encryptor,
    P: EmailProvider,
{
    /// Creates a switcher in front of `default`
    pub fn new(
        default: F,
        config: Arc<C>,
        encryptor: Arc<E>,
        provider: Arc<P>,
        scope: StoreScope,
    ) -> Self {
        Self {
            default,
            config,
            encryptor,
            provider,
            scope,
        }
    }
}

impl<F, C, E, P> TransportFactory for TransportSwitcher<F, C, E, P>
where
    F: TransportFactory,
    C: ScopeConfig,
    E: Encryptor,
    P: EmailProvider,
{
    fn create(&self, message: Option<EmailMessage>) -> Box<dyn MailTransport> {
        if !self.config.is_set_flag(CONFIG_PATH_ENABLED, &self.scope) {
            info!("Lettermint Transport Switcher: Module disabled, using default transport");
            return self.default.create(message);
        }

        let Some(message) = message else {
            return self.default.create(None);
        };

        debug!(scope = %self.scope, "Lettermint Transport Switcher: using Lettermint transport");

        let mut transport = LettermintTransport::new(
            self.config.clone(),
            self.encryptor.clone(),
            self.provider.clone(),
            self.scope.clone(),
        );
        transport.set_message(message);

        Box::new(transport)
    }
}

impl<F, C, E, P> fmt::Debug for TransportSwitcher<F, C, E, P>
where
    F: TransportFactory,
    C: ScopeConfig,
    E: Encryptor,
    P: EmailProvider,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportSwitcher")
            .field("default", &"TransportFactory")
            .field("scope", &self.scope)
            .finish()
    }
}
