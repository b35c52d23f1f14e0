//! Lettermint settings read from the environment

use clap::Parser;

use crate::{
    domain::config::{
        StoreScope, CONFIG_PATH_API_TOKEN, CONFIG_PATH_ENABLED, CONFIG_PATH_NEWSLETTER_ROUTE,
        CONFIG_PATH_TRANSACTIONAL_ROUTE,
    },
    infrastructure::config::InMemoryScopeConfig,
};

/// Lettermint configuration
#[derive(Clone, Debug, Default, Parser)]
pub struct LettermintSettings {
    /// Route outgoing mail through Lettermint
    #[clap(long = "lettermint-enabled", env = "LETTERMINT_ENABLED")]
    pub enabled: bool,

    /// The Lettermint API token
    #[clap(long = "lettermint-api-token", env = "LETTERMINT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Route tag for transactional mail
    #[clap(long, env = "LETTERMINT_TRANSACTIONAL_ROUTE")]
    pub transactional_route: Option<String>,

    /// Route tag for newsletter mail
    #[clap(long, env = "LETTERMINT_NEWSLETTER_ROUTE")]
    pub newsletter_route: Option<String>,

    /// The Lettermint API base URL
    #[clap(
        long = "lettermint-base-url",
        env = "LETTERMINT_BASE_URL",
        default_value = "https://api.lettermint.co/v1"
    )]
    pub base_url: String,

    /// Request timeout in seconds
    #[clap(long = "lettermint-timeout", env = "LETTERMINT_TIMEOUT", default_value = "30")]
    pub timeout_secs: u64,
}

impl LettermintSettings {
    /// Places the settings at the default scope of a configuration store
    pub fn to_scope_config(&self) -> InMemoryScopeConfig {
        let scope = StoreScope::Default;
        let mut config = InMemoryScopeConfig::new();

        config.set(
            scope.clone(),
            CONFIG_PATH_ENABLED,
            if self.enabled { "1" } else { "0" },
        );

        if let Some(token) = &self.api_token {
            config.set(scope.clone(), CONFIG_PATH_API_TOKEN, token);
        }

        if let Some(route) = &self.transactional_route {
            config.set(scope.clone(), CONFIG_PATH_TRANSACTIONAL_ROUTE, route);
        }

        if let Some(route) = &self.newsletter_route {
            config.set(scope, CONFIG_PATH_NEWSLETTER_ROUTE, route);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::config::ScopeConfig;

    use super::*;

    #[test]
    fn test_parse_settings_from_arguments() -> TestResult {
        let settings = LettermintSettings::try_parse_from([
            "relay",
            "--lettermint-enabled",
            "--lettermint-api-token",
            "lm_token",
            "--newsletter-route",
            "broadcast",
        ])?;

        assert!(settings.enabled);
        assert_eq!(settings.api_token.as_deref(), Some("lm_token"));
        assert_eq!(settings.newsletter_route.as_deref(), Some("broadcast"));
        assert_eq!(settings.transactional_route, None);
        assert_eq!(settings.timeout_secs, 30);

        Ok(())
    }

    #[test]
    fn test_settings_land_in_default_scope() {
        let settings = LettermintSettings {
            enabled: true,
            api_token: Some("lm_token".to_string()),
            transactional_route: Some("outgoing".to_string()),
            ..Default::default()
        };

        let config = settings.to_scope_config();
        let store = StoreScope::Store("default".to_string());

        assert!(config.is_set_flag(CONFIG_PATH_ENABLED, &store));
        assert_eq!(
            config.value(CONFIG_PATH_API_TOKEN, &store),
            Some("lm_token".to_string())
        );
        assert_eq!(
            config.value(CONFIG_PATH_TRANSACTIONAL_ROUTE, &StoreScope::Default),
            Some("outgoing".to_string())
        );
        assert_eq!(config.value(CONFIG_PATH_NEWSLETTER_ROUTE, &store), None);
    }

    #[test]
    fn test_disabled_settings_clear_the_flag() {
        let config = LettermintSettings::default().to_scope_config();

        assert!(!config.is_set_flag(CONFIG_PATH_ENABLED, &StoreScope::Default));
    }
}
