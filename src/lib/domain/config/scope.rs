//! Store-scoped configuration

use std::fmt;

#[cfg(test)]
use mockall::mock;

/// Whether the transport is switched on
pub const CONFIG_PATH_ENABLED: &str = "lettermint_email/general/enabled";

/// The encrypted API token
pub const CONFIG_PATH_API_TOKEN: &str = "lettermint_email/general/api_token";

/// Route tag for transactional mail
pub const CONFIG_PATH_TRANSACTIONAL_ROUTE: &str = "lettermint_email/routes/transactional_route";

/// Route tag for newsletter mail
pub const CONFIG_PATH_NEWSLETTER_ROUTE: &str = "lettermint_email/routes/newsletter_route";

/// The store a configuration value applies to
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StoreScope {
    /// The default scope every store falls back to
    #[default]
    Default,

    /// A single store, by code
    Store(String),
}

impl fmt::Display for StoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Store(code) => write!(f, "store:{}", code),
        }
    }
}

/// Read-only, store-scoped configuration
pub trait ScopeConfig: Send + Sync + 'static {
    /// The raw value at `path` for `scope`
    fn value(&self, path: &str, scope: &StoreScope) -> Option<String>;

    /// Whether the value at `path` is set to a truthy flag.
    ///
    /// Unset values, empty strings, `0` and `false` count as off.
    fn is_set_flag(&self, path: &str, scope: &StoreScope) -> bool {
        match self.value(path, scope) {
            Some(value) => {
                let value = value.trim();
                !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
            }
            None => false,
        }
    }
}

#[cfg(test)]
mock! {
    pub ScopeConfig {}

    impl ScopeConfig for ScopeConfig {
        fn value(&self, path: &str, scope: &StoreScope) -> Option<String>;
        fn is_set_flag(&self, path: &str, scope: &StoreScope) -> bool;
    }
}
