//! Configuration module

mod encryptor;
mod scope;

pub use encryptor::Encryptor;
pub use scope::{
    ScopeConfig, StoreScope, CONFIG_PATH_API_TOKEN, CONFIG_PATH_ENABLED,
    CONFIG_PATH_NEWSLETTER_ROUTE, CONFIG_PATH_TRANSACTIONAL_ROUTE,
};
