//! Concrete transports, configuration stores and the Lettermint HTTP client

pub mod config;
pub mod email;
pub mod lettermint;
