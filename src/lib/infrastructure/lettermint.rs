//! Lettermint delivery: HTTP client, transport and transport switching

mod client;
mod settings;
mod switcher;
mod transport;

pub use client::LettermintClient;
pub use settings::LettermintSettings;
pub use switcher::TransportSwitcher;
pub use transport::LettermintTransport;
