//! Default host transports

mod noop;
mod smtp;

pub use noop::{NoopMailTransport, NoopTransportFactory};
pub use smtp::{to_lettre_message, SMTPConfig, SmtpMailTransport, SmtpTransportFactory};
