//! Mail module

pub mod address;
pub mod content;
pub mod errors;
pub mod message;
pub mod outbound;
pub mod provider;
pub mod transport;

pub use address::{Address, AddressError, AddressField};
pub use content::{extract_content, NormalizedContent};
pub use errors::MailError;
pub use message::{Body, EmailMessage, MailCategory, MimePart, TextPart};
pub use outbound::OutboundEmail;
pub use provider::{ApiToken, EmailProvider, ProviderError, SendResponse};
pub use transport::{MailTransport, TransportFactory, TransportState};
