//! Email message as handed over by the host application

use super::address::AddressField;

/// Whether a message is bulk/marketing mail or a transactional notification
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MailCategory {
    /// Order confirmations, password resets and other one-to-one mail
    #[default]
    Transactional,

    /// Newsletter queue mail
    Newsletter,
}

/// One part of a multipart body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MimePart {
    /// Declared media type, e.g. `text/html`
    pub media_type: String,

    /// Raw, undecoded content
    pub raw_content: String,
}

impl MimePart {
    /// Creates a new part
    pub fn new(media_type: &str, raw_content: &str) -> Self {
        Self {
            media_type: media_type.to_string(),
            raw_content: raw_content.to_string(),
        }
    }
}

/// A single typed text body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextPart {
    /// Media subtype, e.g. `html` or `plain`
    pub media_subtype: String,

    /// The body
    pub body: String,
}

impl TextPart {
    /// Creates an HTML part
    pub fn html(body: &str) -> Self {
        Self {
            media_subtype: "html".to_string(),
            body: body.to_string(),
        }
    }

    /// Creates a plain text part
    pub fn plain(body: &str) -> Self {
        Self {
            media_subtype: "plain".to_string(),
            body: body.to_string(),
        }
    }
}

/// Message body
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// A multipart container
    Multipart(Vec<MimePart>),

    /// A single typed part
    Text(TextPart),

    /// Anything else, kept in its string form
    Other(String),
}

impl Default for Body {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

/// Email message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailMessage {
    /// The sender
    pub from: Option<AddressField>,

    /// The recipients
    pub to: Option<AddressField>,

    /// Carbon copy recipients
    pub cc: Option<AddressField>,

    /// Blind carbon copy recipients
    pub bcc: Option<AddressField>,

    /// Reply-to address
    pub reply_to: Option<AddressField>,

    /// The subject
    pub subject: Option<String>,

    /// The body
    pub body: Body,

    /// How the message should be routed
    pub category: MailCategory,
}

impl EmailMessage {
    /// Whether the message was classified as a newsletter by its sender
    pub fn is_newsletter(&self) -> bool {
        self.category == MailCategory::Newsletter
    }
}
