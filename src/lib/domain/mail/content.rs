//! Body extraction

use super::{
    errors::MailError,
    message::{Body, EmailMessage},
};

const TEXT_HTML: &str = "text/html";
const TEXT_PLAIN: &str = "text/plain";

/// HTML and plain text bodies pulled out of a message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedContent {
    /// The HTML body
    pub html: Option<String>,

    /// The plain text body
    pub text: Option<String>,
}

/// Extracts the HTML and plain text bodies of `message`.
///
/// Multipart bodies contribute their `text/html` and `text/plain` parts, the
/// last part of each type winning. A single text part is routed by its subtype
/// and any other body is taken as plain text. Content is never transformed.
///
/// Only the empty string counts as missing, so a body of `"0"` is kept.
///
/// # Errors
/// [`MailError::ContentMissing`] if both bodies end up empty.
pub fn extract_content(message: &EmailMessage) -> Result<NormalizedContent, MailError> {
    let mut html = String::new();
    let mut text = String::new();

    match &message.body {
        Body::Multipart(parts) => {
            for part in parts {
                match part.media_type.as_str() {
                    TEXT_HTML => html = part.raw_content.clone(),
                    TEXT_PLAIN => text = part.raw_content.clone(),
                    _ => {}
                }
            }
        }
        Body::Text(part) if part.media_subtype == "html" => html = part.body.clone(),
        Body::Text(part) => text = part.body.clone(),
        Body::Other(raw) => text = raw.clone(),
    }

    if html.is_empty() && text.is_empty() {
        return Err(MailError::ContentMissing);
    }

    Ok(NormalizedContent {
        html: Some(html).filter(|s| !s.is_empty()),
        text: Some(text).filter(|s| !s.is_empty()),
    })
}
