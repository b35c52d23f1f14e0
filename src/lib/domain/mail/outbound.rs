//! Outbound request sent to the email provider

/// A request to the provider, built fresh for every send.
///
/// Mirrors the provider SDK's fluent style: every setter consumes and returns
/// the request. Empty recipient lists and unset optionals are left out of the
/// wire payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutboundEmail {
    from: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    reply_to: Option<String>,
    subject: Option<String>,
    html: Option<String>,
    text: Option<String>,
    route: Option<String>,
}

impl OutboundEmail {
    /// Starts an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender, `Name <email>` or a bare email
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Sets the recipients
    pub fn to(mut self, to: Vec<String>) -> Self {
        self.to = to;
        self
    }

    /// Sets the carbon copy recipients
    pub fn cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }

    /// Sets the blind carbon copy recipients
    pub fn bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = bcc;
        self
    }

    /// Sets the reply-to address
    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Sets the subject
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the HTML body
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Sets the plain text body
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Selects the delivery route
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// The sender
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// The recipients
    pub fn recipients(&self) -> &[String] {
        &self.to
    }

    /// The carbon copy recipients
    pub fn cc_recipients(&self) -> &[String] {
        &self.cc
    }

    /// The blind carbon copy recipients
    pub fn bcc_recipients(&self) -> &[String] {
        &self.bcc
    }

    /// The reply-to address
    pub fn reply_to_address(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }

    /// The subject
    pub fn subject_line(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// The HTML body
    pub fn html_body(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// The plain text body
    pub fn text_body(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The selected route
    pub fn selected_route(&self) -> Option<&str> {
        self.route.as_deref()
    }
}
