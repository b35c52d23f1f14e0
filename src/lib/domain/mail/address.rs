//! Mail addresses and their normalization into provider request fields

use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref MAILBOX_REGEX: Regex =
        Regex::new(r#"^\s*(?:"?([^"<]*?)"?\s*<([^<>\s]+)>|([^<>\s]+))\s*$"#).unwrap();
}

/// An error that can occur when parsing an address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The address is empty
    #[error("address is empty")]
    EmptyAddress,

    /// The address could not be parsed
    #[error("address \"{0}\" is invalid")]
    InvalidAddress(String),
}

/// A single address: an email and an optional display name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    email: String,
    name: Option<String>,
}

impl Address {
    /// Creates an address without a display name
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            name: None,
        }
    }

    /// Creates an address with a display name
    pub fn with_name(email: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            name: Some(name.to_string()),
        }
    }

    /// The email part of the address
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The display name, if one is set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Renders the address as `Name <email>`, or the bare email when there is no name
    pub fn to_mailbox_string(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.email),
            _ => self.email.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_mailbox_string())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().is_empty() {
            return Err(AddressError::EmptyAddress);
        }

        let captures = MAILBOX_REGEX
            .captures(raw)
            .ok_or_else(|| AddressError::InvalidAddress(raw.to_string()))?;

        if let Some(email) = captures.get(3) {
            return Ok(Self::new(email.as_str()));
        }

        let email = captures
            .get(2)
            .ok_or_else(|| AddressError::InvalidAddress(raw.to_string()))?;

        match captures.get(1).map(|m| m.as_str().trim()) {
            Some(name) if !name.is_empty() => Ok(Self::with_name(email.as_str(), name)),
            _ => Ok(Self::new(email.as_str())),
        }
    }
}

/// An address header value as the host hands it over
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressField {
    /// One address value
    Single(Address),

    /// A collection of address values
    List(Vec<Address>),

    /// A raw, unparsed string
    Raw(String),
}

impl AddressField {
    /// Whether the field carries nothing worth sending
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::List(addresses) => addresses.is_empty(),
            Self::Raw(raw) => raw.is_empty(),
        }
    }
}

impl From<Address> for AddressField {
    fn from(address: Address) -> Self {
        Self::Single(address)
    }
}

impl From<Vec<Address>> for AddressField {
    fn from(addresses: Vec<Address>) -> Self {
        Self::List(addresses)
    }
}

impl From<&str> for AddressField {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

/// Normalizes a single-valued sender field.
///
/// Named addresses render as `Name <email>`; a list contributes its first entry;
/// raw strings pass through untouched.
pub fn normalize_single(field: Option<&AddressField>) -> Option<String> {
    let field = field.filter(|f| !f.is_empty())?;

    match field {
        AddressField::Single(address) => Some(address.to_mailbox_string()),
        AddressField::List(addresses) => addresses.first().map(Address::to_mailbox_string),
        AddressField::Raw(raw) => Some(raw.clone()),
    }
}

/// Normalizes the reply-to field into a bare email.
pub fn normalize_reply_to(field: Option<&AddressField>) -> Option<String> {
    let field = field.filter(|f| !f.is_empty())?;

    match field {
        AddressField::Single(address) => Some(address.email().to_string()),
        AddressField::List(addresses) => addresses.first().map(|a| a.email().to_string()),
        AddressField::Raw(raw) => Some(raw.clone()),
    }
}

/// Normalizes a recipient field into bare emails, names dropped, order kept.
pub fn normalize_many(field: Option<&AddressField>) -> Vec<String> {
    match field {
        None => vec![],
        Some(AddressField::Single(address)) => vec![address.email().to_string()],
        Some(AddressField::List(addresses)) => {
            addresses.iter().map(|a| a.email().to_string()).collect()
        }
        Some(AddressField::Raw(raw)) if raw.is_empty() => vec![],
        Some(AddressField::Raw(raw)) => vec![raw.clone()],
    }
}
