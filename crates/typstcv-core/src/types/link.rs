//! Links: web URLs and the `mailto:` / `tel:` shorthands

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Serialize, Serializer};
use thiserror::Error;
use url::Url;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("BUG: invalid EMAIL_RE regex literal")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 ()./\-]{3,}[0-9]$").expect("BUG: invalid PHONE_RE regex literal")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("'{value}' is not a valid URL: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("'{value}' must use http or https")]
    UnsupportedScheme { value: String },

    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },

    #[error("'{value}' is not a valid phone number (digits, optional leading +, separators - . / ( ) or space)")]
    InvalidPhone { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Url(Url),
    Email(String),
    Phone(String),
}

impl Link {
    /// Absolute `http`/`https` URL
    pub fn url(input: &str) -> Result<Self, LinkError> {
        let value = input.trim();
        let url = Url::parse(value).map_err(|e| LinkError::InvalidUrl {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(Link::Url(url)),
            _ => Err(LinkError::UnsupportedScheme {
                value: value.to_string(),
            }),
        }
    }

    pub fn email(input: &str) -> Result<Self, LinkError> {
        let value = input.trim();
        let address = value.strip_prefix("mailto:").unwrap_or(value);
        if !EMAIL_RE.is_match(address) {
            return Err(LinkError::InvalidEmail {
                value: value.to_string(),
            });
        }
        Ok(Link::Email(address.to_string()))
    }

    pub fn phone(input: &str) -> Result<Self, LinkError> {
        let value = input.trim();
        let number = value.strip_prefix("tel:").unwrap_or(value);
        if !PHONE_RE.is_match(number) {
            return Err(LinkError::InvalidPhone {
                value: value.to_string(),
            });
        }
        Ok(Link::Phone(number.to_string()))
    }

    /// Link target
    pub fn href(&self) -> String {
        match self {
            Link::Url(url) => url.to_string(),
            Link::Email(address) => format!("mailto:{}", address),
            Link::Phone(number) => {
                let digits: String = number
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '+')
                    .collect();
                format!("tel:{}", digits)
            }
        }
    }

    /// Text shown for the link
    pub fn display(&self) -> String {
        match self {
            Link::Url(url) => clean_url(url.as_str()),
            Link::Email(address) => address.clone(),
            Link::Phone(number) => number.clone(),
        }
    }
}

/// `https://www.example.com/a/` → `example.com/a`
pub fn clean_url(url: &str) -> String {
    let mut rest = url.trim();
    for scheme in ["https://", "http://"] {
        if let Some(stripped) = rest.strip_prefix(scheme) {
            rest = stripped;
            break;
        }
    }
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.trim_end_matches('/').to_string()
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Url(url) => f.write_str(url.as_str()),
            Link::Email(address) => f.write_str(address),
            Link::Phone(number) => f.write_str(number),
        }
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl JsonSchema for Link {
    fn schema_name() -> Cow<'static, str> {
        "Url".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "format": "uri",
            "pattern": "^https?://"
        })
    }
}

/// Schema-only marker for email fields
pub struct EmailSchema;

impl JsonSchema for EmailSchema {
    fn schema_name() -> Cow<'static, str> {
        "Email".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({ "type": "string", "format": "email" })
    }
}

/// Schema-only marker for phone fields
pub struct PhoneSchema;

impl JsonSchema for PhoneSchema {
    fn schema_name() -> Cow<'static, str> {
        "Phone".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": r"^(tel:)?\+?[0-9][0-9 ()./\-]{3,}[0-9]$"
        })
    }
}
