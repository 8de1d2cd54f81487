//! Email address and recipient types.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{require, ValidationError};

static ADDR_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("address pattern is valid")
});

static NAME_ADDR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*"?([^"<]*?)"?\s*<([^<>]+)>\s*$"#).expect("name-addr pattern is valid")
});

/// A syntactically valid email address with an optional display name.
///
/// Accepts both the bare form (`user@example.com`) and the name-addr form
/// (`Jane Doe <user@example.com>`).
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::types::EmailAddress;
///
/// let address: EmailAddress = "Jane Doe <jane@example.com>".parse()?;
/// assert_eq!(address.address(), "jane@example.com");
/// assert_eq!(address.display_name(), Some("Jane Doe"));
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    address: String,
    display_name: Option<String>,
}

impl EmailAddress {
    /// Parse an address in bare or name-addr form.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        require("address", input)?;

        if let Some(captures) = NAME_ADDR.captures(input) {
            let name = captures.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            let address = captures.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            let parsed = Self::bare(address)?;
            return Ok(if name.is_empty() {
                parsed
            } else {
                Self {
                    display_name: Some(name.to_string()),
                    ..parsed
                }
            });
        }

        Self::bare(input.trim())
    }

    /// Create an address with an explicit display name.
    pub fn with_name(address: &str, display_name: &str) -> Result<Self, ValidationError> {
        let parsed = Self::bare(address.trim())?;
        let name = display_name.trim();
        Ok(Self {
            display_name: (!name.is_empty()).then(|| name.to_string()),
            ..parsed
        })
    }

    fn bare(address: &str) -> Result<Self, ValidationError> {
        require("address", address)?;
        if !ADDR_SPEC.is_match(address) {
            return Err(ValidationError::malformed(
                "address",
                format!("'{}' is not a valid email address", address),
            ));
        }
        Ok(Self {
            address: address.to_string(),
            display_name: None,
        })
    }

    /// The bare `local@domain` part.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The display name, if one was given.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The part after `@`.
    pub fn domain(&self) -> &str {
        self.address
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or_default()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) if name.contains([',', '"', '<', '>', '@', ';', ':']) => {
                write!(f, "\"{}\" <{}>", name.replace('"', "\\\""), self.address)
            }
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => f.write_str(&self.address),
        }
    }
}

impl FromStr for EmailAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Serialize for EmailAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A message recipient with optional template variables.
///
/// Variables are merged into `recipient-variables` keyed by the bare address.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    address: EmailAddress,
    variables: Option<Value>,
}

impl Recipient {
    /// Create a recipient from an address string.
    pub fn new(address: &str) -> Result<Self, ValidationError> {
        Ok(Self::from_address(EmailAddress::parse(address)?))
    }

    /// Create a recipient from an already parsed address.
    pub fn from_address(address: EmailAddress) -> Self {
        Self {
            address,
            variables: None,
        }
    }

    /// Attach template variables for this recipient.
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    /// The recipient address.
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }

    /// The recipient's template variables.
    pub fn variables(&self) -> Option<&Value> {
        self.variables.as_ref()
    }
}

impl From<EmailAddress> for Recipient {
    fn from(address: EmailAddress) -> Self {
        Self::from_address(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("user@example.com")]
    #[case("first.last+tag@sub.example.co.uk")]
    #[case("postmaster@localhost")]
    #[case("o'brien@example.ie")]
    fn test_parse_valid_bare(#[case] input: &str) {
        let address = EmailAddress::parse(input).unwrap();
        assert_eq!(address.address(), input);
        assert_eq!(address.display_name(), None);
        assert_eq!(address.to_string(), input);
    }

    #[rstest]
    #[case("not-an-address")]
    #[case("missing@")]
    #[case("@example.com")]
    #[case("two@@example.com")]
    #[case("spaces in@example.com")]
    #[case("user@-example.com")]
    fn test_parse_malformed(#[case] input: &str) {
        let error = EmailAddress::parse(input).unwrap_err();
        assert!(matches!(error, ValidationError::Malformed { .. }), "{input}");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_parse_blank(#[case] input: &str) {
        assert_eq!(
            EmailAddress::parse(input).unwrap_err(),
            ValidationError::missing_field("address")
        );
    }

    #[test]
    fn test_parse_name_addr() {
        let address = EmailAddress::parse("Jane Doe <jane@example.com>").unwrap();
        assert_eq!(address.address(), "jane@example.com");
        assert_eq!(address.display_name(), Some("Jane Doe"));
        assert_eq!(address.to_string(), "Jane Doe <jane@example.com>");
        assert_eq!(address.domain(), "example.com");
    }

    #[test]
    fn test_parse_quoted_name_addr() {
        let address = EmailAddress::parse("\"Doe, Jane\" <jane@example.com>").unwrap();
        assert_eq!(address.display_name(), Some("Doe, Jane"));
        assert_eq!(address.to_string(), "\"Doe, Jane\" <jane@example.com>");
    }

    #[test]
    fn test_parse_angle_brackets_without_name() {
        let address = EmailAddress::parse("<jane@example.com>").unwrap();
        assert_eq!(address.display_name(), None);
        assert_eq!(address.to_string(), "jane@example.com");
    }

    #[test]
    fn test_name_addr_with_malformed_address() {
        let error = EmailAddress::parse("Jane <jane.example.com>").unwrap_err();
        assert!(matches!(error, ValidationError::Malformed { .. }));
    }

    #[test]
    fn test_with_name() {
        let address = EmailAddress::with_name("ops@example.com", "Ops Team").unwrap();
        assert_eq!(address.to_string(), "Ops Team <ops@example.com>");

        let unnamed = EmailAddress::with_name("ops@example.com", " ").unwrap();
        assert_eq!(unnamed.display_name(), None);
    }

    #[test]
    fn test_serialize_as_string() {
        let address = EmailAddress::parse("Jane <jane@example.com>").unwrap();
        assert_eq!(
            serde_json::to_value(&address).unwrap(),
            json!("Jane <jane@example.com>")
        );
    }

    #[test]
    fn test_recipient_variables() {
        let recipient = Recipient::new("bob@example.com")
            .unwrap()
            .with_variables(json!({"first": "Bob", "id": 1}));
        assert_eq!(recipient.address().address(), "bob@example.com");
        assert_eq!(recipient.variables().unwrap()["first"], "Bob");
    }
}
