//! Bounce, complaint, and unsubscribe suppression entries.
//!
//! Each entry renders as form content for a single add, or through
//! [`to_json_batch`](super::to_json_batch) as an array for the batch
//! endpoints.

use chrono::{DateTime, Utc};

use super::{EmailAddress, FormContent, FormPayload, SmtpErrorCode};
use crate::error::{require, ValidationError};

fn rfc2822(at: &DateTime<Utc>) -> String {
    at.to_rfc2822()
}

/// An address to add to `/{domain}/bounces`.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::types::{BounceRequest, FormPayload, SmtpErrorCode};
///
/// let bounce = BounceRequest::new("gone@example.com")?
///     .with_code(SmtpErrorCode::MailboxUnavailable)
///     .with_error("Mailbox does not exist")?;
///
/// let form = bounce.to_form_content()?;
/// assert_eq!(form.get("code"), Some("550"));
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BounceRequest {
    address: EmailAddress,
    code: Option<SmtpErrorCode>,
    error: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl BounceRequest {
    /// Create a bounce entry for `address`.
    pub fn new(address: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            address: EmailAddress::parse(address)?,
            code: None,
            error: None,
            created_at: None,
        })
    }

    /// Set the SMTP error code.
    pub fn with_code(mut self, code: SmtpErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the error description.
    pub fn with_error(mut self, error: &str) -> Result<Self, ValidationError> {
        require("error", error)?;
        self.error = Some(error.to_string());
        Ok(self)
    }

    /// Set when the bounce happened.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The bounced address.
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }
}

impl FormPayload for BounceRequest {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let mut form = FormContent::new();
        form.push("address", self.address.address());
        form.push_opt("code", self.code.map(|c| c.as_str()));
        form.push_opt("error", self.error.as_deref());
        form.push_opt("created_at", self.created_at.as_ref().map(rfc2822));
        Ok(form)
    }
}

/// An address to add to `/{domain}/complaints`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintRequest {
    address: EmailAddress,
    created_at: Option<DateTime<Utc>>,
}

impl ComplaintRequest {
    /// Create a complaint entry for `address`.
    pub fn new(address: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            address: EmailAddress::parse(address)?,
            created_at: None,
        })
    }

    /// Set when the complaint was received.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The complaining address.
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }
}

impl FormPayload for ComplaintRequest {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let mut form = FormContent::new();
        form.push("address", self.address.address());
        form.push_opt("created_at", self.created_at.as_ref().map(rfc2822));
        Ok(form)
    }
}

/// An address to add to `/{domain}/unsubscribes`.
///
/// Without a tag the address is unsubscribed from all mail on the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsubscriberRequest {
    address: EmailAddress,
    tag: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl UnsubscriberRequest {
    /// Create an unsubscribe entry for `address`.
    pub fn new(address: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            address: EmailAddress::parse(address)?,
            tag: None,
            created_at: None,
        })
    }

    /// Unsubscribe only from messages carrying `tag`.
    pub fn with_tag(mut self, tag: &str) -> Result<Self, ValidationError> {
        require("tag", tag)?;
        self.tag = Some(tag.to_string());
        Ok(self)
    }

    /// Set when the unsubscribe happened.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The unsubscribed address.
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }

    /// The tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl FormPayload for UnsubscriberRequest {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let mut form = FormContent::new();
        form.push("address", self.address.address());
        form.push_opt("tag", self.tag.as_deref());
        form.push_opt("created_at", self.created_at.as_ref().map(rfc2822));
        Ok(form)
    }
}
