//! Message builder with incremental size and recipient accounting.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::clock::{self, Clock};
use crate::error::{require, ValidationError};
use crate::types::{
    ClickTracking, EmailAddress, FileAttachment, Message, Recipient, MAX_MESSAGE_SIZE,
    MAX_RECIPIENTS,
};

/// How far ahead delivery may be scheduled.
const MAX_SCHEDULE_DAYS: i64 = 3;

/// Estimated byte size of a text part: two bytes per UTF-16 code unit.
fn text_size(value: &str) -> u64 {
    value.encode_utf16().count() as u64 * 2
}

/// Builder for [`Message`] that validates every mutation as it happens.
///
/// The builder keeps a running byte total over subject, text, HTML, and every
/// attachment or inline image, and rejects the part that would push it past
/// [`MAX_MESSAGE_SIZE`]. Parts added before a rejection stay in place.
///
/// Recipients are capped at [`MAX_RECIPIENTS`]. Once any recipient carries
/// template variables, every recipient must: the number of variable entries
/// has to equal the number of recipients after each addition.
///
/// A builder is meant to be driven by a single caller; it has no internal
/// locking.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::builders::MessageBuilder;
/// use integrations_mailgun::types::{FormPayload, Recipient};
/// use serde_json::json;
///
/// let mut builder = MessageBuilder::new();
/// builder
///     .from("Excited User <mailgun@example.com>")?
///     .add_recipient(Recipient::new("bob@example.com")?.with_variables(json!({"first": "Bob"})))?
///     .add_recipient(Recipient::new("alice@example.com")?.with_variables(json!({"first": "Alice"})))?
///     .subject("Hello %recipient.first%")?
///     .text("Testing some Mailgun awesomeness!")?
///     .add_tag("newsletter")?;
///
/// let message = builder.build();
/// let form = message.to_form_content()?;
/// assert_eq!(form.get("to"), Some("bob@example.com,alice@example.com"));
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
pub struct MessageBuilder {
    message: Message,
    clock: Arc<dyn Clock>,
    size: u64,
    subject_size: u64,
    text_size: u64,
    html_size: u64,
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("message", &self.message)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl MessageBuilder {
    /// Create a builder that checks delivery times against the system clock.
    pub fn new() -> Self {
        Self::with_clock(clock::system())
    }

    /// Create a builder with an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            message: Message::default(),
            clock,
            size: 0,
            subject_size: 0,
            text_size: 0,
            html_size: 0,
        }
    }

    /// Bytes charged against the size budget so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of `to` recipients added so far.
    pub fn recipient_count(&self) -> usize {
        self.message.to.len()
    }

    /// Replace a previous charge of `previous` bytes with `next` bytes.
    fn charge(&mut self, field: &str, previous: u64, next: u64) -> Result<(), ValidationError> {
        let total = self
            .size
            .checked_sub(previous)
            .and_then(|size| size.checked_add(next))
            .filter(|total| *total <= MAX_MESSAGE_SIZE);
        let Some(total) = total else {
            #[cfg(feature = "tracing")]
            tracing::warn!(field, size = self.size, next, limit = MAX_MESSAGE_SIZE, "Message size budget exceeded");

            return Err(ValidationError::out_of_range(
                field,
                format!(
                    "adding {} bytes would exceed the {} byte limit",
                    next, MAX_MESSAGE_SIZE
                ),
            ));
        };
        self.size = total;
        Ok(())
    }

    /// Set the sender.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] if the address is blank
    /// - [`ValidationError::Malformed`] if the address does not parse
    pub fn from(&mut self, address: &str) -> Result<&mut Self, ValidationError> {
        require("from", address)?;
        self.message.from = Some(EmailAddress::parse(address)?);
        Ok(self)
    }

    /// Add a `to` recipient.
    ///
    /// # Errors
    ///
    /// [`ValidationError::OutOfRange`] if the recipient cap would be exceeded
    /// or if the recipient-variable count would no longer match the
    /// recipient count. Nothing is added on error.
    pub fn add_recipient(&mut self, recipient: Recipient) -> Result<&mut Self, ValidationError> {
        self.add_recipients(std::iter::once(recipient))
    }

    /// Add several `to` recipients as one unit.
    ///
    /// Either every recipient in the batch is added or none is.
    pub fn add_recipients(
        &mut self,
        recipients: impl IntoIterator<Item = Recipient>,
    ) -> Result<&mut Self, ValidationError> {
        let batch: Vec<Recipient> = recipients.into_iter().collect();
        let total = self.message.to.len() + batch.len();
        if total > MAX_RECIPIENTS {
            #[cfg(feature = "tracing")]
            tracing::warn!(total, limit = MAX_RECIPIENTS, "Recipient limit exceeded");

            return Err(ValidationError::out_of_range(
                "to",
                format!("at most {} recipients are allowed", MAX_RECIPIENTS),
            ));
        }

        let mut new_keys: Vec<&str> = Vec::new();
        for recipient in &batch {
            if recipient.variables().is_some() {
                let key = recipient.address().address();
                if !self.message.recipient_variables.contains_key(key) && !new_keys.contains(&key) {
                    new_keys.push(key);
                }
            }
        }
        let variable_count = self.message.recipient_variables.len() + new_keys.len();
        if variable_count > 0 && variable_count != total {
            return Err(ValidationError::out_of_range(
                "recipient-variables",
                format!(
                    "{} recipient variable entries for {} recipients",
                    variable_count, total
                ),
            ));
        }

        for recipient in batch {
            if let Some(variables) = recipient.variables() {
                self.message
                    .recipient_variables
                    .insert(recipient.address().address().to_string(), variables.clone());
            }
            self.message.to.push(recipient);
        }
        Ok(self)
    }

    /// Add a carbon-copy address. Repeated addresses are kept once.
    pub fn add_cc(&mut self, address: &str) -> Result<&mut Self, ValidationError> {
        let address = EmailAddress::parse(address)?;
        if !self.message.cc.iter().any(|a| a.address() == address.address()) {
            self.message.cc.push(address);
        }
        Ok(self)
    }

    /// Add a blind carbon-copy address. Repeated addresses are kept once.
    pub fn add_bcc(&mut self, address: &str) -> Result<&mut Self, ValidationError> {
        let address = EmailAddress::parse(address)?;
        if !self.message.bcc.iter().any(|a| a.address() == address.address()) {
            self.message.bcc.push(address);
        }
        Ok(self)
    }

    /// Set the subject line.
    ///
    /// Replacing an earlier subject releases its charge first.
    pub fn subject(&mut self, subject: &str) -> Result<&mut Self, ValidationError> {
        require("subject", subject)?;
        let size = text_size(subject);
        self.charge("subject", self.subject_size, size)?;
        self.subject_size = size;
        self.message.subject = Some(subject.to_string());
        Ok(self)
    }

    /// Set the plain text body.
    pub fn text(&mut self, body: &str) -> Result<&mut Self, ValidationError> {
        require("text", body)?;
        let size = text_size(body);
        self.charge("text", self.text_size, size)?;
        self.text_size = size;
        self.message.text = Some(body.to_string());
        Ok(self)
    }

    /// Set the HTML body.
    pub fn html(&mut self, body: &str) -> Result<&mut Self, ValidationError> {
        require("html", body)?;
        let size = text_size(body);
        self.charge("html", self.html_size, size)?;
        self.html_size = size;
        self.message.html = Some(body.to_string());
        Ok(self)
    }

    /// Add an attachment, charging its length against the size budget.
    pub fn add_attachment(&mut self, attachment: FileAttachment) -> Result<&mut Self, ValidationError> {
        self.charge("attachment", 0, attachment.len())?;
        self.message.attachments.push(attachment);
        Ok(self)
    }

    /// Add several attachments, one at a time.
    ///
    /// Stops at the first attachment that exceeds the budget; the ones added
    /// before it stay.
    pub fn add_attachments(
        &mut self,
        attachments: impl IntoIterator<Item = FileAttachment>,
    ) -> Result<&mut Self, ValidationError> {
        for attachment in attachments {
            self.add_attachment(attachment)?;
        }
        Ok(self)
    }

    /// Add an inline image. Shares the size budget with attachments.
    pub fn add_inline_image(&mut self, image: FileAttachment) -> Result<&mut Self, ValidationError> {
        self.charge("inline", 0, image.len())?;
        self.message.inline.push(image);
        Ok(self)
    }

    /// Add a tag. Repeated tags are kept once.
    pub fn add_tag(&mut self, tag: &str) -> Result<&mut Self, ValidationError> {
        require("tag", tag)?;
        if !self.message.tags.iter().any(|t| t == tag) {
            self.message.tags.push(tag.to_string());
        }
        Ok(self)
    }

    /// Add a custom MIME header, sent as `h:<name>`.
    pub fn add_custom_header(&mut self, name: &str, value: &str) -> Result<&mut Self, ValidationError> {
        require("header name", name)?;
        require(name, value)?;
        self.message
            .custom_headers
            .insert(name.to_string(), value.to_string());
        Ok(self)
    }

    /// Set the `Reply-To` header.
    pub fn reply_to(&mut self, address: &str) -> Result<&mut Self, ValidationError> {
        let address = EmailAddress::parse(address)?;
        self.add_custom_header("Reply-To", &address.to_string())
    }

    /// Attach custom JSON data, sent as `v:<name>`.
    pub fn add_custom_data(&mut self, name: &str, value: Value) -> Result<&mut Self, ValidationError> {
        require("custom data name", name)?;
        self.message.custom_data.insert(name.to_string(), value);
        Ok(self)
    }

    /// Schedule delivery.
    ///
    /// # Errors
    ///
    /// [`ValidationError::OutOfRange`] if `at` is more than three days after
    /// the clock's current instant.
    pub fn delivery_time(&mut self, at: DateTime<Utc>) -> Result<&mut Self, ValidationError> {
        let latest = self.clock.now() + Duration::days(MAX_SCHEDULE_DAYS);
        if at > latest {
            return Err(ValidationError::out_of_range(
                "o:deliverytime",
                format!("delivery can be scheduled at most {} days ahead", MAX_SCHEDULE_DAYS),
            ));
        }
        self.message.delivery_time = Some(at);
        Ok(self)
    }

    /// Toggle test mode.
    pub fn test_mode(&mut self, enabled: bool) -> &mut Self {
        self.message.test_mode = Some(enabled);
        self
    }

    /// Toggle tracking.
    pub fn tracking(&mut self, enabled: bool) -> &mut Self {
        self.message.tracking = Some(enabled);
        self
    }

    /// Set click tracking mode.
    pub fn tracking_clicks(&mut self, mode: ClickTracking) -> &mut Self {
        self.message.tracking_clicks = Some(mode);
        self
    }

    /// Toggle open tracking.
    pub fn tracking_opens(&mut self, enabled: bool) -> &mut Self {
        self.message.tracking_opens = Some(enabled);
        self
    }

    /// Require a TLS connection to the recipient's server.
    pub fn require_tls(&mut self, enabled: bool) -> &mut Self {
        self.message.require_tls = Some(enabled);
        self
    }

    /// Skip certificate and hostname verification over TLS.
    pub fn skip_verification(&mut self, enabled: bool) -> &mut Self {
        self.message.skip_verification = Some(enabled);
        self
    }

    /// Toggle DKIM signing.
    pub fn dkim(&mut self, enabled: bool) -> &mut Self {
        self.message.dkim = Some(enabled);
        self
    }

    /// Return the assembled message.
    ///
    /// Validation already happened on each mutation; nothing is re-checked.
    pub fn build(self) -> Message {
        self.message
    }
}
