//! Builder for event log queries.

use chrono::{DateTime, Utc};

use crate::error::{require, ValidationError};
use crate::types::{EmailAddress, EventRequest, EventType, Severity, MAX_EVENT_LIMIT};

/// Builder for [`EventRequest`].
///
/// Each setter validates its own field only; [`build`](Self::build) checks
/// the one cross-field rule, that a severity filter needs the `failed` event
/// type.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::builders::EventRequestBuilder;
/// use integrations_mailgun::types::EventType;
///
/// let mut builder = EventRequestBuilder::new();
/// builder
///     .result_limit(25)?
///     .add_event_type(EventType::Clicked)
///     .add_event_type(EventType::Opened);
///
/// let request = builder.build()?;
/// assert_eq!(
///     request.to_query_string()?,
///     "limit=25&event=(clicked%20or%20opened)"
/// );
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Default)]
pub struct EventRequestBuilder {
    request: EventRequest,
}

impl EventRequestBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size (1 to 300).
    pub fn result_limit(&mut self, limit: u32) -> Result<&mut Self, ValidationError> {
        if limit == 0 || limit > MAX_EVENT_LIMIT {
            return Err(ValidationError::out_of_range(
                "limit",
                format!("must be between 1 and {}", MAX_EVENT_LIMIT),
            ));
        }
        self.request.limit = limit;
        Ok(self)
    }

    /// Set the start of the time range.
    pub fn begin(&mut self, begin: DateTime<Utc>) -> &mut Self {
        self.request.begin = Some(begin);
        self
    }

    /// Set the end of the time range.
    pub fn end(&mut self, end: DateTime<Utc>) -> &mut Self {
        self.request.end = Some(end);
        self
    }

    /// Traverse results oldest first.
    pub fn ascending(&mut self, ascending: bool) -> &mut Self {
        self.request.ascending = Some(ascending);
        self
    }

    /// Ask for pretty-printed JSON.
    pub fn pretty(&mut self, pretty: bool) -> &mut Self {
        self.request.pretty = Some(pretty);
        self
    }

    /// Match messages of exactly `size` bytes.
    pub fn message_size(&mut self, size: i64) -> Result<&mut Self, ValidationError> {
        if size <= 0 {
            return Err(ValidationError::out_of_range("size", "must be positive"));
        }
        self.request.size = Some(size as u64);
        Ok(self)
    }

    /// Match a `Message-Id`.
    pub fn message_id(&mut self, message_id: &str) -> Result<&mut Self, ValidationError> {
        require("message-id", message_id)?;
        self.request.message_id = Some(message_id.to_string());
        Ok(self)
    }

    /// Match a subject.
    pub fn subject(&mut self, subject: &str) -> Result<&mut Self, ValidationError> {
        require("subject", subject)?;
        self.request.subject = Some(subject.to_string());
        Ok(self)
    }

    /// Match an attachment file name.
    pub fn attachment(&mut self, filename: &str) -> Result<&mut Self, ValidationError> {
        require("attachment", filename)?;
        self.request.attachment = Some(filename.to_string());
        Ok(self)
    }

    /// Match the envelope recipient.
    pub fn recipient(&mut self, address: &str) -> Result<&mut Self, ValidationError> {
        self.request.recipient = Some(EmailAddress::parse(address)?.address().to_string());
        Ok(self)
    }

    /// Match the `To` header.
    pub fn to(&mut self, address: &str) -> Result<&mut Self, ValidationError> {
        self.request.to = Some(EmailAddress::parse(address)?.address().to_string());
        Ok(self)
    }

    /// Match the `From` header.
    pub fn from(&mut self, address: &str) -> Result<&mut Self, ValidationError> {
        self.request.from = Some(EmailAddress::parse(address)?.address().to_string());
        Ok(self)
    }

    /// Add an event type to match. Repeats are ignored.
    pub fn add_event_type(&mut self, event: EventType) -> &mut Self {
        if !self.request.event_types.contains(&event) {
            self.request.event_types.push(event);
        }
        self
    }

    /// Add several event types to match.
    pub fn add_event_types(&mut self, events: impl IntoIterator<Item = EventType>) -> &mut Self {
        for event in events {
            self.add_event_type(event);
        }
        self
    }

    /// Filter failed events by severity.
    pub fn severity(&mut self, severity: Severity) -> &mut Self {
        self.request.severity = Some(severity);
        self
    }

    /// Add a tag to match. Repeats are ignored.
    pub fn add_tag(&mut self, tag: &str) -> Result<&mut Self, ValidationError> {
        require("tags", tag)?;
        if !self.request.tags.iter().any(|t| t == tag) {
            self.request.tags.push(tag.to_string());
        }
        Ok(self)
    }

    /// Return the assembled request.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidOperation`] if a severity is set but the
    /// `failed` event type is not.
    pub fn build(self) -> Result<EventRequest, ValidationError> {
        if self.request.severity.is_some()
            && !self.request.event_types.contains(&EventType::Failed)
        {
            return Err(ValidationError::invalid_operation(
                "severity applies only to the 'failed' event type",
            ));
        }
        Ok(self.request)
    }
}
