//! Event log query.

use chrono::{DateTime, Utc};

use super::query::disjunction;
use super::{to_yes_no, EventType, QueryStringBuilder, Severity};
use crate::error::ValidationError;

/// Largest page the events API returns.
pub const MAX_EVENT_LIMIT: u32 = 300;

/// Page size used when none is set.
pub const DEFAULT_EVENT_LIMIT: u32 = 100;

/// Filter criteria for `GET /{domain}/events`.
///
/// Assembled with [`EventRequestBuilder`](crate::builders::EventRequestBuilder).
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub(crate) limit: u32,
    pub(crate) begin: Option<DateTime<Utc>>,
    pub(crate) end: Option<DateTime<Utc>>,
    pub(crate) ascending: Option<bool>,
    pub(crate) pretty: Option<bool>,
    pub(crate) size: Option<u64>,
    pub(crate) message_id: Option<String>,
    pub(crate) recipient: Option<String>,
    pub(crate) to: Option<String>,
    pub(crate) attachment: Option<String>,
    pub(crate) from: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) event_types: Vec<EventType>,
    pub(crate) severity: Option<Severity>,
    pub(crate) tags: Vec<String>,
}

impl Default for EventRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_EVENT_LIMIT,
            begin: None,
            end: None,
            ascending: None,
            pretty: None,
            size: None,
            message_id: None,
            recipient: None,
            to: None,
            attachment: None,
            from: None,
            subject: None,
            event_types: Vec::new(),
            severity: None,
            tags: Vec::new(),
        }
    }
}

impl EventRequest {
    /// Page size.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Start of the time range.
    pub fn begin(&self) -> Option<DateTime<Utc>> {
        self.begin
    }

    /// End of the time range.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Event types to match, without duplicates.
    pub fn event_types(&self) -> &[EventType] {
        &self.event_types
    }

    /// Tags to match, without duplicates.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Severity filter for failed events.
    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    /// Render the filter as query parameters.
    ///
    /// Order: `limit`, `begin`, `end`, `ascending`, `pretty`, `size`,
    /// `message-id`, `recipient`, `to`, `attachment`, `from`, `subject`,
    /// `event`, `severity`, `tags`. Several event types or tags render as
    /// `(a or b)`.
    pub fn to_query(&self) -> Result<QueryStringBuilder, ValidationError> {
        let mut query = QueryStringBuilder::new();
        query.append("limit", self.limit.to_string())?;

        if let Some(begin) = self.begin {
            query.append("begin", begin.timestamp().to_string())?;
        }
        if let Some(end) = self.end {
            query.append("end", end.timestamp().to_string())?;
        }
        if let Some(ascending) = self.ascending {
            query.append("ascending", to_yes_no(ascending))?;
        }
        if let Some(pretty) = self.pretty {
            query.append("pretty", to_yes_no(pretty))?;
        }
        if let Some(size) = self.size {
            query.append("size", size.to_string())?;
        }

        let text_filters = [
            ("message-id", &self.message_id),
            ("recipient", &self.recipient),
            ("to", &self.to),
            ("attachment", &self.attachment),
            ("from", &self.from),
            ("subject", &self.subject),
        ];
        for (key, value) in text_filters {
            if let Some(value) = value {
                query.append(key, value)?;
            }
        }

        if let Some(events) = disjunction(self.event_types.iter().map(EventType::as_str)) {
            query.append("event", events)?;
        }
        if let Some(severity) = self.severity {
            query.append("severity", severity.as_str())?;
        }
        if let Some(tags) = disjunction(&self.tags) {
            query.append("tags", tags)?;
        }

        Ok(query)
    }

    /// Render the filter as a percent-encoded query string without the
    /// leading `?`.
    pub fn to_query_string(&self) -> Result<String, ValidationError> {
        self.to_query()?.build_bare()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_renders_limit_only() {
        let request = EventRequest::default();
        assert_eq!(request.to_query_string().unwrap(), "limit=100");
    }

    #[test]
    fn test_full_layout_order() {
        let request = EventRequest {
            limit: 50,
            begin: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()),
            ascending: Some(true),
            pretty: Some(false),
            size: Some(2048),
            message_id: Some("abc@mg.example.com".to_string()),
            recipient: Some("r@example.com".to_string()),
            to: Some("t@example.com".to_string()),
            attachment: Some("invoice.pdf".to_string()),
            from: Some("f@example.com".to_string()),
            subject: Some("Invoice".to_string()),
            event_types: vec![EventType::Failed],
            severity: Some(Severity::Permanent),
            tags: vec!["billing".to_string()],
        };

        let query = request.to_query().unwrap();
        let keys: Vec<&str> = query.pairs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "limit",
                "begin",
                "end",
                "ascending",
                "pretty",
                "size",
                "message-id",
                "recipient",
                "to",
                "attachment",
                "from",
                "subject",
                "event",
                "severity",
                "tags",
            ]
        );
        assert_eq!(query.get("begin"), Some("1704067200"));
        assert_eq!(query.get("end"), Some("1704153600"));
        assert_eq!(query.get("ascending"), Some("yes"));
        assert_eq!(query.get("pretty"), Some("no"));
        assert_eq!(query.get("event"), Some("failed"));
        assert_eq!(query.get("tags"), Some("billing"));
    }

    #[test]
    fn test_multiple_event_types_and_tags() {
        let request = EventRequest {
            event_types: vec![EventType::Clicked, EventType::Opened],
            tags: vec!["a".to_string(), "b".to_string()],
            ..EventRequest::default()
        };

        let query = request.to_query().unwrap();
        assert_eq!(query.get("event"), Some("(clicked or opened)"));
        assert_eq!(query.get("tags"), Some("(a or b)"));
        assert_eq!(
            request.to_query_string().unwrap(),
            "limit=100&event=(clicked%20or%20opened)&tags=(a%20or%20b)"
        );
    }
}
