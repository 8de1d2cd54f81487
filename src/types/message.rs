//! The outbound message aggregate.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::{to_yes_no, ClickTracking, EmailAddress, FileAttachment, FormContent, FormPayload, Recipient};
use crate::error::ValidationError;

/// Maximum number of `to` recipients in one message.
pub const MAX_RECIPIENTS: usize = 1000;

/// Cumulative byte budget for body parts and attachments.
pub const MAX_MESSAGE_SIZE: u64 = 25_000_000;

/// A message ready to be sent through `/{domain}/messages`.
///
/// Normally assembled with [`MessageBuilder`](crate::builders::MessageBuilder),
/// which enforces every constraint as parts are added. Fields stay public;
/// [`FormPayload::to_form_content`] re-checks the sender, recipient cap, and
/// recipient-variable parity so a message mutated after building cannot be
/// rendered in an invalid state.
///
/// Attachments and inline images are not part of the form content; the
/// transport sends them as separate multipart entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    /// Sender.
    pub from: Option<EmailAddress>,
    /// `to` recipients, in insertion order.
    pub to: Vec<Recipient>,
    /// Carbon-copy addresses.
    pub cc: Vec<EmailAddress>,
    /// Blind carbon-copy addresses.
    pub bcc: Vec<EmailAddress>,
    /// Subject line.
    pub subject: Option<String>,
    /// Plain text body.
    pub text: Option<String>,
    /// HTML body.
    pub html: Option<String>,
    /// Regular attachments.
    pub attachments: Vec<FileAttachment>,
    /// Inline images, referenced from HTML as `cid:<filename>`.
    pub inline: Vec<FileAttachment>,
    /// Tags, without duplicates.
    pub tags: Vec<String>,
    /// Per-recipient template variables keyed by bare address.
    pub recipient_variables: Map<String, Value>,
    /// Custom MIME headers, sent as `h:<name>`.
    pub custom_headers: BTreeMap<String, String>,
    /// Custom JSON data, sent as `v:<name>`.
    pub custom_data: BTreeMap<String, Value>,
    /// `o:testmode`.
    pub test_mode: Option<bool>,
    /// `o:tracking`.
    pub tracking: Option<bool>,
    /// `o:tracking-clicks`.
    pub tracking_clicks: Option<ClickTracking>,
    /// `o:tracking-opens`.
    pub tracking_opens: Option<bool>,
    /// `o:require-tls`.
    pub require_tls: Option<bool>,
    /// `o:skip-verification`.
    pub skip_verification: Option<bool>,
    /// `o:dkim`.
    pub dkim: Option<bool>,
    /// Scheduled delivery instant.
    pub delivery_time: Option<DateTime<Utc>>,
}

impl Message {
    /// Check the invariants that can be broken by direct field mutation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.from.is_none() {
            return Err(ValidationError::missing_field("from"));
        }
        if self.to.is_empty() {
            return Err(ValidationError::missing_field("to"));
        }
        if self.to.len() > MAX_RECIPIENTS {
            return Err(ValidationError::out_of_range(
                "to",
                format!("at most {} recipients are allowed", MAX_RECIPIENTS),
            ));
        }
        if !self.recipient_variables.is_empty() && self.recipient_variables.len() != self.to.len() {
            return Err(ValidationError::out_of_range(
                "recipient-variables",
                format!(
                    "{} recipient variable entries for {} recipients",
                    self.recipient_variables.len(),
                    self.to.len()
                ),
            ));
        }
        Ok(())
    }

    /// Total number of addresses across `to`, `cc`, and `bcc`.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// Returns true if any attachment or inline image is present.
    pub fn has_files(&self) -> bool {
        !self.attachments.is_empty() || !self.inline.is_empty()
    }
}

fn join_addresses<'a>(addresses: impl Iterator<Item = &'a EmailAddress>) -> String {
    addresses
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl FormPayload for Message {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        self.validate()?;

        let mut form = FormContent::new();
        form.push_opt("from", self.from.as_ref().map(ToString::to_string));

        form.push_opt("o:testmode", self.test_mode.map(to_yes_no));
        form.push_opt("o:tracking", self.tracking.map(to_yes_no));
        form.push_opt("o:tracking-clicks", self.tracking_clicks.map(|c| c.as_str()));
        form.push_opt("o:tracking-opens", self.tracking_opens.map(to_yes_no));
        form.push_opt("o:require-tls", self.require_tls.map(to_yes_no));
        form.push_opt("o:skip-verification", self.skip_verification.map(to_yes_no));
        form.push_opt("o:dkim", self.dkim.map(to_yes_no));

        form.push("to", join_addresses(self.to.iter().map(Recipient::address)));
        if !self.cc.is_empty() {
            form.push("cc", join_addresses(self.cc.iter()));
        }
        if !self.bcc.is_empty() {
            form.push("bcc", join_addresses(self.bcc.iter()));
        }

        form.push_opt("subject", self.subject.as_deref());
        form.push_opt("html", self.html.as_deref());
        form.push_opt("text", self.text.as_deref());

        if !self.recipient_variables.is_empty() {
            form.push(
                "recipient-variables",
                Value::Object(self.recipient_variables.clone()).to_string(),
            );
        }

        for tag in &self.tags {
            form.push("o:tag", tag.as_str());
        }
        for (name, value) in &self.custom_headers {
            form.push(format!("h:{}", name), value.as_str());
        }
        for (name, value) in &self.custom_data {
            form.push(format!("v:{}", name), value.to_string());
        }

        form.push_opt(
            "o:deliverytime",
            self.delivery_time.map(|at| at.timestamp().to_string()),
        );

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn minimal() -> Message {
        Message {
            from: Some(EmailAddress::parse("sender@example.com").unwrap()),
            to: vec![Recipient::new("to@example.com").unwrap()],
            ..Message::default()
        }
    }

    #[test]
    fn test_minimal_form_content() {
        let form = minimal().to_form_content().unwrap();
        assert_eq!(form.keys(), vec!["from", "to"]);
        assert_eq!(form.get("from"), Some("sender@example.com"));
        assert_eq!(form.get("to"), Some("to@example.com"));
    }

    #[test]
    fn test_full_form_content_order() {
        let mut message = minimal();
        message.to.push(Recipient::new("Bob <bob@example.com>").unwrap());
        message.cc.push(EmailAddress::parse("cc@example.com").unwrap());
        message.bcc.push(EmailAddress::parse("bcc@example.com").unwrap());
        message.subject = Some("Hello".to_string());
        message.text = Some("text body".to_string());
        message.html = Some("<p>html body</p>".to_string());
        message.tags = vec!["welcome".to_string(), "onboarding".to_string()];
        message.custom_headers.insert("Reply-To".to_string(), "help@example.com".to_string());
        message.custom_data.insert("account".to_string(), json!({"id": 42}));
        message.test_mode = Some(true);
        message.tracking = Some(false);
        message.tracking_clicks = Some(ClickTracking::HtmlOnly);
        message.tracking_opens = Some(true);
        message.require_tls = Some(true);
        message.skip_verification = Some(false);
        message.dkim = Some(true);
        message.delivery_time = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());

        let form = message.to_form_content().unwrap();
        assert_eq!(
            form.keys(),
            vec![
                "from",
                "o:testmode",
                "o:tracking",
                "o:tracking-clicks",
                "o:tracking-opens",
                "o:require-tls",
                "o:skip-verification",
                "o:dkim",
                "to",
                "cc",
                "bcc",
                "subject",
                "html",
                "text",
                "o:tag",
                "o:tag",
                "h:Reply-To",
                "v:account",
                "o:deliverytime",
            ]
        );
        assert_eq!(form.get("to"), Some("to@example.com,Bob <bob@example.com>"));
        assert_eq!(form.get("o:tracking-clicks"), Some("htmlonly"));
        assert_eq!(form.get("o:tracking"), Some("no"));
        assert_eq!(form.get("v:account"), Some(r#"{"id":42}"#));
        assert_eq!(form.get("o:deliverytime"), Some("1714564800"));
    }

    #[test]
    fn test_recipient_variables_blob() {
        let mut message = minimal();
        message
            .recipient_variables
            .insert("to@example.com".to_string(), json!({"name": "To"}));

        let form = message.to_form_content().unwrap();
        let blob: Value = serde_json::from_str(form.get("recipient-variables").unwrap()).unwrap();
        assert_eq!(blob, json!({"to@example.com": {"name": "To"}}));
    }

    #[test]
    fn test_missing_from_after_mutation() {
        let mut message = minimal();
        message.from = None;
        assert_eq!(
            message.to_form_content().unwrap_err(),
            ValidationError::missing_field("from")
        );
    }

    #[test]
    fn test_missing_recipients_after_mutation() {
        let mut message = minimal();
        message.to.clear();
        assert_eq!(
            message.to_form_content().unwrap_err(),
            ValidationError::missing_field("to")
        );
    }

    #[test]
    fn test_parity_violation_after_mutation() {
        let mut message = minimal();
        message
            .recipient_variables
            .insert("to@example.com".to_string(), json!({}));
        message.to.push(Recipient::new("second@example.com").unwrap());

        assert!(matches!(
            message.to_form_content(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_json_matches_form_content() {
        let mut message = minimal();
        message.tags = vec!["a".to_string(), "b".to_string()];
        message.subject = Some("Subject".to_string());

        let json = message.to_json().unwrap();
        assert_eq!(json["from"], "sender@example.com");
        assert_eq!(json["subject"], "Subject");
        assert_eq!(json["o:tag"], json!(["a", "b"]));
    }

    #[test]
    fn test_recipient_count_and_files() {
        let mut message = minimal();
        message.cc.push(EmailAddress::parse("cc@example.com").unwrap());
        assert_eq!(message.recipient_count(), 2);
        assert!(!message.has_files());

        message
            .inline
            .push(FileAttachment::from_bytes("logo.png", vec![1, 2]).unwrap());
        assert!(message.has_files());
    }
}
