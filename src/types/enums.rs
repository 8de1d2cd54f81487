//! Enumerated option values and their Mailgun wire strings.
//!
//! Every enum maps each variant to the exact token the API expects through an
//! exhaustive `as_str`, so an unmapped value cannot exist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who may post to a mailing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Only list administrators may post.
    ReadOnly,
    /// Subscribed members may post.
    Members,
    /// Anyone may post.
    Everyone,
}

impl AccessLevel {
    /// Returns the wire string for the Mailgun API.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::ReadOnly => "readonly",
            AccessLevel::Members => "members",
            AccessLevel::Everyone => "everyone",
        }
    }
}

/// What a domain does with messages classified as spam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpamAction {
    /// Spam filtering is off.
    Disabled,
    /// Spam is rejected.
    Block,
    /// Spam is delivered with an `X-Mailgun-SFlag` header.
    Tag,
}

impl SpamAction {
    /// Returns the wire string for the Mailgun API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpamAction::Disabled => "disabled",
            SpamAction::Block => "block",
            SpamAction::Tag => "tag",
        }
    }
}

/// Event types recorded by Mailgun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Mailgun accepted the request to send or forward.
    Accepted,
    /// Mailgun rejected the request.
    Rejected,
    /// The message was delivered to the recipient's server.
    Delivered,
    /// Delivery failed, permanently or temporarily.
    Failed,
    /// The recipient opened the message.
    Opened,
    /// The recipient clicked a tracked link.
    Clicked,
    /// The recipient unsubscribed.
    Unsubscribed,
    /// The recipient marked the message as spam.
    Complained,
    /// An incoming message was stored.
    Stored,
}

impl EventType {
    /// Returns the wire string for the Mailgun API.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Accepted => "accepted",
            EventType::Rejected => "rejected",
            EventType::Delivered => "delivered",
            EventType::Failed => "failed",
            EventType::Opened => "opened",
            EventType::Clicked => "clicked",
            EventType::Unsubscribed => "unsubscribed",
            EventType::Complained => "complained",
            EventType::Stored => "stored",
        }
    }
}

/// Severity of a `failed` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A soft failure; Mailgun will retry.
    Temporary,
    /// A hard failure; Mailgun gave up.
    Permanent,
}

impl Severity {
    /// Returns the wire string for the Mailgun API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Temporary => "temporary",
            Severity::Permanent => "permanent",
        }
    }
}

/// Click tracking mode for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickTracking {
    /// Track clicks in both text and HTML parts.
    Yes,
    /// Do not track clicks.
    No,
    /// Track clicks only in the HTML part.
    HtmlOnly,
}

impl ClickTracking {
    /// Returns the wire string for the Mailgun API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickTracking::Yes => "yes",
            ClickTracking::No => "no",
            ClickTracking::HtmlOnly => "htmlonly",
        }
    }
}

/// Bucket size for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeResolution {
    /// Hourly buckets.
    Hour,
    /// Daily buckets.
    Day,
    /// Monthly buckets.
    Month,
}

impl TimeResolution {
    /// Returns the wire string for the Mailgun API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeResolution::Hour => "hour",
            TimeResolution::Day => "day",
            TimeResolution::Month => "month",
        }
    }

    /// Returns the single-letter unit used in a stats `duration` value.
    pub fn code(&self) -> char {
        match self {
            TimeResolution::Hour => 'h',
            TimeResolution::Day => 'd',
            TimeResolution::Month => 'm',
        }
    }
}

/// Event a domain webhook subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookType {
    /// Tracked link clicked.
    Clicked,
    /// Spam complaint.
    Complained,
    /// Message delivered.
    Delivered,
    /// Message opened.
    Opened,
    /// Delivery failed permanently.
    PermanentFail,
    /// Delivery failed temporarily.
    TemporaryFail,
    /// Recipient unsubscribed.
    Unsubscribed,
}

impl WebhookType {
    /// Returns the wire string for the Mailgun API.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookType::Clicked => "clicked",
            WebhookType::Complained => "complained",
            WebhookType::Delivered => "delivered",
            WebhookType::Opened => "opened",
            WebhookType::PermanentFail => "permanent_fail",
            WebhookType::TemporaryFail => "temporary_fail",
            WebhookType::Unsubscribed => "unsubscribed",
        }
    }
}

/// SMTP error code recorded with a bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmtpErrorCode {
    /// 550: mailbox unavailable.
    #[serde(rename = "550")]
    MailboxUnavailable,
    /// 551: user not local.
    #[serde(rename = "551")]
    UserNotLocal,
    /// 552: exceeded storage allocation.
    #[serde(rename = "552")]
    ExceededStorage,
    /// 553: mailbox name not allowed.
    #[serde(rename = "553")]
    MailboxNameNotAllowed,
    /// 554: transaction failed.
    #[serde(rename = "554")]
    TransactionFailed,
}

impl SmtpErrorCode {
    /// Returns the wire string for the Mailgun API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SmtpErrorCode::MailboxUnavailable => "550",
            SmtpErrorCode::UserNotLocal => "551",
            SmtpErrorCode::ExceededStorage => "552",
            SmtpErrorCode::MailboxNameNotAllowed => "553",
            SmtpErrorCode::TransactionFailed => "554",
        }
    }
}

impl Default for SmtpErrorCode {
    fn default() -> Self {
        SmtpErrorCode::MailboxUnavailable
    }
}

macro_rules! display_as_wire_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_wire_str!(
    AccessLevel,
    SpamAction,
    EventType,
    Severity,
    ClickTracking,
    TimeResolution,
    WebhookType,
    SmtpErrorCode,
);
