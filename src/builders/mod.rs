//! Builders for constructing Mailgun requests.
//!
//! Builders validate each field as it is set and fail at the offending call.
//! None of them lock internally; a builder is driven by one caller.
//!
//! # Builders
//!
//! - [`MessageBuilder`] - Outbound messages with size and recipient budgets
//! - [`EventRequestBuilder`] - Event log filters
//! - [`StatsRequestBuilder`] - Aggregate statistics filters
//!
//! Routes, webhooks, and the other request types validate through their own
//! setters in [`crate::types`].
//!
//! # Examples
//!
//! ## Sending a simple message
//!
//! ```rust
//! use integrations_mailgun::builders::MessageBuilder;
//! use integrations_mailgun::types::{FormPayload, Recipient};
//!
//! let mut builder = MessageBuilder::new();
//! builder
//!     .from("sender@example.com")?
//!     .add_recipient(Recipient::new("recipient@example.com")?)?
//!     .subject("Hello World")?
//!     .text("This is a plain text email")?
//!     .html("<p>This is an HTML email</p>")?;
//!
//! let form = builder.build().to_form_content()?;
//! assert_eq!(form.get("subject"), Some("Hello World"));
//! # Ok::<(), integrations_mailgun::error::ValidationError>(())
//! ```
//!
//! ## Querying failed deliveries
//!
//! ```rust
//! use integrations_mailgun::builders::EventRequestBuilder;
//! use integrations_mailgun::types::{EventType, Severity};
//!
//! let mut builder = EventRequestBuilder::new();
//! builder
//!     .add_event_type(EventType::Failed)
//!     .severity(Severity::Permanent);
//!
//! let query = builder.build()?.to_query_string()?;
//! assert_eq!(query, "limit=100&event=failed&severity=permanent");
//! # Ok::<(), integrations_mailgun::error::ValidationError>(())
//! ```

mod event_builder;
mod message_builder;
mod stats_builder;

pub use event_builder::EventRequestBuilder;
pub use message_builder::MessageBuilder;
pub use stats_builder::StatsRequestBuilder;
