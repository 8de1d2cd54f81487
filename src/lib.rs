//! Mailgun Integration Module
//!
//! Typed request builders and a thin async client for the Mailgun
//! transactional email API.
//!
//! # Features
//!
//! - **Validated Builders**: messages, event and stats queries, routes,
//!   webhooks, domains, credentials, suppressions, and mailing lists reject
//!   bad input at the call that supplies it
//! - **Message Budgets**: a running 25 MB size budget and a 1000 recipient
//!   cap, with per-recipient variables kept in step with the recipient list
//! - **Wire Rendering**: every request renders to ordered form pairs, an
//!   equivalent JSON object, or a query string
//! - **Injected Time**: delivery scheduling and default stats ranges read a
//!   [`Clock`](clock::Clock) instead of the system time
//! - **Webhook Signatures**: HMAC-SHA256 verification of inbound deliveries
//!
//! Responses are returned raw. There is no retry, rate limiting, pagination
//! traversal, or response decoding.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_mailgun::{MailgunClient, MessageBuilder};
//! use integrations_mailgun::types::Recipient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads MAILGUN_API_KEY and MAILGUN_BASE_URL
//!     let client = MailgunClient::from_env()?;
//!
//!     let mut message = MessageBuilder::new();
//!     message
//!         .from("Excited User <mailgun@mg.example.com>")?
//!         .add_recipient(Recipient::new("bob@example.com")?)?
//!         .subject("Hello from Mailgun")?
//!         .text("This is a test email.")?;
//!
//!     let response = client.send_message("mg.example.com", &message.build()).await?;
//!     println!("Status: {}", response.status());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rendering Without Sending
//!
//! ```rust
//! use integrations_mailgun::types::{FormPayload, Route};
//!
//! let mut route = Route::new();
//! route
//!     .priority(1)?
//!     .match_header("subject", ".*invoice.*")?
//!     .forward("billing@example.com")?
//!     .stop();
//!
//! let form = route.to_form_content()?;
//! assert_eq!(form.keys(), vec!["priority", "expression", "action", "action"]);
//! # Ok::<(), integrations_mailgun::error::ValidationError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// Module declarations
pub mod builders;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

// Re-export main client types
pub use client::MailgunClient;

// Re-export configuration types
pub use config::{ConfigError, MailgunConfig, MailgunConfigBuilder};

// Re-export error types
pub use error::{MailgunError, MailgunResult, ValidationError};

// Re-export HTTP types
pub use http::{HttpClient, HttpMethod, MailgunHttpClient, MailgunRequest, RequestBody};

// Re-export time sources
pub use clock::{Clock, FixedClock, SystemClock};

// Re-export builder types
pub use builders::{EventRequestBuilder, MessageBuilder, StatsRequestBuilder};

// Re-export common request types
pub use types::{
    // Payload rendering
    FormContent,
    FormPayload,
    QueryStringBuilder,
    // Messages
    EmailAddress,
    FileAttachment,
    Message,
    Recipient,
    // Queries
    EventRequest,
    ListingRequest,
    StatsRequest,
    // Account resources
    BounceRequest,
    ComplaintRequest,
    DomainCredentialRequest,
    DomainRequest,
    MailingList,
    Member,
    Route,
    UnsubscriberRequest,
    Webhook,
    WebhookSignature,
};

/// Create a new Mailgun client from environment variables.
///
/// # Errors
///
/// Returns `MailgunError::Configuration` if `MAILGUN_API_KEY` is missing or
/// the base URL is invalid.
///
/// # Example
///
/// ```rust,no_run
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = integrations_mailgun::create_client_from_env()?;
/// # Ok(())
/// # }
/// ```
pub fn create_client_from_env() -> MailgunResult<MailgunClient> {
    MailgunClient::from_env()
}

/// Create a new Mailgun client with explicit configuration.
///
/// # Example
///
/// ```rust,no_run
/// use integrations_mailgun::MailgunConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MailgunConfig::builder().api_key("key-example").eu().build()?;
/// let client = integrations_mailgun::create_client(config)?;
/// # Ok(())
/// # }
/// ```
pub fn create_client(config: MailgunConfig) -> MailgunResult<MailgunClient> {
    MailgunClient::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        let _ = std::any::type_name::<MailgunError>();
        let _ = std::any::type_name::<MailgunConfig>();
        let _ = std::any::type_name::<MessageBuilder>();
        let _ = std::any::type_name::<WebhookSignature>();
        let _ = std::any::type_name::<FixedClock>();
    }

    #[test]
    fn test_create_client() {
        let config = MailgunConfig::builder().api_key("key-test").build().unwrap();
        let client = create_client(config).unwrap();
        assert_eq!(client.base_url(), config::DEFAULT_BASE_URL);
    }
}
