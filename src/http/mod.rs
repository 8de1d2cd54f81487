//! HTTP module for Mailgun API communication.
//!
//! A thin layer between rendered request payloads and the network:
//!
//! - **Request**: method, path, optional query string, and a body that is
//!   empty, form-encoded, JSON, or multipart
//! - **HTTP Client**: basic authentication with the API key, timeouts, user
//!   agent, and file attachment reads at send time
//!
//! There is no retry, rate limiting, or response decoding. The raw
//! [`reqwest::Response`] is handed back to the caller.
//!
//! # Examples
//!
//! ```rust,no_run
//! use integrations_mailgun::config::MailgunConfig;
//! use integrations_mailgun::http::{HttpClient, MailgunHttpClient, MailgunRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MailgunConfig::builder().api_key("key-example").build()?;
//! let client = MailgunHttpClient::new(config)?;
//!
//! let response = client
//!     .send_request(MailgunRequest::get("/domains").with_query("limit=10"))
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

mod client;
mod request;

pub use client::{MailgunHttpClient, DEFAULT_USER_AGENT};
pub use request::{HttpMethod, MailgunRequest, RequestBody};

use async_trait::async_trait;
use reqwest::Response;

use crate::error::MailgunResult;

/// Trait for HTTP clients that can send Mailgun requests.
///
/// This trait abstracts the HTTP client implementation, allowing for different
/// backends or mock implementations for testing.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request and return the response as received.
    ///
    /// # Errors
    ///
    /// Returns an error if an attachment file cannot be read, the request
    /// cannot be built, or the network call fails. Non-2xx statuses are not
    /// errors.
    async fn send_request(&self, request: MailgunRequest) -> MailgunResult<Response>;

    /// The API base URL requests are sent to.
    fn base_url(&self) -> &str;
}
