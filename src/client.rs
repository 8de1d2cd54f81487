//! Mailgun client implementation.
//!
//! [`MailgunClient`] maps each request object onto its endpoint: it renders
//! the payload, picks the body encoding, and hands the request to an
//! [`HttpClient`]. Rendering fails before anything is sent if the request
//! object is invalid.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_mailgun::{MailgunClient, MessageBuilder};
//! use integrations_mailgun::types::Recipient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MailgunClient::from_env()?;
//!
//! let mut builder = MessageBuilder::new();
//! builder
//!     .from("sender@mg.example.com")?
//!     .add_recipient(Recipient::new("recipient@example.com")?)?
//!     .subject("Hello")?
//!     .text("Email body")?;
//!
//! let response = client.send_message("mg.example.com", &builder.build()).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

use reqwest::Response;
use std::sync::Arc;

use crate::config::MailgunConfig;
use crate::error::{require, MailgunResult};
use crate::http::{HttpClient, MailgunHttpClient, MailgunRequest};
use crate::types::{
    encode_component, to_json_batch, to_yes_no, BounceRequest, ComplaintRequest,
    DomainCredentialRequest, DomainRequest, EventRequest, FormContent, FormPayload,
    ListingRequest, MailingList, Member, Message, Route, StatsRequest, UnsubscriberRequest,
    Webhook,
};

/// Client for the Mailgun API.
///
/// Cloning is cheap; clones share the underlying HTTP client.
#[derive(Clone)]
pub struct MailgunClient {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for MailgunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunClient")
            .field("base_url", &self.http.base_url())
            .finish()
    }
}

fn segment(value: &str) -> String {
    encode_component(value.trim()).replace('/', "%2F")
}

impl MailgunClient {
    /// Create a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `MailgunError::Transport` if the HTTP client cannot be built.
    pub fn new(config: MailgunConfig) -> MailgunResult<Self> {
        Ok(Self::with_http_client(Arc::new(MailgunHttpClient::new(config)?)))
    }

    /// Create a client from `MAILGUN_API_KEY` and `MAILGUN_BASE_URL`.
    pub fn from_env() -> MailgunResult<Self> {
        Self::new(MailgunConfig::from_env()?)
    }

    /// Create a client over a custom [`HttpClient`].
    pub fn with_http_client(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn send(&self, request: MailgunRequest) -> MailgunResult<Response> {
        self.http.send_request(request).await
    }

    fn domain_path(domain: &str, resource: &str) -> MailgunResult<String> {
        require("domain", domain)?;
        Ok(format!("/{}/{}", segment(domain), resource))
    }

    async fn post_form(&self, path: String, payload: &impl FormPayload) -> MailgunResult<Response> {
        let form = payload.to_form_content()?;
        self.send(MailgunRequest::post(path).with_form(form)).await
    }

    async fn post_batch<T: FormPayload>(&self, path: String, items: &[T]) -> MailgunResult<Response> {
        let json = to_json_batch(items)?;
        self.send(MailgunRequest::post(path).with_json(json)).await
    }

    async fn get_query(&self, path: String, query: String) -> MailgunResult<Response> {
        self.send(MailgunRequest::get(path).with_query(query)).await
    }

    /// Send a message through `POST /{domain}/messages`.
    ///
    /// Messages with attachments or inline images go out as multipart.
    pub async fn send_message(&self, domain: &str, message: &Message) -> MailgunResult<Response> {
        let path = Self::domain_path(domain, "messages")?;
        let form = message.to_form_content()?;
        let request = if message.has_files() {
            MailgunRequest::post(path).with_multipart(
                form,
                message.attachments.clone(),
                message.inline.clone(),
            )
        } else {
            MailgunRequest::post(path).with_form(form)
        };
        self.send(request).await
    }

    /// Query the event log through `GET /{domain}/events`.
    pub async fn get_events(&self, domain: &str, request: &EventRequest) -> MailgunResult<Response> {
        let path = Self::domain_path(domain, "events")?;
        self.get_query(path, request.to_query_string()?).await
    }

    /// Query aggregate counts through `GET /{domain}/stats/total`.
    pub async fn get_stats(&self, domain: &str, request: &StatsRequest) -> MailgunResult<Response> {
        let path = Self::domain_path(domain, "stats/total")?;
        self.get_query(path, request.to_query_string()?).await
    }

    /// Create a route through `POST /routes`.
    pub async fn create_route(&self, route: &Route) -> MailgunResult<Response> {
        self.post_form("/routes".to_string(), route).await
    }

    /// Register a webhook through `POST /domains/{domain}/webhooks`.
    pub async fn create_webhook(&self, domain: &str, webhook: &Webhook) -> MailgunResult<Response> {
        require("domain", domain)?;
        self.post_form(format!("/domains/{}/webhooks", segment(domain)), webhook)
            .await
    }

    /// Create a sending domain through `POST /domains`.
    pub async fn create_domain(&self, domain: &DomainRequest) -> MailgunResult<Response> {
        self.post_form("/domains".to_string(), domain).await
    }

    /// Create SMTP credentials through `POST /domains/{domain}/credentials`.
    ///
    /// The request must carry a login.
    pub async fn create_credential(
        &self,
        domain: &str,
        credential: &DomainCredentialRequest,
    ) -> MailgunResult<Response> {
        require("domain", domain)?;
        require("login", credential.login().unwrap_or_default())?;
        self.post_form(format!("/domains/{}/credentials", segment(domain)), credential)
            .await
    }

    /// Change an SMTP password through
    /// `PUT /domains/{domain}/credentials/{login}`.
    ///
    /// Only the password is sent; a login carried by `credential` is ignored.
    pub async fn update_credential_password(
        &self,
        domain: &str,
        login: &str,
        credential: &DomainCredentialRequest,
    ) -> MailgunResult<Response> {
        require("domain", domain)?;
        require("login", login)?;

        let mut form = FormContent::new();
        form.push("password", credential.password());
        let path = format!(
            "/domains/{}/credentials/{}",
            segment(domain),
            segment(login)
        );
        self.send(MailgunRequest::put(path).with_form(form)).await
    }

    /// Add one bounce through `POST /{domain}/bounces`.
    pub async fn add_bounce(&self, domain: &str, bounce: &BounceRequest) -> MailgunResult<Response> {
        self.post_form(Self::domain_path(domain, "bounces")?, bounce).await
    }

    /// Add several bounces in one JSON request.
    pub async fn add_bounces(&self, domain: &str, bounces: &[BounceRequest]) -> MailgunResult<Response> {
        self.post_batch(Self::domain_path(domain, "bounces")?, bounces).await
    }

    /// Page through bounces with `GET /{domain}/bounces`.
    pub async fn list_bounces(&self, domain: &str, listing: &ListingRequest) -> MailgunResult<Response> {
        let path = Self::domain_path(domain, "bounces")?;
        self.get_query(path, listing.to_query_string()?).await
    }

    /// Add one complaint through `POST /{domain}/complaints`.
    pub async fn add_complaint(
        &self,
        domain: &str,
        complaint: &ComplaintRequest,
    ) -> MailgunResult<Response> {
        self.post_form(Self::domain_path(domain, "complaints")?, complaint)
            .await
    }

    /// Add several complaints in one JSON request.
    pub async fn add_complaints(
        &self,
        domain: &str,
        complaints: &[ComplaintRequest],
    ) -> MailgunResult<Response> {
        self.post_batch(Self::domain_path(domain, "complaints")?, complaints)
            .await
    }

    /// Page through complaints with `GET /{domain}/complaints`.
    pub async fn list_complaints(
        &self,
        domain: &str,
        listing: &ListingRequest,
    ) -> MailgunResult<Response> {
        let path = Self::domain_path(domain, "complaints")?;
        self.get_query(path, listing.to_query_string()?).await
    }

    /// Add one unsubscribe through `POST /{domain}/unsubscribes`.
    pub async fn add_unsubscribe(
        &self,
        domain: &str,
        unsubscribe: &UnsubscriberRequest,
    ) -> MailgunResult<Response> {
        self.post_form(Self::domain_path(domain, "unsubscribes")?, unsubscribe)
            .await
    }

    /// Add several unsubscribes in one JSON request.
    pub async fn add_unsubscribes(
        &self,
        domain: &str,
        unsubscribes: &[UnsubscriberRequest],
    ) -> MailgunResult<Response> {
        self.post_batch(Self::domain_path(domain, "unsubscribes")?, unsubscribes)
            .await
    }

    /// Page through unsubscribes with `GET /{domain}/unsubscribes`.
    pub async fn list_unsubscribes(
        &self,
        domain: &str,
        listing: &ListingRequest,
    ) -> MailgunResult<Response> {
        let path = Self::domain_path(domain, "unsubscribes")?;
        self.get_query(path, listing.to_query_string()?).await
    }

    /// Create a mailing list through `POST /lists`.
    pub async fn create_mailing_list(&self, list: &MailingList) -> MailgunResult<Response> {
        self.post_form("/lists".to_string(), list).await
    }

    /// Add a member through `POST /lists/{list}/members`.
    pub async fn add_member(&self, list_address: &str, member: &Member) -> MailgunResult<Response> {
        require("list", list_address)?;
        self.post_form(format!("/lists/{}/members", segment(list_address)), member)
            .await
    }

    /// Add up to 1000 members through `POST /lists/{list}/members.json`.
    ///
    /// The members travel as a JSON array in the `members` form field.
    pub async fn add_members(
        &self,
        list_address: &str,
        members: &[Member],
        upsert: bool,
    ) -> MailgunResult<Response> {
        require("list", list_address)?;

        let mut form = FormContent::new();
        form.push("members", to_json_batch(members)?.to_string());
        form.push("upsert", to_yes_no(upsert));
        let path = format!("/lists/{}/members.json", segment(list_address));
        self.send(MailgunRequest::post(path).with_form(form)).await
    }

    /// Page through members with `GET /lists/{list}/members`.
    pub async fn list_members(
        &self,
        list_address: &str,
        listing: &ListingRequest,
    ) -> MailgunResult<Response> {
        require("list", list_address)?;
        let path = format!("/lists/{}/members", segment(list_address));
        self.get_query(path, listing.to_query_string()?).await
    }
}
