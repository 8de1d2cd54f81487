//! Reqwest-backed HTTP client.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use secrecy::ExposeSecret;

use super::{HttpClient, MailgunRequest, RequestBody};
use crate::config::MailgunConfig;
use crate::error::{MailgunError, MailgunResult};
use crate::types::{AttachmentSource, FileAttachment, FormContent};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("integrations-mailgun/", env!("CARGO_PKG_VERSION"));

/// HTTP client that authenticates with the configured API key.
///
/// Requests are sent once; the response is returned whatever its status.
#[derive(Debug, Clone)]
pub struct MailgunHttpClient {
    client: Client,
    config: MailgunConfig,
}

impl MailgunHttpClient {
    /// Create a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns `MailgunError::Transport` if the underlying client cannot be
    /// built.
    pub fn new(config: MailgunConfig) -> MailgunResult<Self> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| MailgunError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &MailgunConfig {
        &self.config
    }

    fn authorization(&self) -> MailgunResult<HeaderValue> {
        let credentials = format!("api:{}", self.config.api_key.expose_secret());
        let mut value = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(credentials)))
            .map_err(|e| MailgunError::Configuration {
                message: format!("API key cannot be sent as a header: {}", e),
                source: Some(Box::new(e)),
            })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

async fn read_attachment(attachment: FileAttachment) -> MailgunResult<Part> {
    let content_type = attachment.content_type();
    let filename = attachment.filename().to_string();
    let bytes = match attachment.source() {
        AttachmentSource::Bytes(bytes) => bytes.clone(),
        AttachmentSource::File { path, .. } => {
            tokio::fs::read(path)
                .await
                .map_err(|source| MailgunError::Attachment {
                    path: path.clone(),
                    source,
                })?
        }
    };

    Ok(Part::bytes(bytes)
        .file_name(filename)
        .mime_str(content_type.as_ref())?)
}

async fn multipart_form(
    form: FormContent,
    attachments: Vec<FileAttachment>,
    inline: Vec<FileAttachment>,
) -> MailgunResult<Form> {
    let mut multipart = Form::new();
    for (key, value) in form.into_pairs() {
        multipart = multipart.text(key, value);
    }
    for attachment in attachments {
        multipart = multipart.part("attachment", read_attachment(attachment).await?);
    }
    for image in inline {
        multipart = multipart.part("inline", read_attachment(image).await?);
    }
    Ok(multipart)
}

#[async_trait]
impl HttpClient for MailgunHttpClient {
    async fn send_request(&self, request: MailgunRequest) -> MailgunResult<Response> {
        let url = request.url(&self.config.base_url);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = request.method().as_str(),
            path = request.path(),
            body = request.body().kind(),
            "Sending Mailgun request"
        );

        let builder = self
            .client
            .request(request.method().into(), url)
            .header(AUTHORIZATION, self.authorization()?);

        let builder = match request.into_body() {
            RequestBody::Empty => builder,
            RequestBody::Form(form) => builder.form(&form.into_pairs()),
            RequestBody::Json(json) => builder.json(&json),
            RequestBody::Multipart {
                form,
                attachments,
                inline,
            } => builder.multipart(multipart_form(form, attachments, inline).await?),
        };

        let response = builder.send().await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(status = response.status().as_u16(), "Mailgun response received");

        Ok(response)
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
