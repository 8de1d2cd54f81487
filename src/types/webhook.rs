//! Webhook registration and inbound signature verification.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use url::Url;

use super::{FormContent, FormPayload, WebhookType};
use crate::error::{require, ValidationError};

/// Maximum number of URLs per webhook.
pub const MAX_WEBHOOK_URLS: usize = 3;

/// A webhook for `POST /domains/{domain}/webhooks`.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::types::{FormPayload, Webhook, WebhookType};
///
/// let mut webhook = Webhook::new();
/// webhook
///     .set_type(WebhookType::Unsubscribed)
///     .append_url("https://example.com/hooks/unsubscribed")?;
///
/// let form = webhook.to_form_content()?;
/// assert_eq!(form.get("id"), Some("unsubscribed"));
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Webhook {
    webhook_type: Option<WebhookType>,
    urls: Vec<String>,
}

impl Webhook {
    /// Create an empty webhook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the event the webhook fires for.
    pub fn set_type(&mut self, webhook_type: WebhookType) -> &mut Self {
        self.webhook_type = Some(webhook_type);
        self
    }

    /// Add a delivery URL.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidOperation`] if three URLs are present.
    /// - [`ValidationError::MissingField`] if `url` is blank.
    /// - [`ValidationError::Malformed`] if `url` does not parse.
    pub fn append_url(&mut self, url: &str) -> Result<&mut Self, ValidationError> {
        if self.urls.len() >= MAX_WEBHOOK_URLS {
            return Err(ValidationError::invalid_operation(format!(
                "a webhook accepts at most {} urls",
                MAX_WEBHOOK_URLS
            )));
        }
        require("url", url)?;
        let url = url.trim();
        Url::parse(url)
            .map_err(|e| ValidationError::malformed("url", format!("'{}': {}", url, e)))?;
        self.urls.push(url.to_string());
        Ok(self)
    }

    /// The webhook type, if set.
    pub fn webhook_type(&self) -> Option<WebhookType> {
        self.webhook_type
    }

    /// Delivery URLs in insertion order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

impl FormPayload for Webhook {
    fn to_form_content(&self) -> Result<FormContent, ValidationError> {
        let webhook_type = self
            .webhook_type
            .ok_or_else(|| ValidationError::invalid_operation("webhook type is not set"))?;
        if self.urls.is_empty() {
            return Err(ValidationError::invalid_operation("webhook has no urls"));
        }

        let mut form = FormContent::new();
        form.push("id", webhook_type.as_str());
        for url in &self.urls {
            form.push("url", url.as_str());
        }
        Ok(form)
    }
}

/// The `signature` object Mailgun includes in every webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSignature {
    /// Seconds since the epoch, as sent.
    pub timestamp: String,
    /// Random 50-character token.
    pub token: String,
    /// Hex HMAC-SHA256 of `timestamp + token`.
    pub signature: String,
}

impl WebhookSignature {
    /// Check the signature against the account's webhook signing key.
    ///
    /// Returns false for a signature that is not valid hex.
    pub fn verify(&self, signing_key: &SecretString) -> bool {
        let expected = match hex::decode(&self.signature) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let mut mac = match Hmac::<Sha256>::new_from_slice(signing_key.expose_secret().as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(self.timestamp.as_bytes());
        mac.update(self.token.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sign(key: &str, timestamp: &str, token: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_fourth_url_rejected() {
        let mut webhook = Webhook::new();
        for i in 0..3 {
            webhook
                .append_url(&format!("https://example.com/hook/{}", i))
                .unwrap();
        }
        assert!(matches!(
            webhook.append_url("https://example.com/hook/3"),
            Err(ValidationError::InvalidOperation { .. })
        ));
        assert_eq!(webhook.urls().len(), 3);
    }

    #[test]
    fn test_render_requires_type_and_url() {
        let mut webhook = Webhook::new();
        assert!(matches!(
            webhook.to_form_content(),
            Err(ValidationError::InvalidOperation { .. })
        ));

        webhook.set_type(WebhookType::Delivered);
        assert!(matches!(
            webhook.to_form_content(),
            Err(ValidationError::InvalidOperation { .. })
        ));

        let mut webhook = Webhook::new();
        webhook.append_url("https://example.com/hook").unwrap();
        assert!(matches!(
            webhook.to_form_content(),
            Err(ValidationError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_unsubscribed_form_and_json() {
        let mut webhook = Webhook::new();
        webhook
            .set_type(WebhookType::Unsubscribed)
            .append_url("https://example.com/hook")
            .unwrap();

        let form = webhook.to_form_content().unwrap();
        assert_eq!(form.get_all("id"), vec!["unsubscribed"]);
        assert_eq!(form.get_all("url"), vec!["https://example.com/hook"]);
        assert_eq!(
            webhook.to_json().unwrap(),
            json!({"id": "unsubscribed", "url": "https://example.com/hook"})
        );
    }

    #[test]
    fn test_url_sent_as_given() {
        let mut webhook = Webhook::new();
        webhook
            .set_type(WebhookType::Opened)
            .append_url(" https://example.com ")
            .unwrap();

        assert_eq!(webhook.urls(), &["https://example.com".to_string()]);
        let form = webhook.to_form_content().unwrap();
        assert_eq!(form.get("url"), Some("https://example.com"));
    }

    #[test]
    fn test_invalid_urls() {
        let mut webhook = Webhook::new();
        assert!(matches!(
            webhook.append_url("  "),
            Err(ValidationError::MissingField { .. })
        ));
        assert!(matches!(
            webhook.append_url("not a url"),
            Err(ValidationError::Malformed { .. })
        ));
        assert!(webhook.urls().is_empty());
    }

    #[test]
    fn test_signature_verification() {
        let key = "key-3ax6xnjp29jd6fds4gc373sgvjxteol0";
        let timestamp = "1529006854";
        let token = "a8ce0edb2dd8301dee6c2405235584e45aa91d1e9f979f3de0";
        let signature = WebhookSignature {
            timestamp: timestamp.to_string(),
            token: token.to_string(),
            signature: sign(key, timestamp, token),
        };

        assert!(signature.verify(&SecretString::new(key.to_string())));
        assert!(!signature.verify(&SecretString::new("other-key".to_string())));

        let tampered = WebhookSignature {
            token: "tampered".to_string(),
            ..signature.clone()
        };
        assert!(!tampered.verify(&SecretString::new(key.to_string())));

        let not_hex = WebhookSignature {
            signature: "zz".to_string(),
            ..signature
        };
        assert!(!not_hex.verify(&SecretString::new(key.to_string())));
    }
}
