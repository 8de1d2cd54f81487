//! Configuration for the Mailgun client.
//!
//! This module provides the client configuration and its builder:
//!
//! - API key (held as a secret)
//! - Base URL, with a shortcut for the EU region
//! - Request and connect timeouts
//! - User agent customization

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

pub mod error;

pub use error::ConfigError;

/// Base URL of the US region API.
pub const DEFAULT_BASE_URL: &str = "https://api.mailgun.net/v3";

/// Base URL of the EU region API.
pub const EU_BASE_URL: &str = "https://api.eu.mailgun.net/v3";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "MAILGUN_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "MAILGUN_BASE_URL";

/// Configuration for the Mailgun client.
#[derive(Clone)]
pub struct MailgunConfig {
    /// Private API key, sent as the basic-auth password for user `api`.
    pub api_key: SecretString,

    /// API base URL without a trailing slash.
    pub base_url: String,

    /// Timeout for the entire request.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl std::fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl MailgunConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_mailgun::config::MailgunConfig;
    ///
    /// let config = MailgunConfig::builder()
    ///     .api_key("key-example")
    ///     .eu()
    ///     .build()?;
    ///
    /// assert_eq!(config.base_url, "https://api.eu.mailgun.net/v3");
    /// # Ok::<(), integrations_mailgun::config::ConfigError>(())
    /// ```
    pub fn builder() -> MailgunConfigBuilder {
        MailgunConfigBuilder::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads `MAILGUN_API_KEY` (required) and `MAILGUN_BASE_URL` (optional).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use integrations_mailgun::config::MailgunConfig;
    ///
    /// let config = MailgunConfig::from_env()?;
    /// # Ok::<(), integrations_mailgun::config::ConfigError>(())
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let api_key = lookup(API_KEY_ENV).map_err(|source| ConfigError::Environment {
            variable: API_KEY_ENV,
            source,
        })?;

        let mut builder = Self::builder().api_key(api_key);
        match lookup(BASE_URL_ENV) {
            Ok(url) => builder = builder.base_url(url),
            Err(std::env::VarError::NotPresent) => {}
            Err(source) => {
                return Err(ConfigError::Environment {
                    variable: BASE_URL_ENV,
                    source,
                })
            }
        }
        builder.build()
    }

    /// Join `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Builder for [`MailgunConfig`].
#[derive(Default)]
pub struct MailgunConfigBuilder {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl MailgunConfigBuilder {
    /// Set the private API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    /// Set a custom base URL, e.g. for a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use the EU region API.
    pub fn eu(self) -> Self {
        self.base_url(EU_BASE_URL)
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` if the API key is not set or blank,
    /// and `ConfigError::InvalidBaseUrl` if the base URL does not parse as an
    /// `http`/`https` URL.
    pub fn build(self) -> Result<MailgunConfig, ConfigError> {
        use secrecy::ExposeSecret;

        let api_key = self
            .api_key
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let parsed = Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url,
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(MailgunConfig {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(10)),
            user_agent: self.user_agent,
        })
    }
}
