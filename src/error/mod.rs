//! Error types for the Mailgun integration module.
//!
//! Two layers of errors exist:
//! - [`ValidationError`] is raised by builders and value objects when a field
//!   or state constraint is violated. It never involves I/O.
//! - [`MailgunError`] is the crate-wide error returned by the transport layer.
//!   It wraps validation failures together with configuration, transport,
//!   serialization, and attachment I/O errors.
//!
//! # Examples
//!
//! ```rust
//! use integrations_mailgun::error::{MailgunError, ValidationError};
//!
//! fn describe(error: &MailgunError) -> &'static str {
//!     match error {
//!         MailgunError::Validation(ValidationError::OutOfRange { .. }) => "out of range",
//!         MailgunError::Validation(_) => "invalid request",
//!         _ => "transport failure",
//!     }
//! }
//! ```

mod validation;

pub use validation::ValidationError;
pub(crate) use validation::require;

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Top-level error type for the Mailgun integration.
#[derive(Debug, Error)]
pub enum MailgunError {
    /// A request failed validation before it was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration-related errors.
    ///
    /// These errors occur when the client is misconfigured or when
    /// configuration values are invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transport and network errors.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request timeout errors.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },

    /// Serialization errors.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// A file-reference attachment could not be read at send time.
    #[error("Failed to read attachment {}: {source}", path.display())]
    Attachment {
        /// Path of the attachment file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl MailgunError {
    /// Returns the validation error if this error was raised before sending.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            MailgunError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for Mailgun operations.
pub type MailgunResult<T> = std::result::Result<T, MailgunError>;

impl From<serde_json::Error> for MailgunError {
    fn from(err: serde_json::Error) -> Self {
        MailgunError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for MailgunError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MailgunError::Timeout {
                message: err.to_string(),
            }
        } else {
            MailgunError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}

impl From<ConfigError> for MailgunError {
    fn from(err: ConfigError) -> Self {
        MailgunError::Configuration {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
