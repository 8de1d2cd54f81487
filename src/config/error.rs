//! Errors raised while building a [`MailgunConfig`](super::MailgunConfig).

use std::env::VarError;
use thiserror::Error;

/// Why a Mailgun configuration could not be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No API key was given, or it was blank.
    #[error("Mailgun API key is missing or blank")]
    MissingApiKey,

    /// The base URL is not an absolute `http`/`https` URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An environment variable could not be read.
    #[error("Cannot read {variable}: {source}")]
    Environment {
        /// The variable name.
        variable: &'static str,
        /// The lookup failure.
        #[source]
        source: VarError,
    },
}
