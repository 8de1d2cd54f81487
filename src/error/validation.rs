//! Validation errors raised by request builders and value objects.

use thiserror::Error;

/// Error raised synchronously when a request field or builder operation
/// violates a constraint.
///
/// Every builder mutation and value-object constructor validates eagerly and
/// returns this error at the point of the offending call. None of these are
/// transient: they describe input that the caller must fix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required value is absent, empty, or whitespace-only.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A numeric, size, count, or time constraint is violated.
    #[error("Value out of range for '{field}': {message}")]
    OutOfRange {
        /// The name of the offending field.
        field: String,
        /// Description of the violated bound.
        message: String,
    },

    /// A value failed structural parsing (email address, IPv4 literal,
    /// hostname, URL).
    #[error("Malformed value for '{field}': {message}")]
    Malformed {
        /// The name of the offending field.
        field: String,
        /// Description of the parse failure.
        message: String,
    },

    /// The operation is not permitted in the builder's current state.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of the state violation.
        message: String,
    },
}

impl ValidationError {
    /// Create a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new out-of-range error.
    pub fn out_of_range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new malformed input error.
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns the name of the field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::OutOfRange { field, .. }
            | Self::Malformed { field, .. } => Some(field.as_str()),
            Self::InvalidOperation { .. } => None,
        }
    }
}

/// Reject blank strings with [`ValidationError::MissingField`].
pub(crate) fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if crate::types::is_blank(value) {
        Err(ValidationError::missing_field(field))
    } else {
        Ok(())
    }
}
