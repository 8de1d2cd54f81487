//! Page size for record listings.

use super::QueryStringBuilder;
use crate::error::ValidationError;

/// Largest page the bounce, complaint, unsubscribe, and member listings
/// return.
pub const MAX_LISTING_LIMIT: u32 = 10_000;

/// Query for listing endpoints such as `GET /{domain}/bounces`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingRequest {
    limit: u32,
}

impl ListingRequest {
    /// Create a listing query with the given page size.
    ///
    /// # Errors
    ///
    /// [`ValidationError::OutOfRange`] unless `1 <= limit <= 10000`.
    pub fn new(limit: u32) -> Result<Self, ValidationError> {
        if limit == 0 || limit > MAX_LISTING_LIMIT {
            return Err(ValidationError::out_of_range(
                "limit",
                format!("must be between 1 and {}", MAX_LISTING_LIMIT),
            ));
        }
        Ok(Self { limit })
    }

    /// Page size.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Render as query parameters.
    pub fn to_query(&self) -> Result<QueryStringBuilder, ValidationError> {
        let mut query = QueryStringBuilder::new();
        query.append("limit", self.limit.to_string())?;
        Ok(query)
    }

    /// Render as `limit=N`.
    pub fn to_query_string(&self) -> Result<String, ValidationError> {
        self.to_query()?.build_bare()
    }
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self { limit: 100 }
    }
}
