//! Aggregate statistics query.

use chrono::{DateTime, Duration, Utc};

use super::{EventType, QueryStringBuilder, TimeResolution};
use crate::clock::{Clock, SystemClock};
use crate::error::ValidationError;

/// Days covered by a default stats range.
pub const DEFAULT_STATS_DAYS: i64 = 7;

/// Filter criteria for `GET /{domain}/stats/total`.
///
/// A default request covers the seven days ending now at day resolution.
/// When both a duration and a resolution are set, they replace the explicit
/// `start`/`end` range on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRequest {
    pub(crate) start: DateTime<Utc>,
    pub(crate) end: DateTime<Utc>,
    pub(crate) resolution: Option<TimeResolution>,
    pub(crate) duration: Option<u32>,
    pub(crate) event_types: Vec<EventType>,
}

impl StatsRequest {
    /// Create a request for the last seven days, read from the system clock.
    pub fn new() -> Self {
        Self::with_clock(&SystemClock)
    }

    /// Create a request for the seven days ending at `clock.now()`.
    pub fn with_clock(clock: &dyn Clock) -> Self {
        let end = clock.now();
        Self {
            start: end - Duration::days(DEFAULT_STATS_DAYS),
            end,
            resolution: Some(TimeResolution::Day),
            duration: None,
            event_types: Vec::new(),
        }
    }

    /// Start of the range.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the range.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Bucket size.
    pub fn resolution(&self) -> Option<TimeResolution> {
        self.resolution
    }

    /// Number of resolution units counted back from now.
    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    /// Event types to aggregate, without duplicates.
    pub fn event_types(&self) -> &[EventType] {
        &self.event_types
    }

    /// Render the filter as query parameters.
    ///
    /// One `event` entry per type comes first. Then either
    /// `resolution` and `duration` (`{N}{h|d|m}`) when both are set, or
    /// `start` and `end` as Unix seconds.
    pub fn to_query(&self) -> Result<QueryStringBuilder, ValidationError> {
        let mut query = QueryStringBuilder::new();
        for event in &self.event_types {
            query.append("event", event.as_str())?;
        }

        match (self.resolution, self.duration) {
            (Some(resolution), Some(duration)) => {
                query
                    .append("resolution", resolution.as_str())?
                    .append("duration", format!("{}{}", duration, resolution.code()))?;
            }
            _ => {
                query
                    .append("start", self.start.timestamp().to_string())?
                    .append("end", self.end.timestamp().to_string())?;
            }
        }

        Ok(query)
    }

    /// Render the filter as a percent-encoded query string without the
    /// leading `?`.
    pub fn to_query_string(&self) -> Result<String, ValidationError> {
        self.to_query()?.build_bare()
    }
}

impl Default for StatsRequest {
    fn default() -> Self {
        Self::new()
    }
}
