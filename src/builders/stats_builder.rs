//! Builder for aggregate statistics queries.

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::error::ValidationError;
use crate::types::{EventType, StatsRequest, TimeResolution};

/// Builder for [`StatsRequest`].
///
/// Starts from the default seven-day range.
///
/// # Examples
///
/// ```rust
/// use integrations_mailgun::builders::StatsRequestBuilder;
/// use integrations_mailgun::types::{EventType, TimeResolution};
///
/// let mut builder = StatsRequestBuilder::new();
/// builder
///     .add_event_type(EventType::Delivered)
///     .resolution(TimeResolution::Month)
///     .duration(3)?;
///
/// let request = builder.build()?;
/// assert_eq!(
///     request.to_query_string()?,
///     "event=delivered&resolution=month&duration=3m"
/// );
/// # Ok::<(), integrations_mailgun::error::ValidationError>(())
/// ```
#[derive(Debug, Default)]
pub struct StatsRequestBuilder {
    request: StatsRequest,
}

impl StatsRequestBuilder {
    /// Create a builder whose range ends at the system time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder whose range ends at `clock.now()`.
    pub fn with_clock(clock: &dyn Clock) -> Self {
        Self {
            request: StatsRequest::with_clock(clock),
        }
    }

    /// Set the start of the range.
    pub fn start(&mut self, start: DateTime<Utc>) -> &mut Self {
        self.request.start = start;
        self
    }

    /// Set the end of the range.
    pub fn end(&mut self, end: DateTime<Utc>) -> &mut Self {
        self.request.end = end;
        self
    }

    /// Set the bucket size.
    pub fn resolution(&mut self, resolution: TimeResolution) -> &mut Self {
        self.request.resolution = Some(resolution);
        self
    }

    /// Count back `units` of the resolution from now instead of using the
    /// explicit range.
    pub fn duration(&mut self, units: u32) -> Result<&mut Self, ValidationError> {
        if units == 0 {
            return Err(ValidationError::out_of_range("duration", "must be positive"));
        }
        self.request.duration = Some(units);
        Ok(self)
    }

    /// Add an event type to aggregate. Repeats are ignored.
    pub fn add_event_type(&mut self, event: EventType) -> &mut Self {
        if !self.request.event_types.contains(&event) {
            self.request.event_types.push(event);
        }
        self
    }

    /// Return the assembled request.
    ///
    /// # Errors
    ///
    /// [`ValidationError::OutOfRange`] if `start` is after `end`.
    pub fn build(self) -> Result<StatsRequest, ValidationError> {
        if self.request.start > self.request.end {
            return Err(ValidationError::out_of_range(
                "start",
                "must not be after end",
            ));
        }
        Ok(self.request)
    }
}
