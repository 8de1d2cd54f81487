//! Time source abstraction.
//!
//! Builders that validate against "now" (delivery-time scheduling, default
//! stats ranges) take a [`Clock`] instead of reading the system time, so
//! tests can pin the instant.

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Provides the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

/// A [`Clock`] backed by the operating system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A [`Clock`] that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock pinned to `instant`.
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// The clock used when none is injected.
pub(crate) fn system() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}
