//! Cached availability of the primary provider.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Last known reachability of the primary provider.
///
/// Starts optimistic (`available = true`) with no check recorded, so the
/// first query always probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityState {
    available: bool,
    last_checked: Option<DateTime<Utc>>,
    check_interval: Duration,
    consecutive_failures: u32,
}

impl AvailabilityState {
    /// Creates optimistic state with the given polling interval.
    #[must_use]
    pub const fn new(check_interval: Duration) -> Self {
        Self {
            available: true,
            last_checked: None,
            check_interval,
            consecutive_failures: 0,
        }
    }

    /// Returns the cached flag.
    #[must_use]
    pub const fn available(&self) -> bool {
        self.available
    }

    /// Returns when the flag was last refreshed.
    #[must_use]
    pub const fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    /// Returns the polling interval.
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Returns the number of failed probes in a row.
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Returns whether the cached flag may be served at `now`.
    ///
    /// A clock that moved backwards counts as fresh; the next forward tick
    /// past the interval triggers a probe.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let Some(last_checked) = self.last_checked else {
            return false;
        };

        match (now - last_checked).to_std() {
            Ok(elapsed) => elapsed < self.check_interval,
            Err(_) => true,
        }
    }

    /// Records a probe outcome. Returns `true` if availability flipped.
    pub fn record(&mut self, available: bool, now: DateTime<Utc>) -> bool {
        let changed = self.available != available;

        self.available = available;
        self.last_checked = Some(now);
        self.consecutive_failures = if available {
            0
        } else {
            self.consecutive_failures.saturating_add(1)
        };

        changed
    }

    /// Returns a serializable snapshot.
    #[must_use]
    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            available: self.available,
            last_checked: self.last_checked,
            consecutive_failures: self.consecutive_failures,
            check_interval_ms: u64::try_from(self.check_interval.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Point-in-time view of [`AvailabilityState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    /// Last known reachability.
    pub available: bool,
    /// When the flag was last refreshed, if ever.
    pub last_checked: Option<DateTime<Utc>>,
    /// Failed probes in a row.
    pub consecutive_failures: u32,
    /// Polling interval in milliseconds.
    pub check_interval_ms: u64,
}
