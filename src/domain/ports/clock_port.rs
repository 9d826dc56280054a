//! Clock port definition.

use chrono::{DateTime, Utc};

/// Source of the current time for interval gating.
pub trait ClockPort: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    /// Manually advanced clock for testing.
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Creates clock frozen at a fixed instant.
        pub fn new() -> Self {
            Self::at(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
        }

        /// Creates clock frozen at `now`.
        pub fn at(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Moves the clock forward.
        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock();
            *now += chrono::Duration::from_std(by).unwrap();
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ClockPort for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }
}
