//! Primary provider availability tracking.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{AvailabilityState, ProviderStatus};
use crate::domain::ports::{ClockPort, HealthProbePort};

/// Answers "is the primary provider usable right now?" without probing on
/// every call.
///
/// The cached flag is served until `check_interval` has elapsed since the
/// last probe. Stale callers queue on a single-flight gate, so concurrent
/// renders share one probe instead of each issuing their own.
pub struct HealthTracker {
    probe: Arc<dyn HealthProbePort>,
    clock: Arc<dyn ClockPort>,
    state: RwLock<AvailabilityState>,
    probe_gate: Mutex<()>,
}

impl std::fmt::Debug for HealthTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthTracker")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl HealthTracker {
    /// Creates tracker with optimistic initial state.
    #[must_use]
    pub fn new(
        probe: Arc<dyn HealthProbePort>,
        clock: Arc<dyn ClockPort>,
        check_interval: Duration,
    ) -> Self {
        Self {
            probe,
            clock,
            state: RwLock::new(AvailabilityState::new(check_interval)),
            probe_gate: Mutex::new(()),
        }
    }

    /// Returns whether the primary provider is currently usable.
    ///
    /// Never fails: probe errors are logged and reported as `false`.
    pub async fn is_available(&self) -> bool {
        if let Some(available) = self.cached(self.clock.now()) {
            trace!(available, "Serving cached provider availability");
            return available;
        }

        let _gate = self.probe_gate.lock().await;

        // Another caller may have finished a probe while we waited.
        if let Some(available) = self.cached(self.clock.now()) {
            return available;
        }

        self.run_probe().await
    }

    /// Probes immediately, ignoring the polling interval.
    pub async fn refresh(&self) -> bool {
        let _gate = self.probe_gate.lock().await;
        self.run_probe().await
    }

    /// Returns a snapshot of the cached state without probing.
    #[must_use]
    pub fn status(&self) -> ProviderStatus {
        self.state.read().status()
    }

    fn cached(&self, now: DateTime<Utc>) -> Option<bool> {
        let state = self.state.read();
        state.is_fresh(now).then_some(state.available())
    }

    async fn run_probe(&self) -> bool {
        let available = match self.probe.probe().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "Primary image provider health check failed");
                false
            }
        };

        let now = self.clock.now();
        let (changed, failures) = {
            let mut state = self.state.write();
            let changed = state.record(available, now);
            (changed, state.consecutive_failures())
        };

        match (changed, available) {
            (true, true) => info!("Primary image provider recovered"),
            (true, false) => {
                warn!(failures, "Primary image provider unavailable, serving images from backup storage");
            }
            _ => debug!(available, failures, "Primary image provider health check complete"),
        }

        available
    }
}
