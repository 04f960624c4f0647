use anyhow::Result;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::observability::tracker_metrics;
use crate::tracker::ProcessingTracker;

/// Graceful shutdown for a HerbTrace session.
///
/// Verification timers cannot be cancelled, so shutdown waits for them to
/// land, up to a bound.
pub struct ShutdownCoordinator {
    drain_timeout: Duration,
    log_metrics: bool,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), true)
    }
}

impl ShutdownCoordinator {
    pub fn new(drain_timeout: Duration, log_metrics: bool) -> Self {
        Self {
            drain_timeout,
            log_metrics,
        }
    }

    /// Wait for outstanding verifications, then log final counters
    pub async fn shutdown(&self, tracker: &ProcessingTracker) -> Result<()> {
        let outstanding = tracker.pending_verifications();
        if outstanding > 0 {
            info!(outstanding, "Waiting for pending verifications...");
        }

        let drained = drain_verifications(tracker, self.drain_timeout).await;
        if let Err(e) = &drained {
            warn!("Some verifications did not finish: {}", e);
        }

        if self.log_metrics {
            tracker_metrics().log_stats();
        }

        info!("Shutdown complete");
        drained
    }
}

async fn drain_verifications(tracker: &ProcessingTracker, limit: Duration) -> Result<()> {
    timeout(limit, tracker.settle())
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "Timeout waiting for {} verification(s)",
                tracker.pending_verifications()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HerbTraceConfig;
    use crate::tracker::{FixedVerifier, Stakeholder, StepDraft, StepStatus};
    use std::sync::Arc;

    fn tracker_with_delay(delay: Duration) -> ProcessingTracker {
        ProcessingTracker::new(
            &HerbTraceConfig::default(),
            Arc::new(FixedVerifier::new(delay, 90)),
        )
    }

    fn draft() -> StepDraft {
        StepDraft::new()
            .title("Harvest")
            .stakeholder(Stakeholder::Collector)
            .description("Leaves picked at dawn")
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drains_pending_verifications() {
        let tracker = tracker_with_delay(Duration::from_secs(2));
        tracker.submit_step(draft()).unwrap();

        ShutdownCoordinator::new(Duration::from_secs(5), false)
            .shutdown(&tracker)
            .await
            .unwrap();

        assert_eq!(tracker.step(1).unwrap().status, StepStatus::Verified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_times_out_on_slow_verifications() {
        let tracker = tracker_with_delay(Duration::from_secs(60));
        tracker.submit_step(draft()).unwrap();

        let result = ShutdownCoordinator::new(Duration::from_secs(1), false)
            .shutdown(&tracker)
            .await;

        assert!(result.is_err());
        assert_eq!(tracker.step(1).unwrap().status, StepStatus::Pending);
    }
}
