use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Tracker activity counters
#[derive(Debug, Default)]
pub struct TrackerMetrics {
    pub steps_submitted: AtomicU64,
    pub drafts_rejected: AtomicU64,
    pub steps_verified: AtomicU64,
    pub certifications_issued: AtomicU64,
    pub image_verifications: AtomicU64,
}

impl TrackerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submission(&self) {
        self.steps_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_draft(&self) {
        self.drafts_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verification(&self) {
        self.steps_verified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_certification(&self) {
        self.certifications_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_image_verification(&self) {
        self.image_verifications.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> TrackerStats {
        TrackerStats {
            steps_submitted: self.steps_submitted.load(Ordering::Relaxed),
            drafts_rejected: self.drafts_rejected.load(Ordering::Relaxed),
            steps_verified: self.steps_verified.load(Ordering::Relaxed),
            certifications_issued: self.certifications_issued.load(Ordering::Relaxed),
            image_verifications: self.image_verifications.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            steps_submitted = stats.steps_submitted,
            drafts_rejected = stats.drafts_rejected,
            steps_verified = stats.steps_verified,
            certifications_issued = stats.certifications_issued,
            image_verifications = stats.image_verifications,
            "Tracker metrics"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub steps_submitted: u64,
    pub drafts_rejected: u64,
    pub steps_verified: u64,
    pub certifications_issued: u64,
    pub image_verifications: u64,
}

/// Global metrics instance
static TRACKER_METRICS: std::sync::LazyLock<TrackerMetrics> =
    std::sync::LazyLock::new(TrackerMetrics::new);

pub fn tracker_metrics() -> &'static TrackerMetrics {
    &TRACKER_METRICS
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
