// Verification back ends for processing steps

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

use super::types::ProcessingStep;
use crate::config::TrackerConfig;

/// Produces a verification score for a submitted step.
///
/// Implementations may take as long as they like but cannot fail; every
/// submitted step is eventually verified. `requested_at` is the moment the
/// step was submitted, so delays count from submission rather than from
/// when the task first runs.
#[async_trait]
pub trait StepVerifier: Send + Sync {
    async fn verify(&self, step: &ProcessingStep, requested_at: Instant) -> u8;
}

/// Waits a flat delay, then draws a score uniformly from `[floor, floor + span)`
#[derive(Debug, Clone)]
pub struct SimulatedVerifier {
    delay: Duration,
    floor: u8,
    span: u8,
}

impl SimulatedVerifier {
    pub fn new(delay: Duration, floor: u8, span: u8) -> Self {
        let floor = floor.min(100);
        let span = span.min(100 - floor);
        Self { delay, floor, span }
    }

    pub fn from_config(tracker: &TrackerConfig) -> Self {
        Self::new(
            tracker.verification_delay(),
            tracker.score_floor,
            tracker.score_span,
        )
    }

    pub fn score_range(&self) -> std::ops::Range<u8> {
        self.floor..self.floor + self.span
    }

    fn draw_score(&self) -> u8 {
        if self.span == 0 {
            return self.floor;
        }
        rand::rng().random_range(self.score_range())
    }
}

#[async_trait]
impl StepVerifier for SimulatedVerifier {
    async fn verify(&self, step: &ProcessingStep, requested_at: Instant) -> u8 {
        tracing::debug!(
            step_id = %step.id,
            delay_ms = self.delay.as_millis() as u64,
            "Simulating AI verification"
        );
        tokio::time::sleep_until(requested_at + self.delay).await;
        self.draw_score()
    }
}

/// Deterministic verifier: fixed delay, fixed score
#[derive(Debug, Clone)]
pub struct FixedVerifier {
    pub delay: Duration,
    pub score: u8,
}

impl FixedVerifier {
    pub fn new(delay: Duration, score: u8) -> Self {
        Self {
            delay,
            score: score.min(100),
        }
    }
}

#[async_trait]
impl StepVerifier for FixedVerifier {
    async fn verify(&self, _step: &ProcessingStep, requested_at: Instant) -> u8 {
        tokio::time::sleep_until(requested_at + self.delay).await;
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_85_to_99() {
        let verifier = SimulatedVerifier::from_config(&TrackerConfig::default());
        assert_eq!(verifier.score_range(), 85..100);
        for _ in 0..500 {
            let score = verifier.draw_score();
            assert!((85..100).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn range_is_clamped_to_percentages() {
        let verifier = SimulatedVerifier::new(Duration::ZERO, 95, 40);
        assert_eq!(verifier.score_range(), 95..100);

        let degenerate = SimulatedVerifier::new(Duration::ZERO, 90, 0);
        assert_eq!(degenerate.draw_score(), 90);
    }

    #[test]
    fn fixed_verifier_returns_its_score() {
        let step = ProcessingStep {
            id: "step-1".to_string(),
            step_number: 1,
            title: "Harvest".to_string(),
            description: "Hand picked".to_string(),
            stakeholder: super::super::types::Stakeholder::Collector,
            location: String::new(),
            timestamp: chrono::Utc::now(),
            images: Vec::new(),
            ai_verified: false,
            verification_score: 0,
            notes: String::new(),
            status: super::super::types::StepStatus::Pending,
        };
        let verifier = FixedVerifier::new(Duration::ZERO, 120);
        let score = tokio_test::block_on(verifier.verify(&step, Instant::now()));
        assert_eq!(score, 100);
    }
}
