// Tests for the processing tracker

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::HerbTraceConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn fixed_tracker(score: u8) -> ProcessingTracker {
        let config = HerbTraceConfig::default();
        ProcessingTracker::new(
            &config,
            Arc::new(FixedVerifier::new(Duration::from_millis(2000), score)),
        )
    }

    fn draft(title: &str, stakeholder: Stakeholder) -> StepDraft {
        StepDraft::new()
            .title(title)
            .stakeholder(stakeholder)
            .description(format!("{title} performed by {stakeholder}"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_appends_pending_step_with_next_number() {
        let tracker = fixed_tracker(90);

        let first = tracker.submit_step(draft("Harvest", Stakeholder::Collector)).unwrap();
        let second = tracker
            .submit_step(draft("Washing", Stakeholder::PrimaryProcessor))
            .unwrap();

        assert_eq!(tracker.len(), 2);
        assert_eq!(first.step.step_number, 1);
        assert_eq!(second.step.step_number, 2);
        assert_eq!(first.step.status, StepStatus::Pending);
        assert!(!first.step.ai_verified);
        assert_eq!(first.step.verification_score, 0);
        assert_ne!(first.step.id, second.step.id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_stays_pending_until_delay_elapses() {
        let tracker = fixed_tracker(93);
        let submitted = tracker.submit_step(draft("Harvest", Stakeholder::Collector)).unwrap();

        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert_eq!(tracker.step(1).unwrap().status, StepStatus::Pending);
        assert_eq!(tracker.pending_verifications(), 1);

        submitted.verification.resolved().await;

        let step = tracker.step(1).unwrap();
        assert_eq!(step.status, StepStatus::Verified);
        assert!(step.ai_verified);
        assert_eq!(step.verification_score, 93);
        assert_eq!(tracker.pending_verifications(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_scores_fall_in_range() {
        let tracker = ProcessingTracker::simulated(&HerbTraceConfig::default());
        let start = tokio::time::Instant::now();

        for stakeholder in Stakeholder::ALL {
            tracker
                .submit_step(draft("Step", stakeholder))
                .unwrap();
        }
        tracker.settle().await;

        assert!(start.elapsed() >= Duration::from_millis(2000));
        for step in tracker.steps() {
            assert_eq!(step.status, StepStatus::Verified);
            assert!(
                (85..100).contains(&step.verification_score),
                "score {} out of range",
                step.verification_score
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_draft_leaves_steps_unchanged() {
        let tracker = fixed_tracker(90);
        tracker.submit_step(draft("Harvest", Stakeholder::Collector)).unwrap();

        let missing_title = StepDraft::new()
            .stakeholder(Stakeholder::Packager)
            .description("Sealed in jars");
        let missing_stakeholder = StepDraft::new().title("Packing").description("Sealed in jars");
        let missing_description = StepDraft::new()
            .title("Packing")
            .stakeholder(Stakeholder::Packager);

        for incomplete in [missing_title, missing_stakeholder, missing_description] {
            let result = tracker.submit_step(incomplete);
            assert!(matches!(result, Err(TrackerError::MissingField(_))));
        }

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.pending_verifications(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_optional_fields_default_to_empty() {
        let tracker = fixed_tracker(90);
        let submitted = tracker
            .submit_step(
                draft("Drying", Stakeholder::SecondaryProcessor)
                    .image(ImageAttachment::new("rack.jpg").with_size(2048)),
            )
            .unwrap();

        assert_eq!(submitted.step.location, "");
        assert_eq!(submitted.step.notes, "");
        assert_eq!(submitted.step.images.len(), 1);
        assert_eq!(submitted.step.images[0].size_bytes, Some(2048));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_initializes_batch_once() {
        let tracker = fixed_tracker(90);
        assert!(tracker.batch().is_none());

        let batch = tracker.enter();
        assert!(batch.id.starts_with("batch-"));
        assert_eq!(batch.total_steps, 8);
        assert_eq!(batch.herb_name, "Tulsi (Holy Basil)");
        assert_eq!(batch.qr_code, None);

        tracker.submit_step(draft("Harvest", Stakeholder::Collector)).unwrap();
        let again = tracker.enter();
        assert_eq!(again.id, batch.id);
        assert_eq!(again.current_step, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_certification_requires_five_verified_steps() {
        let tracker = fixed_tracker(90);
        tracker.enter();

        for stakeholder in Stakeholder::ALL.into_iter().take(4) {
            tracker.submit_step(draft("Step", stakeholder)).unwrap();
        }
        tracker.settle().await;

        assert!(!tracker.certification_available());
        assert_eq!(
            tracker.issue_certification(),
            Err(CertificationError::InsufficientVerifiedSteps {
                verified: 4,
                required: 5
            })
        );

        let fifth = tracker
            .submit_step(draft("Packing", Stakeholder::Packager))
            .unwrap();
        // Five submitted but only four verified: still not enough
        assert!(tracker.issue_certification().is_err());

        fifth.verification.resolved().await;
        assert!(tracker.certification_available());

        let batch_id = tracker.batch().unwrap().id;
        let code = tracker.issue_certification().unwrap();
        assert_eq!(code, format!("QR-{batch_id}"));

        let batch = tracker.batch().unwrap();
        assert_eq!(batch.qr_code.as_deref(), Some(code.as_str()));
        assert!(batch.final_verification);
    }

    #[tokio::test(start_paused = true)]
    async fn test_certification_is_idempotent() {
        let tracker = fixed_tracker(90);
        tracker.enter();
        for stakeholder in Stakeholder::ALL.into_iter().take(5) {
            tracker.submit_step(draft("Step", stakeholder)).unwrap();
        }
        tracker.settle().await;

        let first = tracker.issue_certification().unwrap();
        tracker.submit_step(draft("Retail", Stakeholder::Retailer)).unwrap();
        tracker.settle().await;
        let second = tracker.issue_certification().unwrap();

        assert_eq!(first, second);
        assert_eq!(tracker.batch().unwrap().qr_code, Some(first));
    }

    #[tokio::test(start_paused = true)]
    async fn test_certification_without_batch_fails() {
        let tracker = fixed_tracker(90);
        assert_eq!(tracker.issue_certification(), Err(CertificationError::NoBatch));
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_tracks_counts_and_coverage() {
        let tracker = fixed_tracker(90);
        tracker.enter();

        tracker.submit_step(draft("Harvest", Stakeholder::Collector)).unwrap();
        tracker.submit_step(draft("Grading", Stakeholder::QualityController)).unwrap();
        tracker.settle().await;
        tracker.submit_step(draft("Packing", Stakeholder::Packager)).unwrap();

        let summary = tracker.summary();
        assert_eq!(summary.verified, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.batch_progress_percent, 25.0);
        assert_eq!(summary.certification_progress_percent, 40.0);
        assert_eq!(summary.steps_until_certification, 3);
        assert_eq!(summary.certification_code, None);

        let covered: Vec<Stakeholder> = summary
            .stakeholder_coverage
            .iter()
            .filter(|(_, covered)| *covered)
            .map(|(role, _)| *role)
            .collect();
        assert_eq!(
            covered,
            vec![
                Stakeholder::Collector,
                Stakeholder::QualityController,
                Stakeholder::Packager
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_step_number() {
        let tracker = fixed_tracker(90);
        assert!(matches!(tracker.step(3), Err(TrackerError::StepNotFound(3))));
    }

    struct PanickingVerifier;

    #[async_trait::async_trait]
    impl StepVerifier for PanickingVerifier {
        async fn verify(&self, _step: &ProcessingStep, _requested_at: tokio::time::Instant) -> u8 {
            panic!("verifier crashed");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_verifier_does_not_block_settle() {
        let tracker = ProcessingTracker::new(&HerbTraceConfig::default(), Arc::new(PanickingVerifier));
        let submitted = tracker.submit_step(draft("Harvest", Stakeholder::Collector)).unwrap();
        assert_eq!(tracker.pending_verifications(), 1);

        submitted.verification.resolved().await;

        assert_eq!(tracker.pending_verifications(), 0);
        tokio::time::timeout(Duration::from_millis(10), tracker.settle())
            .await
            .expect("settle should return once the crashed task is gone");
        assert_eq!(tracker.step(1).unwrap().status, StepStatus::Pending);
    }
}
