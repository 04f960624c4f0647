use chrono::Utc;
use statig::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

use super::lifecycle::{StepEvent, StepLifecycle};
use super::types::{
    CertificationError, HerbBatch, ProcessingStep, RequiredField, Stakeholder, StepDraft,
    StepStatus, TrackerError, TrackerSummary,
};
use super::verifier::{SimulatedVerifier, StepVerifier};
use crate::config::{BatchConfig, HerbTraceConfig, TrackerConfig};
use crate::observability::tracker_metrics;
use crate::telemetry::create_step_span;

struct TrackerState {
    steps: Vec<StateMachine<StepLifecycle>>,
    batch: Option<HerbBatch>,
}

impl TrackerState {
    fn count(&self, status: StepStatus) -> u32 {
        self.steps
            .iter()
            .filter(|sm| sm.inner().status() == status)
            .count() as u32
    }
}

/// A freshly submitted step and the handle of its pending verification
#[derive(Debug)]
pub struct SubmittedStep {
    pub step: ProcessingStep,
    pub verification: VerificationHandle,
}

/// Handle to a fire-and-forget verification task.
///
/// Dropping it does not cancel the task.
#[derive(Debug)]
pub struct VerificationHandle {
    task: JoinHandle<()>,
}

impl VerificationHandle {
    /// Wait until the verification has been applied to the tracker
    pub async fn resolved(self) {
        if let Err(e) = self.task.await {
            warn!("Verification task ended abnormally: {}", e);
        }
    }
}

/// Counts one verification as in flight until dropped, even if the task panics
struct InFlightGuard(Arc<watch::Sender<usize>>);

impl InFlightGuard {
    fn acquire(counter: &Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Multi-step processing tracker for one herb batch.
///
/// Cloning yields another handle to the same steps and batch. Submitting
/// a step spawns its verification on the current tokio runtime.
#[derive(Clone)]
pub struct ProcessingTracker {
    state: Arc<Mutex<TrackerState>>,
    verifier: Arc<dyn StepVerifier>,
    in_flight: Arc<watch::Sender<usize>>,
    tracker_config: TrackerConfig,
    batch_config: BatchConfig,
}

impl ProcessingTracker {
    pub fn new(config: &HerbTraceConfig, verifier: Arc<dyn StepVerifier>) -> Self {
        let (in_flight, _) = watch::channel(0usize);
        Self {
            state: Arc::new(Mutex::new(TrackerState {
                steps: Vec::new(),
                batch: None,
            })),
            verifier,
            in_flight: Arc::new(in_flight),
            tracker_config: config.tracker.clone(),
            batch_config: config.batch.clone(),
        }
    }

    /// Tracker backed by the random-score simulated verifier
    pub fn simulated(config: &HerbTraceConfig) -> Self {
        Self::new(
            config,
            Arc::new(SimulatedVerifier::from_config(&config.tracker)),
        )
    }

    fn state(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Initialize the session batch on first entry; later calls return it unchanged
    pub fn enter(&self) -> HerbBatch {
        let mut state = self.state();
        let current_step = state.steps.len() as u32;
        let batch = state.batch.get_or_insert_with(|| {
            let now = Utc::now();
            let batch = HerbBatch {
                id: format!("batch-{}", now.timestamp_millis()),
                herb_name: self.batch_config.herb_name.clone(),
                scientific_name: self.batch_config.scientific_name.clone(),
                collection_date: now,
                collection_location: self.batch_config.collection_location.clone(),
                collector_name: self.batch_config.collector_name.clone(),
                initial_images: Vec::new(),
                total_steps: self.tracker_config.total_steps,
                current_step,
                qr_code: None,
                final_verification: false,
            };
            info!(
                batch_id = %batch.id,
                herb = %batch.herb_name,
                "Herb batch initialized"
            );
            batch
        });
        batch.clone()
    }

    pub fn batch(&self) -> Option<HerbBatch> {
        self.state().batch.clone()
    }

    /// Validate a draft and append it as the next pending step.
    ///
    /// An incomplete draft leaves the step list untouched. Must be called
    /// from within a tokio runtime.
    pub fn submit_step(&self, draft: StepDraft) -> Result<SubmittedStep, TrackerError> {
        if let Some(field) = draft.missing_field() {
            tracker_metrics().record_rejected_draft();
            debug!(missing = %field, "Ignoring incomplete step draft");
            return Err(TrackerError::MissingField(field));
        }

        let StepDraft {
            title,
            stakeholder,
            description,
            location,
            notes,
            images,
        } = draft;
        let Some(stakeholder) = stakeholder else {
            return Err(TrackerError::MissingField(RequiredField::Stakeholder));
        };

        let (step, batch_id) = {
            let mut state = self.state();
            let step_number = state.steps.len() as u32 + 1;
            let timestamp = Utc::now();
            let step = ProcessingStep {
                id: format!("step-{}-{}", timestamp.timestamp_millis(), step_number),
                step_number,
                title: trimmed(title),
                description: trimmed(description),
                stakeholder,
                location: trimmed(location),
                timestamp,
                images,
                ai_verified: false,
                verification_score: 0,
                notes: trimmed(notes),
                status: StepStatus::Pending,
            };

            state
                .steps
                .push(StepLifecycle::new(step.clone()).state_machine());
            let current_step = state.steps.len() as u32;
            let batch_id = state.batch.as_mut().map(|batch| {
                batch.current_step = current_step;
                batch.id.clone()
            });
            (step, batch_id)
        };

        tracker_metrics().record_submission();
        info!(
            step_id = %step.id,
            step_number = step.step_number,
            stakeholder = %step.stakeholder,
            images = step.images.len(),
            "Processing step submitted"
        );

        let verification = self.spawn_verification(step.clone(), batch_id.as_deref());
        Ok(SubmittedStep { step, verification })
    }

    fn spawn_verification(&self, step: ProcessingStep, batch_id: Option<&str>) -> VerificationHandle {
        let span = create_step_span(&step.id, step.step_number, batch_id);
        let tracker = self.clone();
        let requested_at = tokio::time::Instant::now();
        let guard = InFlightGuard::acquire(&self.in_flight);

        let task = tokio::spawn(
            async move {
                let _guard = guard;
                let score = tracker.verifier.verify(&step, requested_at).await;
                tracker.resolve(&step.id, score);
            }
            .instrument(span),
        );

        VerificationHandle { task }
    }

    fn resolve(&self, step_id: &str, score: u8) {
        let mut state = self.state();
        let Some(sm) = state.steps.iter_mut().find(|sm| sm.inner().step().id == step_id) else {
            warn!(step_id, "Verification resolved for unknown step");
            return;
        };

        let was_verified = sm.inner().is_verified();
        sm.handle(&StepEvent::VerificationResolved { score });
        if !was_verified && sm.inner().is_verified() {
            tracker_metrics().record_verification();
        }
    }

    /// Number of verifications still waiting on their timers
    pub fn pending_verifications(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait until every spawned verification has resolved
    pub async fn settle(&self) {
        let mut rx = self.in_flight.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// All steps in submission order
    pub fn steps(&self) -> Vec<ProcessingStep> {
        self.state()
            .steps
            .iter()
            .map(|sm| sm.inner().step().clone())
            .collect()
    }

    pub fn step(&self, step_number: u32) -> Result<ProcessingStep, TrackerError> {
        self.state()
            .steps
            .iter()
            .map(|sm| sm.inner().step())
            .find(|step| step.step_number == step_number)
            .cloned()
            .ok_or(TrackerError::StepNotFound(step_number))
    }

    pub fn len(&self) -> usize {
        self.state().steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verified steps; this is the batch's completed-step count
    pub fn completed_steps(&self) -> u32 {
        self.state().count(StepStatus::Verified)
    }

    pub fn certification_available(&self) -> bool {
        self.completed_steps() >= self.tracker_config.certification_threshold
    }

    /// Issue the batch certification code once enough steps are verified.
    ///
    /// Once issued, later calls return the same code.
    pub fn issue_certification(&self) -> Result<String, CertificationError> {
        let mut state = self.state();
        let verified = state.count(StepStatus::Verified);
        let required = self.tracker_config.certification_threshold;
        let batch = state.batch.as_mut().ok_or(CertificationError::NoBatch)?;

        if let Some(code) = &batch.qr_code {
            debug!(batch_id = %batch.id, "Certification already issued");
            return Ok(code.clone());
        }

        if verified < required {
            return Err(CertificationError::InsufficientVerifiedSteps { verified, required });
        }

        let code = format!("QR-{}", batch.id);
        batch.qr_code = Some(code.clone());
        batch.final_verification = true;
        tracker_metrics().record_certification();
        info!(
            batch_id = %batch.id,
            certification = %code,
            verified_steps = verified,
            "Batch certified"
        );
        Ok(code)
    }

    pub fn summary(&self) -> TrackerSummary {
        let state = self.state();
        let verified = state.count(StepStatus::Verified);
        let pending = state.count(StepStatus::Pending);
        let total = state.steps.len() as u32;
        let total_steps = self.tracker_config.total_steps;
        let threshold = self.tracker_config.certification_threshold;

        let stakeholder_coverage = Stakeholder::ALL
            .into_iter()
            .map(|role| {
                let covered = state
                    .steps
                    .iter()
                    .any(|sm| sm.inner().step().stakeholder == role);
                (role, covered)
            })
            .collect();

        TrackerSummary {
            batch_id: state.batch.as_ref().map(|b| b.id.clone()),
            verified,
            pending,
            total,
            total_steps,
            batch_progress_percent: percent(verified, total_steps),
            certification_threshold: threshold,
            certification_progress_percent: percent(verified.min(threshold), threshold),
            steps_until_certification: threshold.saturating_sub(verified),
            certification_code: state.batch.as_ref().and_then(|b| b.qr_code.clone()),
            stakeholder_coverage,
        }
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 100.0;
    }
    f64::from(part) / f64::from(whole) * 100.0
}
