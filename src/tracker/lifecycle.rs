use statig::prelude::*;

use super::types::{ProcessingStep, StepStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    /// The simulated verification finished with the given score
    VerificationResolved { score: u8 },
}

/// State machine context for a single processing step.
///
/// A step starts pending and moves to verified exactly once. Later
/// resolutions are ignored so the first score sticks.
#[derive(Debug)]
pub struct StepLifecycle {
    step: ProcessingStep,
}

impl StepLifecycle {
    pub fn new(step: ProcessingStep) -> Self {
        Self { step }
    }

    pub fn step(&self) -> &ProcessingStep {
        &self.step
    }

    pub fn status(&self) -> StepStatus {
        self.step.status
    }

    pub fn is_verified(&self) -> bool {
        self.step.status == StepStatus::Verified
    }
}

#[state_machine(initial = "State::pending()")]
impl StepLifecycle {
    #[state]
    fn pending(&mut self, event: &StepEvent) -> Outcome<State> {
        match event {
            StepEvent::VerificationResolved { score } => {
                self.step.ai_verified = true;
                self.step.verification_score = *score;
                self.step.status = StepStatus::Verified;
                tracing::info!(
                    step_id = %self.step.id,
                    step_number = self.step.step_number,
                    stakeholder = %self.step.stakeholder,
                    score = *score,
                    "Processing step verified"
                );
                Transition(State::verified())
            }
        }
    }

    #[state]
    fn verified(&mut self, event: &StepEvent) -> Outcome<State> {
        match event {
            StepEvent::VerificationResolved { score } => {
                tracing::debug!(
                    step_id = %self.step.id,
                    ignored_score = *score,
                    "Step already verified, ignoring resolution"
                );
                Handled
            }
        }
    }
}
