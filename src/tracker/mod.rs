// Processing Tracker - multi-step herb batch traceability
//
// Steps are documented one at a time, each verified asynchronously by a
// simulated AI check. Certification is issued once enough steps verify.

pub mod types;
pub mod lifecycle;
pub mod verifier;
pub mod processing;

#[cfg(test)]
mod tests;

pub use types::{
    CertificationError, HerbBatch, ImageAttachment, ProcessingStep, RequiredField, Stakeholder,
    StepDraft, StepStatus, TrackerError, TrackerSummary,
};
pub use lifecycle::{StepEvent, StepLifecycle};
pub use verifier::{FixedVerifier, SimulatedVerifier, StepVerifier};
pub use processing::{ProcessingTracker, SubmittedStep, VerificationHandle};
