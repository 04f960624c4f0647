use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::observability::tracker_metrics;
use crate::tracker::ImageAttachment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageVerificationStatus {
    /// Nothing selected yet
    Idle,
    /// Image selected, verification not started
    Pending,
    Verifying,
    Verified,
    /// Declared for completeness; the mock never rejects
    Rejected,
}

/// Result shown once the mock verification finishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerbProfile {
    pub name: String,
    pub scientific_name: String,
    pub quality: String,
    pub confidence: u8,
    pub recommendations: Vec<String>,
}

impl HerbProfile {
    /// The profile every mock verification resolves to
    pub fn tulsi() -> Self {
        Self {
            name: "Tulsi (Holy Basil)".to_string(),
            scientific_name: "Ocimum tenuiflorum".to_string(),
            quality: "Premium".to_string(),
            confidence: 94,
            recommendations: vec![
                "Harvest during morning hours for optimal potency".to_string(),
                "Ensure leaves are fully mature".to_string(),
                "Store in dry, ventilated area".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEvent {
    Select(ImageAttachment),
    Start,
    Complete(HerbProfile),
}

#[derive(Debug)]
pub struct ImageVerification {
    status: ImageVerificationStatus,
    image: Option<ImageAttachment>,
    profile: Option<HerbProfile>,
}

impl Default for ImageVerification {
    fn default() -> Self {
        Self {
            status: ImageVerificationStatus::Idle,
            image: None,
            profile: None,
        }
    }
}

impl ImageVerification {
    fn select(&mut self, image: &ImageAttachment) {
        info!(file = %image.file_name, "Image selected for verification");
        self.image = Some(image.clone());
        self.profile = None;
        self.status = ImageVerificationStatus::Pending;
    }
}

#[state_machine(initial = "State::idle()")]
impl ImageVerification {
    #[state]
    fn idle(&mut self, event: &ImageEvent) -> Outcome<State> {
        match event {
            ImageEvent::Select(image) => {
                self.select(image);
                Transition(State::pending())
            }
            _ => Handled,
        }
    }

    #[state]
    fn pending(&mut self, event: &ImageEvent) -> Outcome<State> {
        match event {
            ImageEvent::Select(image) => {
                self.select(image);
                Handled
            }
            ImageEvent::Start => {
                self.status = ImageVerificationStatus::Verifying;
                info!(file = ?self.image.as_ref().map(|i| &i.file_name), "AI analyzing image");
                Transition(State::verifying())
            }
            _ => Handled,
        }
    }

    #[state]
    fn verifying(&mut self, event: &ImageEvent) -> Outcome<State> {
        match event {
            ImageEvent::Complete(profile) => {
                self.status = ImageVerificationStatus::Verified;
                self.profile = Some(profile.clone());
                info!(
                    herb = %profile.name,
                    confidence = profile.confidence,
                    "Image verification complete"
                );
                Transition(State::verified())
            }
            _ => Handled,
        }
    }

    #[state]
    fn verified(&mut self, event: &ImageEvent) -> Outcome<State> {
        match event {
            ImageEvent::Select(image) => {
                self.select(image);
                Transition(State::pending())
            }
            _ => Handled,
        }
    }
}

/// Shared handle to the dashboard's verification state
#[derive(Clone)]
pub struct VerificationDashboard {
    machine: Arc<Mutex<StateMachine<ImageVerification>>>,
    delay: Duration,
}

impl VerificationDashboard {
    pub fn new(delay: Duration) -> Self {
        Self {
            machine: Arc::new(Mutex::new(ImageVerification::default().state_machine())),
            delay,
        }
    }

    fn machine(&self) -> MutexGuard<'_, StateMachine<ImageVerification>> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Choose an image; ignored while a verification is running
    pub fn select_image(&self, image: ImageAttachment) {
        self.machine().handle(&ImageEvent::Select(image));
    }

    /// Start verifying the selected image.
    ///
    /// Returns `None` (no-op) unless an image is selected and not yet
    /// verified. Must be called from within a tokio runtime.
    pub fn start_verification(&self) -> Option<JoinHandle<()>> {
        {
            let mut machine = self.machine();
            if machine.inner().status != ImageVerificationStatus::Pending {
                debug!(status = ?machine.inner().status, "Verification not startable");
                return None;
            }
            machine.handle(&ImageEvent::Start);
        }

        let dashboard = self.clone();
        let deadline = tokio::time::Instant::now() + self.delay;
        Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            dashboard.machine().handle(&ImageEvent::Complete(HerbProfile::tulsi()));
            tracker_metrics().record_image_verification();
        }))
    }

    pub fn status(&self) -> ImageVerificationStatus {
        self.machine().inner().status
    }

    pub fn image(&self) -> Option<ImageAttachment> {
        self.machine().inner().image.clone()
    }

    pub fn profile(&self) -> Option<HerbProfile> {
        self.machine().inner().profile.clone()
    }
}
