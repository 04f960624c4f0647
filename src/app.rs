//! Application root: view navigation and the state shared across views.
//!
//! State is owned here and lent to whichever view is active, so the tracker
//! keeps its steps and batch while the user moves between views.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::HerbTraceConfig;
use crate::tracker::ProcessingTracker;
use crate::verification::VerificationDashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Landing,
    Dashboard,
    Processing,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            View::Landing => "landing",
            View::Dashboard => "dashboard",
            View::Processing => "processing",
        };
        f.write_str(label)
    }
}

pub struct App {
    view: View,
    tracker: ProcessingTracker,
    dashboard: VerificationDashboard,
}

impl App {
    pub fn new(config: &HerbTraceConfig) -> Self {
        Self::with_tracker(config, ProcessingTracker::simulated(config))
    }

    pub fn with_tracker(config: &HerbTraceConfig, tracker: ProcessingTracker) -> Self {
        Self {
            view: View::Landing,
            tracker,
            dashboard: VerificationDashboard::new(config.dashboard.verification_delay()),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Switch views. Entering the processing view creates the batch on first visit.
    pub fn navigate(&mut self, view: View) {
        if self.view != view {
            tracing::debug!(from = %self.view, to = %view, "Navigating");
        }
        self.view = view;
        if view == View::Processing {
            self.tracker.enter();
        }
    }

    pub fn tracker(&self) -> &ProcessingTracker {
        &self.tracker
    }

    pub fn dashboard(&self) -> &VerificationDashboard {
        &self.dashboard
    }
}

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub struct Stage {
    pub step: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub const PRODUCT_NAME: &str = "HerbTrace";
pub const HEADLINE: &str = "AI-Powered Botanical Herb Tracing";
pub const TAGLINE: &str = "Ensuring botanical authenticity from forest to consumer";

pub const FEATURES: [Feature; 6] = [
    Feature {
        title: "AI Herb Verification",
        description: "Upload images for instant AI-powered verification of herb quality and authenticity at collection point",
    },
    Feature {
        title: "Supply Chain Tracking",
        description: "Track herbs through every step from forest collection to processing and final sale",
    },
    Feature {
        title: "QR Code Certification",
        description: "Generate QR codes for final products showing complete processing history and authenticity",
    },
    Feature {
        title: "Multi-Stakeholder Platform",
        description: "Connect collectors, processors, distributors, and consumers in one unified platform",
    },
    Feature {
        title: "Quality Assurance",
        description: "AI-powered quality checks ensure only the best herbs make it through the supply chain",
    },
    Feature {
        title: "Real-time Updates",
        description: "Get instant updates on processing status and location throughout the supply chain",
    },
];

pub const STAGES: [Stage; 3] = [
    Stage {
        step: 1,
        title: "Forest Collection",
        description: "Collectors upload images of herbs for AI verification before harvesting. Only verified herbs are approved for collection.",
    },
    Stage {
        step: 2,
        title: "Processing & Verification",
        description: "Each processing step is documented with AI verification, creating an immutable record of the herb's journey.",
    },
    Stage {
        step: 3,
        title: "Final Certification",
        description: "Ready products receive a QR code containing the complete processing history and authenticity certificate.",
    },
];
