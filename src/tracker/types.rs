// Core types for herb batches and their processing steps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supply-chain roles a processing step can be attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stakeholder {
    Collector,
    PrimaryProcessor,
    SecondaryProcessor,
    QualityController,
    Packager,
    Distributor,
    Wholesaler,
    Retailer,
}

impl Stakeholder {
    /// All roles in supply-chain order
    pub const ALL: [Stakeholder; 8] = [
        Stakeholder::Collector,
        Stakeholder::PrimaryProcessor,
        Stakeholder::SecondaryProcessor,
        Stakeholder::QualityController,
        Stakeholder::Packager,
        Stakeholder::Distributor,
        Stakeholder::Wholesaler,
        Stakeholder::Retailer,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Stakeholder::Collector => "Collector",
            Stakeholder::PrimaryProcessor => "Primary Processor",
            Stakeholder::SecondaryProcessor => "Secondary Processor",
            Stakeholder::QualityController => "Quality Controller",
            Stakeholder::Packager => "Packager",
            Stakeholder::Distributor => "Distributor",
            Stakeholder::Wholesaler => "Wholesaler",
            Stakeholder::Retailer => "Retailer",
        }
    }
}

impl fmt::Display for Stakeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown stakeholder '{0}'")]
pub struct UnknownStakeholder(pub String);

impl FromStr for Stakeholder {
    type Err = UnknownStakeholder;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        Stakeholder::ALL
            .into_iter()
            .find(|s| {
                s.display_name()
                    .chars()
                    .filter(|c| *c != ' ')
                    .flat_map(char::to_lowercase)
                    .eq(normalized.chars())
            })
            .ok_or_else(|| UnknownStakeholder(input.trim().to_string()))
    }
}

/// Lifecycle status of a processing step
///
/// The tracker only ever produces `Pending` and `Verified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Verified,
    Rejected,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in-progress",
            StepStatus::Verified => "verified",
            StepStatus::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

/// An image picked in a file selector. Only its metadata is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub file_name: String,
    pub size_bytes: Option<u64>,
}

impl ImageAttachment {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes: None,
        }
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    /// Describe a file on disk, falling back to the bare name if it can't be read
    pub fn from_path(path: &std::path::Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size_bytes = std::fs::metadata(path).ok().map(|m| m.len());
        Self {
            file_name,
            size_bytes,
        }
    }
}

/// One documented step in a batch's journey through the supply chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    pub id: String,
    pub step_number: u32,
    pub title: String,
    pub description: String,
    pub stakeholder: Stakeholder,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub images: Vec<ImageAttachment>,
    pub ai_verified: bool,
    pub verification_score: u8,
    pub notes: String,
    pub status: StepStatus,
}

/// Fields the "add step" form cannot be submitted without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Stakeholder,
    Description,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequiredField::Title => "title",
            RequiredField::Stakeholder => "stakeholder",
            RequiredField::Description => "description",
        };
        f.write_str(label)
    }
}

/// Contents of the "add step" form before submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepDraft {
    pub title: Option<String>,
    pub stakeholder: Option<Stakeholder>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub images: Vec<ImageAttachment>,
}

impl StepDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn stakeholder(mut self, stakeholder: Stakeholder) -> Self {
        self.stakeholder = Some(stakeholder);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn image(mut self, image: ImageAttachment) -> Self {
        self.images.push(image);
        self
    }

    /// First required field that is absent or blank
    pub fn missing_field(&self) -> Option<RequiredField> {
        fn blank(value: &Option<String>) -> bool {
            value.as_deref().map_or(true, |v| v.trim().is_empty())
        }

        if blank(&self.title) {
            Some(RequiredField::Title)
        } else if self.stakeholder.is_none() {
            Some(RequiredField::Stakeholder)
        } else if blank(&self.description) {
            Some(RequiredField::Description)
        } else {
            None
        }
    }
}

/// The herb lot being tracked in the current session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerbBatch {
    pub id: String,
    pub herb_name: String,
    pub scientific_name: String,
    pub collection_date: DateTime<Utc>,
    pub collection_location: String,
    pub collector_name: String,
    pub initial_images: Vec<ImageAttachment>,
    pub total_steps: u32,
    pub current_step: u32,
    pub qr_code: Option<String>,
    pub final_verification: bool,
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Step draft is missing required field: {0}")]
    MissingField(RequiredField),
    #[error(transparent)]
    UnknownStakeholder(#[from] UnknownStakeholder),
    #[error("No processing step numbered {0}")]
    StepNotFound(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificationError {
    #[error("No batch has been initialized")]
    NoBatch,
    #[error("Certification needs {required} verified steps, only {verified} verified")]
    InsufficientVerifiedSteps { verified: u32, required: u32 },
}

/// Sidebar view of a tracker: counts, progress and role coverage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSummary {
    pub batch_id: Option<String>,
    pub verified: u32,
    pub pending: u32,
    pub total: u32,
    pub total_steps: u32,
    pub batch_progress_percent: f64,
    pub certification_threshold: u32,
    pub certification_progress_percent: f64,
    pub steps_until_certification: u32,
    pub certification_code: Option<String>,
    pub stakeholder_coverage: Vec<(Stakeholder, bool)>,
}
